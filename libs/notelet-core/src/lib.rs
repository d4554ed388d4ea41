mod block;
mod buffer;
mod order;
mod reconcile;
mod types;

pub mod constants;

pub use block::{Block, BlockContent, BlockKind, BlockPatch, Cover, FileRef, Page};
pub use buffer::{BlockBroadcast, EditBuffer, SaveStatus, TombstoneSet};
pub use order::{append_after, gap_exhausted, insert_between, renumbered, ORDER_GAP};
pub use reconcile::{reconcile, ReconcileOutcome, RemoteUpdate};
pub use tracing::{debug, error, info, log::LevelFilter, trace, warn};
pub use types::{BlockStore, NoteletError, NoteletResult};
