mod error;
mod store;

pub use error::{NoteletError, NoteletResult};
pub use store::BlockStore;
