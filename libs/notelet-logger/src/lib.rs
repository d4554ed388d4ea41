mod logger;

pub use logger::init_logger;
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, log::LevelFilter, trace, trace_span,
    warn, warn_span,
};
