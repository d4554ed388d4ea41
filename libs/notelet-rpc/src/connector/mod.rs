mod memory;
#[cfg(feature = "websocket")]
mod socket;

pub use memory::memory_connector;
#[cfg(feature = "websocket")]
pub use socket::socket_connector;
