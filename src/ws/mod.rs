mod handler;
mod registry;

pub use handler::ws_handler;
pub use registry::{
    BroadcastOutcome, Connection, ConnectionId, ConnectionPeer, ConnectionRegistry,
    ConnectionState, DeliveryError, Liveness,
};
