pub mod protocol;
pub mod registry;
pub mod responder;
pub mod session;
pub mod websocket;

pub use protocol::{InboundFrame, OutboundFrame, ProtocolError};
pub use registry::{ActiveSession, SessionGuard, SessionRegistry};
pub use responder::{EchoResponder, Responder};
pub use session::{SessionClose, WsChatSession};
pub use websocket::chat_websocket;
