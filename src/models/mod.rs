mod chat;
mod chat_message;
mod user;

pub use chat::*;
pub use chat_message::*;
pub use user::*;
