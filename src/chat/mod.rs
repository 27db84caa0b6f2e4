pub mod conversation;
pub mod engine;

pub use conversation::{Conversations, Role, Turn};
pub use engine::{ChatEngine, ChatReply};
