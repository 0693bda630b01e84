pub mod chat;
pub mod state;
