pub mod context;
pub mod conversation;
pub mod errors;
pub mod providers;
pub mod render;
pub mod session;
