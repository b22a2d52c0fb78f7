//! Command implementations for the vnlz CLI.

pub mod batch;
pub mod decode;
pub mod dialects;
pub mod encode;

pub use batch::{BatchArgs, cmd_batch};
pub use decode::{DecodeArgs, cmd_decode};
pub use dialects::cmd_dialects;
pub use encode::cmd_encode;
