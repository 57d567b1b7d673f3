//! Application layer: the live order configuration and the upload flow.
//!
//! Everything here reacts to discrete events from the shell. The only work
//! that runs in the background is preview decoding and the order transfer;
//! both report back over `tokio` channels and their results are applied on
//! the caller's side, so no state is shared across tasks.

pub mod configuration;
pub mod preview;
pub mod upload;
