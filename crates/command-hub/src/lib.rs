//! command-hub library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! ```text
//! terminal ──Keystroke──► command_loop ──CommandMessage──► BroadcastDispatcher ──► clients
//! ```

pub mod application;
pub mod infrastructure;
