//! Infrastructure layer for the command hub.
//!
//! - **`key_source`** – Reads single keystrokes from the terminal in raw mode
//!   (no Enter required) on a dedicated thread, or from a test double.
//! - **`console`** – Console output that stays readable while the terminal
//!   is in raw mode.

pub mod console;
pub mod key_source;
