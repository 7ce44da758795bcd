//! Application layer use cases for the command hub.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (message shapes, in `hub-core`) and the infrastructure (terminal and
//! network).  Code here decides *what* to broadcast, never *how* bytes reach
//! a client or how a key is read from the terminal.
//!
//! # Sub-modules
//!
//! - **`key_commands`** – The key table: which keystroke becomes which UX
//!   command, and which keystroke ends the program.
//!
//! - **`command_loop`** – Consumes keystrokes in arrival order and hands each
//!   resulting command to the broadcast dispatcher.

pub mod command_loop;
pub mod key_commands;
