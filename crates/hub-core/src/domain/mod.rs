//! Domain types: connections and the messages broadcast to them.
//!
//! Nothing in here performs I/O.  A [`connection::Connection`] is a trait so
//! that the transport can supply real WebSocket sessions while tests supply
//! in-memory doubles.

pub mod connection;
pub mod message;
