//! TCP front end: binds the listening socket and dispatches connections.

pub mod listener;
