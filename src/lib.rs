//! gopherd - Gopher file server
//!
//! Core library for selector resolution, menu rendering and connection
//! handling.

pub mod config;
pub mod error;
pub mod gopher;
pub mod server;
