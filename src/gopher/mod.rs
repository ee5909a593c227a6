//! Gopher protocol implementation.
//!
//! Serves a directory tree one request per connection: the client sends a
//! selector line, the server answers with file bytes or a menu and closes.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine, reads the request line
//! - **`selector`**: Request line parsing and lexical selector sanitization
//! - **`resolver`**: Maps a selector onto the filesystem, streams files
//! - **`gophermap`**: Renders `gophermap` files into menu lines
//! - **`listing`**: Auto-generated menus for directories without a gophermap
//! - **`item`**: Item types and the menu line record
//! - **`writer`**: Menu line, terminator and error line serialization
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the selector line
//!        └──────┬──────┘
//!               ├─ Peer closed, nothing sent → Closed
//!               ├─ Malformed or unsafe selector → Failed
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← gophermap | listing | file bytes
//!        └──────┬───────────┘
//!               ├─ Error → Failed (type 3 line)
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gopherd::config::Config;
//! use gopherd::gopher::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Arc::new(Config::load());
//!     let listener = TcpListener::bind(cfg.listen_addr()).await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let cfg = cfg.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, cfg);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod gophermap;
pub mod item;
pub mod listing;
pub mod resolver;
pub mod selector;
pub mod writer;

pub use connection::Connection;
pub use item::{ItemType, MenuLine};
pub use resolver::{Served, resolve};
pub use selector::{Request, Selector};
