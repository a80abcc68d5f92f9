//! gamescreen-client library crate.
//!
//! A native viewer for a remote handheld-console screen.  Frames arrive over
//! a websocket, are scaled up and painted; key presses go back to the peer
//! as HTTP requests.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! [gamescreen-client]
//!   ├── domain/           ClientConfig and its TOML repository
//!   ├── application/      ClientRuntime: the single event loop
//!   └── infrastructure/
//!         ├── socket          frame stream (tokio-tungstenite)
//!         ├── input_endpoint  HTTP input requests (reqwest)
//!         ├── key_source      key transitions read from text lines
//!         └── snapshot        PNG dump of the visible surface (image)
//! ```
//!
//! The protocol rules themselves (frame validation, scaling, key edge
//! filtering, request serialisation, reconnect policy) live in
//! `gamescreen-core` and are free of I/O.

/// Domain layer: configuration types (no I/O beyond the config file).
pub mod domain;

/// Application layer: the client event loop.
pub mod application;

/// Infrastructure layer: websocket, HTTP, stdin and file output.
pub mod infrastructure;
