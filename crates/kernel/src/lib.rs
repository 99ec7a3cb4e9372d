//! Agora Kernel Library
//!
//! Block document rendering, authoring and the post display server.
//! The main entry point for running the server is the `agora` binary.

pub mod cli;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod theme;
