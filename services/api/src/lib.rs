//! Interview API Library Crate
//!
//! This library contains the web service around the interview engine: the
//! configuration, the in-memory session store, API handlers, session log
//! persistence, routing and graceful shutdown. The `api` binary is a thin
//! wrapper around it.

pub mod config;
pub mod handlers;
pub mod logs;
pub mod models;
pub mod router;
pub mod shutdown;
pub mod state;
pub mod store;
