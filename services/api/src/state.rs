//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources like the session store and the orchestrator.

use crate::{config::Config, store::SessionStore};
use interview_core::orchestrator::Orchestrator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<Config>,
}
