//! The three decision nodes of the interview graph.
//!
//! Nodes read the session state and return an update; they never write to the
//! state themselves and never fail. Gateway errors are absorbed here so that a
//! step always runs to completion.

pub mod feedback;
pub mod interviewer;
pub mod observer;

pub use feedback::summarize;
pub use interviewer::interview;
pub use observer::observe;
