//! # Dispatcher
//!
//! Ordered handler registry with first-match-wins routing. Registration
//! order is a routing priority: register handlers from most to least
//! specific. Exactly one handler runs per update, and a failing handler
//! never stalls or crashes the ingestion loop.

mod dispatcher;
mod handler;
mod metrics;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use handler::{Handler, HandlerResult, MatchRule, COMMAND_PREFIX};
pub use metrics::{DispatchMetrics, DispatchSnapshot};
