//! Poll-loop metric recording helpers
//!
//! Called by the updater once per poll cycle; counters and gauges are
//! exported through whatever recorder the host installed (see
//! [`crate::init_with_config`]).

use contracts::UpdateId;
use metrics::{counter, gauge, histogram};

/// Record a successful cycle that dispatched a non-empty batch
pub fn record_batch_dispatched(batch_size: usize, cursor: UpdateId) {
    counter!("bot_polls_total").increment(1);
    counter!("bot_updates_dispatched_total").increment(batch_size as u64);
    histogram!("bot_batch_size").record(batch_size as f64);
    gauge!("bot_cursor").set(cursor as f64);
}

/// Record a cycle that came back empty (long-poll timeout or no traffic)
pub fn record_idle_poll() {
    counter!("bot_polls_total").increment(1);
    counter!("bot_idle_polls_total").increment(1);
}

/// Record a classified fetch failure and the backoff it triggered
pub fn record_fetch_failure(kind: &'static str, backoff_secs: u64) {
    counter!("bot_polls_total").increment(1);
    counter!("bot_fetch_failures_total", "kind" => kind).increment(1);
    histogram!("bot_backoff_seconds").record(backoff_secs as f64);
}

/// Record the cursor chosen by startup recovery
pub fn record_cursor_recovered(cursor: UpdateId) {
    gauge!("bot_cursor").set(cursor as f64);
}
