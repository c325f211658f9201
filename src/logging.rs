//! Tracing initialization for consumers that want this crate's `tracing`
//! events routed somewhere without wiring up their own subscriber first.
//!
//! Grounded on `Xevion-rustdoc-mcp`'s `src/tracing.rs`
//! (`examples/other_examples`-adjacent pack repo): a `Once`-guarded
//! `tracing_subscriber::fmt` setup that swaps in a test writer under a test
//! harness.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a default `tracing_subscriber::fmt` subscriber. Safe to call more
/// than once or alongside a host application's own subscriber setup; only
/// the first call takes effect.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
