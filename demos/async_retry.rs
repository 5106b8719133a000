//! Async Retry Example
//!
//! The same controller inside a tokio task, waiting with `tokio::time::sleep`.
//!
//! Run with: cargo run --example async_retry --features async

use std::time::Duration;

use slackwater::{AdaptiveBackoff, BackoffConfig};

#[tokio::main]
async fn main() {
    let config = BackoffConfig::default()
        .with_initial_interval(Duration::from_millis(5))
        .with_max_interval(Duration::from_millis(100))
        .with_down_multiplier_threshold(3);
    let mut backoff = AdaptiveBackoff::new().with_config(config);

    let outcomes = [true, false, false, false, true, true, true, true, true, true];
    for (i, ok) in outcomes.iter().enumerate() {
        if *ok {
            backoff.on_success_async().await;
        } else {
            backoff.on_failure_async().await;
        }
        println!("attempt {:>2}: ok={} interval={:?}", i + 1, ok, backoff.current_interval());
    }

    println!("\n{:#?}", backoff.metrics());
}
