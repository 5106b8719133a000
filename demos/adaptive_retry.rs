//! Adaptive Retry Example
//!
//! Drives a simulated rate-limited service with an adaptive backoff controller.
//! Shows:
//! - Growth during a throttling burst
//! - Easing off once the service recovers
//! - Reading metrics afterwards
//!
//! Run with: cargo run --example adaptive_retry --features tracing

use std::time::Duration;

use slackwater::{AdaptiveBackoff, BackoffConfig};
use tracing_subscriber::filter::LevelFilter;

/// A service that throttles requests 20 through 39.
struct FlakyService {
    requests: u32,
}

impl FlakyService {
    fn call(&mut self) -> Result<u32, &'static str> {
        self.requests += 1;
        if (20..40).contains(&self.requests) {
            Err("429 Too Many Requests")
        } else {
            Ok(self.requests)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    println!("======================================");
    println!("       Adaptive Retry Example         ");
    println!("======================================");

    let config = BackoffConfig::default()
        .with_initial_interval(Duration::from_millis(2))
        .with_max_interval(Duration::from_millis(50))
        .with_down_multiplier_threshold(5);
    let mut backoff = match AdaptiveBackoff::from_config(config) {
        Ok(backoff) => backoff,
        Err(e) => {
            eprintln!("invalid backoff configuration: {}", e);
            return;
        }
    };

    let mut service = FlakyService { requests: 0 };
    for _ in 0..120 {
        match service.call() {
            Ok(_) => backoff.on_success(),
            Err(e) => {
                println!("  request {} failed: {}", service.requests, e);
                backoff.on_failure();
            }
        }
        if service.requests % 10 == 0 {
            println!(
                "  after {:>3} requests: interval {:?}",
                service.requests,
                backoff.current_interval()
            );
        }
    }

    let metrics = backoff.metrics();
    println!("\nInvocations: {}", metrics.total_invocation);
    println!("Went up:     {}", metrics.total_went_up);
    println!("Went down:   {}", metrics.total_went_down);
    println!("Slept:       {} ({:?})", metrics.total_slept, metrics.total_sleep_time);
    println!("Average:     {:?}", metrics.average_sleep());
    println!("Idle again:  {}", backoff.is_idle());
}
