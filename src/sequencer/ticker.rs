// ABOUTME: Scheduling primitive for waits between poll ticks.
// ABOUTME: Lets the loop run on tokio time in production and on recorded waits in tests.

use async_trait::async_trait;
use std::time::Duration;

/// Waits out the gap between two poll ticks.
#[async_trait]
pub trait Ticker: Send {
    async fn wait(&mut self, period: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicker;

#[async_trait]
impl Ticker for TokioTicker {
    async fn wait(&mut self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_advances_clock() {
        let start = tokio::time::Instant::now();
        TokioTicker.wait(Duration::from_secs(10)).await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
