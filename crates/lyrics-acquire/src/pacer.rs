use std::fmt;
use std::time::Duration;

/// What the next request is for; only used in the wait message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextRequest {
    Album,
    Song,
}

impl fmt::Display for NextRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextRequest::Album => write!(f, "album"),
            NextRequest::Song => write!(f, "song"),
        }
    }
}

/// Fixed delay in front of every outbound request.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    waits: usize,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, waits: 0 }
    }

    pub async fn wait(&mut self, next: NextRequest) {
        self.waits += 1;
        if self.delay.is_zero() {
            return;
        }
        tracing::info!(
            "Waiting for {} seconds before the next {next}...",
            self.delay.as_secs_f64()
        );
        tokio::time::sleep(self.delay).await;
    }

    /// Number of waits so far, including zero-length ones.
    pub fn waits(&self) -> usize {
        self.waits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_wait_sleeps_for_delay() {
        let mut pacer = Pacer::new(Duration::from_millis(30));
        let start = Instant::now();
        pacer.wait(NextRequest::Album).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(pacer.waits(), 1);
    }

    #[tokio::test]
    async fn test_zero_delay_still_counts() {
        let mut pacer = Pacer::new(Duration::ZERO);
        pacer.wait(NextRequest::Album).await;
        pacer.wait(NextRequest::Song).await;
        pacer.wait(NextRequest::Song).await;
        assert_eq!(pacer.waits(), 3);
    }

    #[test]
    fn test_next_request_display() {
        assert_eq!(NextRequest::Album.to_string(), "album");
        assert_eq!(NextRequest::Song.to_string(), "song");
    }
}
