use std::time::Duration;
use tokio::time::Instant;

/// Default search debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces rapid input into a single value once it settles.
///
/// Each `push` replaces the pending value and restarts the window, so only
/// the latest value is ever emitted, and only after it has gone unchanged for
/// the full window. The debouncer holds no timer of its own: the owner either
/// polls it or sleeps until [`Debouncer::deadline`]. Dropping it or calling
/// `cancel` discards anything pending.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new input value, superseding any pending one.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    /// Instant at which the pending value becomes ready, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its window has elapsed.
    pub fn poll_ready(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if Instant::now() >= *deadline => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Take the pending value immediately, skipping the remaining window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Discard any pending value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Wait until the pending value is ready and take it.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.flush()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_once_with_latest_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let mut emissions = Vec::new();

        // Keystrokes at t=0, 50, 100, 150
        for (i, value) in ["s", "st", "ste", "stem"].into_iter().enumerate() {
            if i > 0 {
                advance(Duration::from_millis(50)).await;
            }
            debouncer.push(value.to_string());
            if let Some(v) = debouncer.poll_ready() {
                emissions.push((start.elapsed(), v));
            }
        }

        // Step through time in 10ms ticks until well past the window
        for _ in 0..60 {
            advance(Duration::from_millis(10)).await;
            if let Some(v) = debouncer.poll_ready() {
                emissions.push((start.elapsed(), v));
            }
        }

        assert_eq!(emissions.len(), 1);
        let (at, value) = &emissions[0];
        assert_eq!(value, "stem");
        // Stable for the full window after the last keystroke at t=150
        assert_eq!(*at, Duration::from_millis(450));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_ready_before_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push(1);
        advance(Duration::from_millis(299)).await;
        assert_eq!(debouncer.poll_ready(), None);
        advance(Duration::from_millis(1)).await;
        assert_eq!(debouncer.poll_ready(), Some(1));
        // Consumed
        assert_eq!(debouncer.poll_ready(), None);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_input_restarts_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push("a");
        advance(Duration::from_millis(200)).await;
        debouncer.push("b");
        advance(Duration::from_millis(200)).await;
        // 400ms since "a" but only 200ms since "b"
        assert_eq!(debouncer.poll_ready(), None);
        advance(Duration::from_millis(100)).await;
        assert_eq!(debouncer.poll_ready(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push("gone");
        debouncer.cancel();
        advance(Duration::from_millis(500)).await;
        assert_eq!(debouncer.poll_ready(), None);
        assert_eq!(debouncer.settled().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_sleeps_until_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push(7);
        assert_eq!(debouncer.settled().await, Some(7));
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn test_flush_skips_window() {
        let mut debouncer = Debouncer::<&str>::default();
        assert_eq!(debouncer.window(), DEFAULT_DEBOUNCE);
        debouncer.push("now");
        assert_eq!(debouncer.flush(), Some("now"));
        assert_eq!(debouncer.flush(), None);
    }
}
