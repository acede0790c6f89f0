//! Input debouncing driven by the UI loop's clock.

use std::time::{Duration, Instant};

/// Holds back a rapidly changing value until it has been stable for a window.
///
/// The UI loop calls [`push`](Debouncer::push) on every keystroke and
/// [`poll`](Debouncer::poll) on every tick. A value is released once no new
/// value arrived for `window`, and only if it differs from the last released
/// value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            window,
            settled: initial,
            pending: None,
        }
    }

    /// Record a new raw value, restarting the window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the pending value if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, pushed_at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*pushed_at) < self.window {
            return None;
        }

        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }

    /// The last released value.
    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget any pending value and treat `value` as released.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.settled = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn test_releases_after_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), WINDOW);

        debouncer.push("d".to_string(), start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);
        assert_eq!(debouncer.poll(start + WINDOW), Some("d".to_string()));
        assert_eq!(debouncer.settled(), "d");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_rapid_pushes_release_last_value_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), WINDOW);

        debouncer.push("d".to_string(), start);
        debouncer.push("db".to_string(), start + Duration::from_millis(50));
        debouncer.push("db ".to_string(), start + Duration::from_millis(200));

        // 300ms after the first push, but only 100ms after the last
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(500)),
            Some("db ".to_string())
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_unchanged_value_is_not_released() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("db".to_string(), WINDOW);

        debouncer.push("dbx".to_string(), start);
        debouncer.push("db".to_string(), start + Duration::from_millis(10));
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reset_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), WINDOW);

        debouncer.push("stale".to_string(), start);
        debouncer.reset(String::new());
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }
}
