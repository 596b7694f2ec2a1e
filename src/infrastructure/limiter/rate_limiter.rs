use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateDecision {
    Allowed { remaining: u64 },
    Rejected { retry_after_secs: u64 },
}

/// Sliding window: the previous window's count is weighted by how much of it still overlaps.
#[derive(Debug)]
pub struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    pub fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let window_nanos = self.window_size.as_nanos().max(1);
        let elapsed_nanos = now.saturating_duration_since(self.current_window_start).as_nanos();

        if elapsed_nanos >= window_nanos {
            let passed = elapsed_nanos / window_nanos;
            self.prev_count = if passed == 1 { self.current_count } else { 0 };
            self.current_count = 0;
            self.current_window_start += Duration::from_nanos((passed * window_nanos) as u64);
        }
    }

    pub fn allow(&mut self, now: Instant) -> RateDecision {
        self.roll(now);
        self.last_seen = now;

        let into_window = now.saturating_duration_since(self.current_window_start);
        let weight = into_window.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64);

        if effective < self.limit as f64 {
            self.current_count += 1;
            let used = (effective + 1.0).ceil() as u64;
            RateDecision::Allowed { remaining: self.limit.saturating_sub(used) }
        } else {
            let retry_after = self.window_size.saturating_sub(into_window);
            RateDecision::Rejected {
                retry_after_secs: retry_after.as_secs_f64().ceil().max(1.0) as u64,
            }
        }
    }
}

/// --- Rate limiter store & eviction ---
type Key = String;

#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Drops clients idle for longer than two windows. Needs a running Tokio runtime.
    pub fn spawn_eviction(&self) {
        let map = self.map.clone();
        let ttl = self.window_size * 2;

        tokio::spawn(async move {
            let interval = Duration::from_secs(60);
            loop {
                sleep(interval).await;
                let now = Instant::now();
                map.retain(|_, window| now.saturating_duration_since(window.lock().last_seen) <= ttl);
            }
        });
    }

    fn get_window(&self, key: &str) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, Instant::now())))
            })
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let window = self.get_window(key);
        let mut guard = window.lock();
        guard.allow(Instant::now())
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_once_limit_is_reached() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(900), 3, start);

        assert_eq!(window.allow(start), RateDecision::Allowed { remaining: 2 });
        assert_eq!(window.allow(start), RateDecision::Allowed { remaining: 1 });
        assert_eq!(window.allow(start), RateDecision::Allowed { remaining: 0 });
        assert!(matches!(window.allow(start), RateDecision::Rejected { retry_after_secs: 900 }));
    }

    #[test]
    fn previous_window_weight_decays() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(100), 2, start);
        window.allow(start);
        window.allow(start);

        // Halfway into the next window one of the two old hits still counts.
        let halfway = start + Duration::from_secs(150);
        assert!(matches!(window.allow(halfway), RateDecision::Allowed { .. }));
        assert!(matches!(window.allow(halfway), RateDecision::Rejected { .. }));
    }

    #[test]
    fn long_idle_period_resets_the_window() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(10), 1, start);
        window.allow(start);
        assert!(matches!(window.allow(start), RateDecision::Rejected { .. }));

        let later = start + Duration::from_secs(35);
        assert_eq!(window.allow(later), RateDecision::Allowed { remaining: 0 });
    }

    #[test]
    fn clients_are_tracked_independently() {
        let store = RateLimiterStore::new(1, Duration::from_secs(60));
        assert!(matches!(store.check("10.0.0.1"), RateDecision::Allowed { .. }));
        assert!(matches!(store.check("10.0.0.1"), RateDecision::Rejected { .. }));
        assert!(matches!(store.check("10.0.0.2"), RateDecision::Allowed { .. }));
        assert_eq!(store.tracked_clients(), 2);
    }
}
