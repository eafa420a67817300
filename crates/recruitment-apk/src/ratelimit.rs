use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window request limiter keyed by client IP.
///
/// The per-IP bookkeeping is a single read-modify-write under one lock, so
/// concurrent requests from the same address cannot undercount. Denied
/// requests are not recorded, so a blocked client recovers as soon as its
/// accepted hits age out.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Returns whether this request may proceed, recording it if so.
    pub fn allow(&self, ip: IpAddr) -> bool {
        self.allow_at(ip, Instant::now())
    }

    fn allow_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut hits = self.hits.lock().expect("rate limit mutex poisoned");

        // Prune aged hits everywhere and drop addresses left empty, so idle
        // clients do not accumulate entries for the process lifetime.
        hits.retain(|_, stamps| {
            stamps.retain(|stamp| now.duration_since(*stamp) < self.window);
            !stamps.is_empty()
        });

        let entry = hits.entry(ip).or_default();
        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    #[cfg(test)]
    fn tracked_addresses(&self) -> usize {
        self.hits.lock().expect("rate limit mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([203, 0, 113, last])
    }

    #[test]
    fn allows_up_to_the_limit_then_denies() {
        let limiter = SlidingWindowLimiter::new(5, Duration::from_secs(3600));
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.allow_at(ip(1), now));
        }
        assert!(!limiter.allow_at(ip(1), now));
    }

    #[test]
    fn denied_requests_do_not_extend_the_window() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.allow_at(ip(2), start));
        // Hammering while denied must not push the recovery point out.
        for _ in 0..10 {
            assert!(!limiter.allow_at(ip(2), start + Duration::from_secs(30)));
        }
        assert!(limiter.allow_at(ip(2), start + Duration::from_secs(60)));
    }

    #[test]
    fn window_slides_per_request() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(100));
        let start = Instant::now();

        assert!(limiter.allow_at(ip(3), start));
        assert!(limiter.allow_at(ip(3), start + Duration::from_secs(50)));
        assert!(!limiter.allow_at(ip(3), start + Duration::from_secs(99)));
        // First hit expired, second still live.
        assert!(limiter.allow_at(ip(3), start + Duration::from_secs(120)));
    }

    #[test]
    fn idle_addresses_are_swept() {
        let limiter = SlidingWindowLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();

        for last in 1..=50 {
            assert!(limiter.allow_at(ip(last), start));
        }
        assert_eq!(limiter.tracked_addresses(), 50);

        // One request after the window expires clears every idle entry.
        assert!(limiter.allow_at(ip(200), start + Duration::from_secs(60)));
        assert_eq!(limiter.tracked_addresses(), 1);
    }

    #[test]
    fn addresses_are_tracked_independently() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.allow_at(ip(4), now));
        assert!(!limiter.allow_at(ip(4), now));
        assert!(limiter.allow_at(ip(5), now));
    }
}
