//! Rate limiting utilities

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter type alias
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default fire messages accepted per second per connection
pub const FIRE_RATE_LIMIT: u32 = 10;

/// Create a rate limiter with the specified requests per second
pub fn create_limiter(requests_per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Per-connection limiter for fire messages
#[derive(Clone)]
pub struct FireRateLimiter {
    limiter: Arc<Limiter>,
}

impl FireRateLimiter {
    pub fn new(per_second: u32) -> Self {
        Self {
            limiter: create_limiter(per_second),
        }
    }

    /// Check if a fire message is allowed (returns true if allowed)
    pub fn check_fire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for FireRateLimiter {
    fn default() -> Self {
        Self::new(FIRE_RATE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_beyond_quota_is_rejected() {
        let limiter = FireRateLimiter::new(2);
        assert!(limiter.check_fire());
        assert!(limiter.check_fire());
        assert!(!limiter.check_fire());
    }

    #[test]
    fn zero_quota_still_allows_one() {
        let limiter = FireRateLimiter::new(0);
        assert!(limiter.check_fire());
    }
}
