//! Per-process request budget for rate-limited sources.
//!
//! A secondary lookup can fire up to three requests per scan. The budget caps
//! the total rate across the whole process; when it is spent the request is
//! skipped instead of queued, so a scan never waits on the limiter.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;

/// Default number of secondary requests allowed per minute.
pub const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = nonzero!(30u32);

/// A non-blocking token bucket shared by all requests to one source.
pub struct RequestBudget {
    limiter: DefaultDirectRateLimiter,
}

impl std::fmt::Debug for RequestBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBudget").finish_non_exhaustive()
    }
}

impl RequestBudget {
    /// Allows `per_minute` requests per minute, with bursts up to the same size.
    pub fn per_minute(per_minute: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        }
    }

    /// Takes one request from the budget; `false` means the caller must skip
    /// the request.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for RequestBudget {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}
