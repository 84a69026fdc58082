//! Refresh-and-retry bookkeeping for a single `request()` call.
//!
//! A 401 on an authorized request earns exactly one token refresh and one
//! replay of the original request. Whatever the replay returns is final.

/// What to do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Refresh the session, then replay the request.
    RefreshAndRetry,
    DontRetry,
}

#[derive(Debug, Clone)]
pub struct RetryState {
    pub attempts: u32,
    max_refreshes: u32,
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryState {
    pub fn new() -> Self {
        Self {
            attempts: 0,
            max_refreshes: 1,
        }
    }

    pub fn should_retry_status(&mut self, status: u16, authorize: bool) -> RetryDecision {
        if status != 401 || !authorize {
            return RetryDecision::DontRetry;
        }
        if self.attempts >= self.max_refreshes {
            return RetryDecision::DontRetry;
        }
        self.attempts += 1;
        RetryDecision::RefreshAndRetry
    }
}
