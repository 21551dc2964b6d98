//! Bounded polling
//!
//! Every wait-until loop in the crate goes through this module so that nothing
//! can spin forever on a stuck sensor or a stalled wheel. Time passes only
//! through an injected [`DelayNs`], which is embassy's `Delay` on the board and
//! a simulated clock in tests.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Fixed number of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Budget {
    limit: u32,
    used: u32,
}

/// Returned once a [`Budget`] has nothing left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exhausted {
    /// Attempts spent before giving up
    pub spent: u32,
}

impl Budget {
    pub const fn new(limit: u32) -> Self {
        Self { limit, used: 0 }
    }

    /// Take one attempt, returning its zero-based index
    pub fn try_spend(&mut self) -> Result<u32, Exhausted> {
        if self.used >= self.limit {
            return Err(Exhausted { spent: self.used });
        }
        let index = self.used;
        self.used += 1;
        Ok(index)
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.limit - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }
}

/// How often to probe and how many probes to allow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_polls: u32) -> Self {
        Self { interval, max_polls }
    }

    /// Enough polls at `interval` to cover `timeout`, at least one
    pub fn for_timeout(interval: Duration, timeout: Duration) -> Self {
        let step = interval.as_micros().max(1);
        let polls = timeout.as_micros().div_ceil(step).max(1);
        Self {
            interval,
            max_polls: u32::try_from(polls).unwrap_or(u32::MAX),
        }
    }

    pub fn budget(&self) -> Budget {
        Budget::new(self.max_polls)
    }
}

/// Value produced by a successful [`poll_until`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polled<T> {
    pub value: T,
    /// Probes made, the successful one included
    pub polls: u32,
}

/// Probe until `probe` yields a value or the policy runs out
///
/// The probe receives the zero-based attempt index. The delay runs after each
/// failed probe, never before the first one.
pub async fn poll_until<D, T, F>(delay: &mut D, policy: PollPolicy, mut probe: F) -> Result<Polled<T>, Exhausted>
where
    D: DelayNs,
    F: FnMut(u32) -> Option<T>,
{
    let mut budget = policy.budget();
    loop {
        let attempt = budget.try_spend()?;
        if let Some(value) = probe(attempt) {
            return Ok(Polled {
                value,
                polls: attempt + 1,
            });
        }
        wait(delay, policy.interval).await;
    }
}

/// Suspend for `duration`
pub async fn wait<D: DelayNs>(delay: &mut D, duration: Duration) {
    let micros = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
    delay.delay_us(micros).await;
}
