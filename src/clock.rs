//! Wall-clock source used to age the register cache.

/// Monotonic time in seconds, provided by the host (RTC, systick counter, uptime, ...).
///
/// Any `Fn() -> f64` closure is a clock, so a driver can be built with
/// `|| ticks() as f64 / TICK_HZ`.
pub trait Clock {
    /// Current time in seconds.
    fn now(&self) -> f64;
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    fn now(&self) -> f64 {
        self()
    }
}
