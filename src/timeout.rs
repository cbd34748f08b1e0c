//! Timeouts bounding the transmit and receive poll loops
//!
//! The driver never sleeps while waiting for the radio. It busy-polls the IRQ flags and checks
//! a [`Timeout`] once per iteration, so the timeout is also the only way to cancel a pending
//! [`send`](crate::Ra02::send) or [`recv`](crate::Ra02::recv): call [`Timeout::expire`] on it.

/// A restartable deadline.
pub trait Timeout {
    /// Sets the duration and starts counting from now
    fn start(&mut self, duration_ms: u32);

    /// Starts counting again from now with the current duration
    fn restart(&mut self);

    /// Whether the deadline has passed
    fn is_expired(&self) -> bool;

    /// Forces the timeout to the expired state
    ///
    /// A later [`restart`](Timeout::restart) keeps it expired; only
    /// [`start`](Timeout::start) arms it again.
    fn expire(&mut self);
}

impl<T: Timeout + ?Sized> Timeout for &mut T {
    fn start(&mut self, duration_ms: u32) {
        T::start(self, duration_ms)
    }

    fn restart(&mut self) {
        T::restart(self)
    }

    fn is_expired(&self) -> bool {
        T::is_expired(self)
    }

    fn expire(&mut self) {
        T::expire(self)
    }
}

#[cfg(any(test, feature = "std"))]
pub use self::std_timeout::StdTimeout;

#[cfg(any(test, feature = "std"))]
mod std_timeout {
    use std::time::{Duration, Instant};

    use super::Timeout;

    /// [`Timeout`] measured against the monotonic [`Instant`] clock
    ///
    /// A freshly created timeout has a zero duration and therefore reads as expired.
    #[derive(Debug, Clone, Copy)]
    pub struct StdTimeout {
        start: Instant,
        duration: Duration,
    }

    impl StdTimeout {
        /// Creates a timeout that starts counting immediately
        pub fn started(duration_ms: u32) -> Self {
            let mut timeout = Self::default();
            timeout.start(duration_ms);
            timeout
        }
    }

    impl Default for StdTimeout {
        fn default() -> Self {
            Self {
                start: Instant::now(),
                duration: Duration::ZERO,
            }
        }
    }

    impl Timeout for StdTimeout {
        fn start(&mut self, duration_ms: u32) {
            self.duration = Duration::from_millis(duration_ms.into());
            self.start = Instant::now();
        }

        fn restart(&mut self) {
            self.start = Instant::now();
        }

        fn is_expired(&self) -> bool {
            self.start.elapsed() >= self.duration
        }

        fn expire(&mut self) {
            self.duration = Duration::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_timeout_is_expired() {
        assert!(StdTimeout::default().is_expired());
    }

    #[test]
    fn started_timeout_runs_until_deadline() {
        let mut timeout = StdTimeout::started(60_000);
        assert!(!timeout.is_expired());

        timeout.start(0);
        assert!(timeout.is_expired());
    }

    #[test]
    fn expire_survives_restart() {
        let mut timeout = StdTimeout::started(60_000);
        timeout.expire();
        assert!(timeout.is_expired());

        timeout.restart();
        assert!(timeout.is_expired());

        timeout.start(60_000);
        assert!(!timeout.is_expired());
    }
}
