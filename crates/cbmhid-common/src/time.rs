/// A monotonic microsecond time source, injected into the scan loop so its
/// rate gate can be driven deterministically in tests instead of reading a
/// real hardware counter.
///
/// Implementations are expected to wrap a free-running cycle counter (see
/// `cbmhid-peripheral::clock::DwtClock`). If the underlying counter is not
/// monotonic the rate gate degrades gracefully: scans simply run on every
/// call instead of being throttled. There is no correctness dependency on
/// monotonicity beyond that.
pub trait Clock {
    fn now_us(&self) -> u64;

    /// Blocks until at least `duration_us` microseconds have elapsed.
    /// The default spins on `now_us`, which is correct for a real
    /// free-running counter (it advances on its own regardless of how
    /// often it's polled). Test clocks that only move when explicitly
    /// told to should override this instead of spinning forever.
    fn delay_us(&self, duration_us: u64) {
        let start = self.now_us();
        while self.now_us().wrapping_sub(start) < duration_us {}
    }
}

/// A clock entirely driven by the caller, for tests that need to assert
/// exact scan cadence without a real timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now_us: core::cell::Cell<u64>,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self {
            now_us: core::cell::Cell::new(0),
        }
    }

    pub fn set(&self, now_us: u64) {
        self.now_us.set(now_us);
    }

    pub fn advance(&self, delta_us: u64) {
        self.now_us.set(self.now_us.get() + delta_us);
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    /// Has no wall clock to wait on, so it advances itself instead of
    /// spinning: a scan's CAS settle delay becomes an instantaneous time
    /// jump rather than a hang.
    fn delay_us(&self, duration_us: u64) {
        self.advance(duration_us);
    }
}
