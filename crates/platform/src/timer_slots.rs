//! General purpose "user space" timers.
//!
//! Slots are updated from the main loop with the current timestamp. They are
//! not precise: a slot is only seen as elapsed on the first [`TimerSlots::tick`]
//! after its timeout, which is good enough for UI and power-sequencing delays.

use embassy_time::{Duration, Instant};

/// Named timer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TimerSlot {
    /// Step timing for the CD mechanism power sequence.
    CdPower = 0,
    /// Expiry of the transient CD error text.
    CdError = 1,
}

impl TimerSlot {
    /// Number of slots.
    pub const COUNT: usize = 2;

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    start: Instant,
    timeout: Option<Duration>,
    elapsed: bool,
}

impl Slot {
    const IDLE: Self = Self {
        start: Instant::from_ticks(0),
        timeout: None,
        elapsed: false,
    };
}

/// Fixed set of one-shot timers.
#[derive(Debug, Clone)]
pub struct TimerSlots {
    slots: [Slot; TimerSlot::COUNT],
    now: Instant,
}

impl TimerSlots {
    /// All slots idle.
    pub const fn new() -> Self {
        Self {
            slots: [Slot::IDLE; TimerSlot::COUNT],
            now: Instant::from_ticks(0),
        }
    }

    /// Advance all slots to `now`.
    pub fn tick(&mut self, now: Instant) {
        for slot in &mut self.slots {
            if let Some(timeout) = slot.timeout {
                if now.saturating_duration_since(slot.start) >= timeout {
                    slot.elapsed = true;
                    slot.timeout = None;
                }
            }
        }
        self.now = now;
    }

    /// Start `slot` counting `timeout_ms` from the last tick.
    ///
    /// A zero timeout leaves the slot idle (nothing will elapse).
    pub fn arm(&mut self, slot: TimerSlot, timeout_ms: u16) {
        let now = self.now;
        if let Some(s) = self.slots.get_mut(slot.index()) {
            s.start = now;
            s.timeout = (timeout_ms > 0).then(|| Duration::from_millis(u64::from(timeout_ms)));
            s.elapsed = false;
        }
    }

    /// Cancel `slot` and clear its elapsed flag.
    pub fn reset(&mut self, slot: TimerSlot) {
        if let Some(s) = self.slots.get_mut(slot.index()) {
            s.timeout = None;
            s.elapsed = false;
        }
    }

    /// `true` once the armed timeout has passed. Stays set until re-armed or reset.
    pub fn elapsed(&self, slot: TimerSlot) -> bool {
        self.slots.get(slot.index()).is_some_and(|s| s.elapsed)
    }

    /// `true` while `slot` is counting.
    pub fn armed(&self, slot: TimerSlot) -> bool {
        self.slots
            .get(slot.index())
            .is_some_and(|s| s.timeout.is_some())
    }
}

impl Default for TimerSlots {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_slot_elapses_after_timeout() {
        let mut timers = TimerSlots::new();
        timers.tick(at(100));
        timers.arm(TimerSlot::CdPower, 750);
        timers.tick(at(849));
        assert!(!timers.elapsed(TimerSlot::CdPower));
        timers.tick(at(850));
        assert!(timers.elapsed(TimerSlot::CdPower));
        assert!(!timers.armed(TimerSlot::CdPower));
    }

    #[test]
    fn test_zero_timeout_never_elapses() {
        let mut timers = TimerSlots::new();
        timers.arm(TimerSlot::CdPower, 0);
        timers.tick(at(60_000));
        assert!(!timers.elapsed(TimerSlot::CdPower));
        assert!(!timers.armed(TimerSlot::CdPower));
    }

    #[test]
    fn test_reset_clears_elapsed() {
        let mut timers = TimerSlots::new();
        timers.arm(TimerSlot::CdError, 10);
        timers.tick(at(10));
        assert!(timers.elapsed(TimerSlot::CdError));
        timers.reset(TimerSlot::CdError);
        assert!(!timers.elapsed(TimerSlot::CdError));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut timers = TimerSlots::new();
        timers.arm(TimerSlot::CdError, 2_000);
        timers.arm(TimerSlot::CdPower, 250);
        timers.tick(at(300));
        assert!(timers.elapsed(TimerSlot::CdPower));
        assert!(!timers.elapsed(TimerSlot::CdError));
    }

    #[test]
    fn test_rearm_clears_elapsed() {
        let mut timers = TimerSlots::new();
        timers.arm(TimerSlot::CdPower, 10);
        timers.tick(at(10));
        timers.arm(TimerSlot::CdPower, 10);
        assert!(!timers.elapsed(TimerSlot::CdPower));
        timers.tick(at(20));
        assert!(timers.elapsed(TimerSlot::CdPower));
    }
}
