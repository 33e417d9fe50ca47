//! CD mechanism supply sequencing.
//!
//! The CDPro2 needs its rails switched in order with minimum gaps between
//! them. Both directions are walked through a fixed step table, one step per
//! call, with the controller arming a timer for each step's delay:
//!
//! ## Power-up:
//! ```text
//! [Off] --AC on--> (750 ms) --9V on--> (250 ms) --> [On]
//! ```
//!
//! ## Power-down:
//! ```text
//! [On] --> (250 ms) --9V off--> (750 ms) --AC off--> [Off]
//! ```
//!
//! The up table is walked from index 0 and ends on index 2; the down table
//! is walked from index 2 and ends on index 0, so a single cursor serves
//! both directions. A step with a zero timeout is terminal: no timer is
//! armed and nothing advances until the opposite direction is requested.

use platform::config::{POWER_RAIL_DELAY_MS, POWER_SETTLE_DELAY_MS};
use platform::{Relay, RelayDriver};

/// Mechanism supply state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Both rails off.
    #[default]
    Off,
    /// Walking the up table.
    PoweringUp,
    /// Walking the down table.
    PoweringDown,
    /// Both rails on, mechanism usable.
    On,
}

/// One entry of a sequence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSequenceStep {
    /// Cursor value after this step.
    pub next: u8,
    /// Delay before the following step, 0 = terminal.
    pub timeout_ms: u16,
    /// State published by this step.
    pub state: PowerState,
    /// AUX AC relay level.
    pub aux_ac: bool,
    /// AUX 9V relay level.
    pub aux_9v: bool,
}

const fn step(
    next: u8,
    timeout_ms: u16,
    state: PowerState,
    aux_ac: bool,
    aux_9v: bool,
) -> PowerSequenceStep {
    PowerSequenceStep {
        next,
        timeout_ms,
        state,
        aux_ac,
        aux_9v,
    }
}

/// Power-up table, entered at index 0.
pub const POWER_UP_SEQUENCE: [PowerSequenceStep; 3] = [
    step(1, POWER_RAIL_DELAY_MS, PowerState::PoweringUp, true, false),
    step(2, POWER_SETTLE_DELAY_MS, PowerState::PoweringUp, true, true),
    step(2, 0, PowerState::On, true, true),
];

/// Power-down table, entered at index 2.
pub const POWER_DOWN_SEQUENCE: [PowerSequenceStep; 3] = [
    step(0, 0, PowerState::Off, false, false),
    step(0, POWER_RAIL_DELAY_MS, PowerState::PoweringDown, true, false),
    step(1, POWER_SETTLE_DELAY_MS, PowerState::PoweringDown, true, true),
];

/// Table-driven supply sequencer. Sole writer of the relay outputs.
pub struct PowerSequencer<R: RelayDriver> {
    relays: R,
    state: PowerState,
    cursor: u8,
}

impl<R: RelayDriver> PowerSequencer<R> {
    /// Sequencer in [`PowerState::Off`]. Relays are not touched until
    /// [`PowerSequencer::init`].
    pub const fn new(relays: R) -> Self {
        Self {
            relays,
            state: PowerState::Off,
            cursor: 0,
        }
    }

    /// Drive both relays to their off level.
    pub fn init(&mut self) {
        self.apply_relays(false, false);
    }

    /// Current state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// `true` when fully on.
    pub fn is_on(&self) -> bool {
        self.state == PowerState::On
    }

    /// `true` while walking either table.
    pub fn in_progress(&self) -> bool {
        matches!(self.state, PowerState::PoweringUp | PowerState::PoweringDown)
    }

    /// The relay driver.
    pub fn relays(&self) -> &R {
        &self.relays
    }

    /// Start the up table and apply its first step.
    pub fn begin_power_up(&mut self) -> PowerSequenceStep {
        self.state = PowerState::PoweringUp;
        self.step()
    }

    /// Start the down table and apply its first step.
    pub fn begin_power_down(&mut self) -> PowerSequenceStep {
        self.state = PowerState::PoweringDown;
        self.step()
    }

    /// Apply the step under the cursor and move the cursor on.
    ///
    /// The table is chosen by the current state: up while powering up,
    /// down otherwise. Returns the applied step so the caller can arm its
    /// timer with [`PowerSequenceStep::timeout_ms`].
    pub fn step(&mut self) -> PowerSequenceStep {
        let table = if self.state == PowerState::PoweringUp {
            &POWER_UP_SEQUENCE
        } else {
            &POWER_DOWN_SEQUENCE
        };
        // The cursor only ever holds `next` values from the tables, all in range.
        let step = table
            .get(usize::from(self.cursor))
            .copied()
            .unwrap_or(POWER_DOWN_SEQUENCE[0]);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "CD power: step {} next={} t={}ms state={} AC={} 9V={}",
            self.cursor,
            step.next,
            step.timeout_ms,
            step.state,
            step.aux_ac,
            step.aux_9v
        );

        self.cursor = step.next;
        self.state = step.state;
        self.apply_relays(step.aux_ac, step.aux_9v);
        step
    }

    fn apply_relays(&mut self, aux_ac: bool, aux_9v: bool) {
        for (relay, on) in [(Relay::AuxAc, aux_ac), (Relay::Aux9V, aux_9v)] {
            if self.relays.set(relay, on).is_err() {
                #[cfg(feature = "defmt")]
                defmt::error!("CD power: relay {} write failed", relay);
            }
        }
    }
}
