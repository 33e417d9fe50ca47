//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits for use
//! in unit and integration tests:
//!
//! - [`ManualClock`]: a [`Clock`] that advances a fixed step on every read,
//!   so spin-waits with a [`crate::Deadline`] always terminate.
//! - [`MockRelays`]: a [`RelayDriver`] that records every write.
//! - [`SimBus`] / [`SimPin`]: a three-line DSA bus with a simulated CD
//!   mechanism on the far side.

#![cfg(any(test, feature = "std"))]

use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use embassy_time::Instant;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::{Clock, FlexPin, Relay, RelayDriver};

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Clock under test control.
///
/// Every call to [`Clock::now`] returns the current time and then advances it
/// by `step_ms`. A step of zero gives a frozen clock.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: Cell<u64>,
    step_ms: Cell<u64>,
}

impl ManualClock {
    /// Clock at `start_ms` that advances 1 ms per read.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
            step_ms: Cell::new(1),
        }
    }

    /// Set the per-read advance.
    pub fn set_step(&self, step_ms: u64) {
        self.step_ms.set(step_ms);
    }

    /// Jump forward.
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }

    /// Current time in milliseconds, without advancing.
    pub fn millis(&self) -> u64 {
        self.now_ms.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let now = self.now_ms.get();
        self.now_ms.set(now.saturating_add(self.step_ms.get()));
        Instant::from_millis(now)
    }
}

// ─── Relays ──────────────────────────────────────────────────────────────────

/// Mock relay bank. Records all writes for test assertions.
#[derive(Debug, Default)]
pub struct MockRelays {
    /// Current AUX AC level.
    pub aux_ac: bool,
    /// Current AUX 9V level.
    pub aux_9v: bool,
    /// Every write in order.
    pub history: heapless::Vec<(Relay, bool), 64>,
}

impl MockRelays {
    /// Both relays released, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `(aux_ac, aux_9v)` levels.
    pub fn levels(&self) -> (bool, bool) {
        (self.aux_ac, self.aux_9v)
    }
}

impl RelayDriver for MockRelays {
    type Error = Infallible;

    fn set(&mut self, relay: Relay, on: bool) -> Result<(), Self::Error> {
        match relay {
            Relay::AuxAc => self.aux_ac = on,
            Relay::Aux9V => self.aux_9v = on,
        }
        // Mock history saturates; tests never write more than the capacity.
        let _ = self.history.push((relay, on));
        Ok(())
    }
}

// ─── DSA bus simulation ──────────────────────────────────────────────────────

/// The three DSA signal lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// DSA_DATA
    Data = 0,
    /// DSA_STROBE
    Strobe = 1,
    /// DSA_ACK
    Ack = 2,
}

/// What the simulated mechanism is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Peer {
    Idle,
    // Mechanism → host
    TxSyncWaitAckLow,
    TxSyncWaitAckHigh,
    TxBitWaitAckLow { bit: u8 },
    TxBitWaitAckHigh { bit: u8 },
    TxAckWaitStrobeLow,
    TxAckWaitStrobeHigh,
    // Host → mechanism
    RxSyncWaitDataHigh,
    RxBitWaitStrobeLow { bit: u8, value: u16 },
    RxBitWaitStrobeHigh { bit: u8, value: u16 },
    RxAckWaitAckLow { value: u16 },
    RxAckWaitAckHigh { value: u16 },
    /// Stopped mid-transfer; never drives anything again until reset.
    Stalled,
}

#[derive(Debug)]
struct BusState {
    host_output: [bool; 3],
    host_level: [bool; 3],
    /// `true` = mechanism pulls the line low.
    peer_low: [bool; 3],
    peer: Peer,
    outgoing: heapless::Deque<u16, 8>,
    sending: u16,
    received: heapless::Vec<u16, 16>,
    host_acks: heapless::Vec<bool, 16>,
    responsive: bool,
    reject_next: bool,
    stall_after_bits: Option<u8>,
    bits_sent: u8,
    reads: u32,
}

impl BusState {
    fn level(&self, line: Line) -> bool {
        let i = line as usize;
        let host_low = self.host_output.get(i).copied().unwrap_or(false)
            && !self.host_level.get(i).copied().unwrap_or(true);
        let peer_low = self.peer_low.get(i).copied().unwrap_or(false);
        !(host_low || peer_low)
    }

    fn drive(&mut self, line: Line, low: bool) {
        if let Some(l) = self.peer_low.get_mut(line as usize) {
            *l = low;
        }
    }

    fn release_all(&mut self) {
        self.peer_low = [false; 3];
    }

    fn start_tx_if_idle(&mut self) {
        if self.peer != Peer::Idle || !self.responsive {
            return;
        }
        if let Some(message) = self.outgoing.pop_front() {
            self.sending = message;
            self.bits_sent = 0;
            self.drive(Line::Data, true);
            self.peer = Peer::TxSyncWaitAckLow;
        }
    }

    fn tx_bit(&mut self, bit: u8) {
        if self.stall_after_bits.is_some_and(|n| self.bits_sent >= n) {
            self.release_all();
            self.peer = Peer::Stalled;
            return;
        }
        let set = (self.sending >> bit) & 1 == 1;
        self.drive(Line::Data, !set);
        self.drive(Line::Strobe, true);
        self.bits_sent = self.bits_sent.saturating_add(1);
        self.peer = Peer::TxBitWaitAckLow { bit };
    }

    /// Advance the mechanism one transition. Returns `false` when nothing changed.
    #[allow(clippy::arithmetic_side_effects)] // bit > 0 checked before decrement
    fn step(&mut self) -> bool {
        let ack = self.level(Line::Ack);
        let strobe = self.level(Line::Strobe);
        let data = self.level(Line::Data);
        match self.peer {
            Peer::Idle => {
                if self.responsive && !data {
                    self.drive(Line::Ack, true);
                    self.peer = Peer::RxSyncWaitDataHigh;
                    true
                } else {
                    false
                }
            }
            Peer::Stalled => false,

            Peer::TxSyncWaitAckLow if !ack => {
                self.drive(Line::Data, false);
                self.peer = Peer::TxSyncWaitAckHigh;
                true
            }
            Peer::TxSyncWaitAckHigh if ack => {
                self.tx_bit(15);
                true
            }
            Peer::TxBitWaitAckLow { bit } if !ack => {
                self.drive(Line::Strobe, false);
                self.drive(Line::Data, false);
                self.peer = Peer::TxBitWaitAckHigh { bit };
                true
            }
            Peer::TxBitWaitAckHigh { bit } if ack => {
                if bit == 0 {
                    self.drive(Line::Ack, true);
                    self.peer = Peer::TxAckWaitStrobeLow;
                } else {
                    self.tx_bit(bit - 1);
                }
                true
            }
            Peer::TxAckWaitStrobeLow if !strobe => {
                let _ = self.host_acks.push(data);
                self.drive(Line::Ack, false);
                self.peer = Peer::TxAckWaitStrobeHigh;
                true
            }
            Peer::TxAckWaitStrobeHigh if strobe => {
                self.peer = Peer::Idle;
                self.start_tx_if_idle();
                true
            }

            Peer::RxSyncWaitDataHigh if data => {
                self.drive(Line::Ack, false);
                self.peer = Peer::RxBitWaitStrobeLow { bit: 15, value: 0 };
                true
            }
            Peer::RxBitWaitStrobeLow { bit, value } if !strobe => {
                let value = if data { value | (1 << bit) } else { value };
                self.drive(Line::Ack, true);
                self.peer = Peer::RxBitWaitStrobeHigh { bit, value };
                true
            }
            Peer::RxBitWaitStrobeHigh { bit, value } if strobe => {
                self.drive(Line::Ack, false);
                self.peer = if bit == 0 {
                    Peer::RxAckWaitAckLow { value }
                } else {
                    Peer::RxBitWaitStrobeLow {
                        bit: bit - 1,
                        value,
                    }
                };
                true
            }
            Peer::RxAckWaitAckLow { value } if !ack => {
                self.drive(Line::Strobe, true);
                if self.reject_next {
                    self.reject_next = false;
                    self.drive(Line::Data, true);
                }
                self.peer = Peer::RxAckWaitAckHigh { value };
                true
            }
            Peer::RxAckWaitAckHigh { value } if ack => {
                self.release_all();
                let _ = self.received.push(value);
                self.peer = Peer::Idle;
                self.start_tx_if_idle();
                true
            }
            _ => false,
        }
    }

    fn settle(&mut self) {
        // Each transition reacts to a different line level, so the chain is short.
        for _ in 0..8 {
            if !self.step() {
                break;
            }
        }
    }
}

/// A DSA bus with a simulated CDPro2 mechanism on the far end.
///
/// The mechanism is advanced lazily: every time the host reads a line the
/// peer reacts to the current line levels, following the same handshake as
/// the real drive. Host pins are obtained with [`SimBus::pin`].
#[derive(Debug)]
pub struct SimBus {
    state: RefCell<BusState>,
}

impl SimBus {
    /// Idle bus, responsive mechanism, nothing queued.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(BusState {
                host_output: [false; 3],
                host_level: [true; 3],
                peer_low: [false; 3],
                peer: Peer::Idle,
                outgoing: heapless::Deque::new(),
                sending: 0,
                received: heapless::Vec::new(),
                host_acks: heapless::Vec::new(),
                responsive: true,
                reject_next: false,
                stall_after_bits: None,
                bits_sent: 0,
                reads: 0,
            }),
        }
    }

    /// Host-side handle for one line.
    pub fn pin(&self, line: Line) -> SimPin<'_> {
        SimPin { bus: self, line }
    }

    /// Queue a message for the mechanism to send. Returns `false` if the
    /// outgoing queue is full.
    pub fn queue_message(&self, message: u16) -> bool {
        let mut s = self.state.borrow_mut();
        let queued = s.outgoing.push_back(message).is_ok();
        s.start_tx_if_idle();
        queued
    }

    /// A silent mechanism never acknowledges anything.
    pub fn set_responsive(&self, responsive: bool) {
        self.state.borrow_mut().responsive = responsive;
    }

    /// Make the mechanism flag a line error on the next message it receives.
    pub fn reject_next(&self) {
        self.state.borrow_mut().reject_next = true;
    }

    /// Stop transmitting after `bits` bits of the next outgoing message.
    pub fn stall_after_bits(&self, bits: u8) {
        self.state.borrow_mut().stall_after_bits = Some(bits);
    }

    /// Messages the mechanism received, in order.
    pub fn received(&self) -> heapless::Vec<u16, 16> {
        self.state.borrow().received.clone()
    }

    /// For each message the mechanism sent: did the host acknowledge it OK?
    pub fn host_acks(&self) -> heapless::Vec<bool, 16> {
        let mut s = self.state.borrow_mut();
        s.settle();
        s.host_acks.clone()
    }

    /// Current line level as seen on the wire.
    pub fn level(&self, line: Line) -> bool {
        self.state.borrow().level(line)
    }

    /// `true` if the host has `line` configured as an output.
    pub fn host_driving(&self, line: Line) -> bool {
        self.state
            .borrow()
            .host_output
            .get(line as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Number of host line reads so far.
    pub fn reads(&self) -> u32 {
        self.state.borrow().reads
    }

    /// Drop any half-finished transfer and release all mechanism-side lines.
    pub fn reset_peer(&self) {
        let mut s = self.state.borrow_mut();
        s.release_all();
        s.peer = Peer::Idle;
        s.stall_after_bits = None;
        s.start_tx_if_idle();
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Host side of one [`SimBus`] line.
#[derive(Debug)]
pub struct SimPin<'a> {
    bus: &'a SimBus,
    line: Line,
}

impl ErrorType for SimPin<'_> {
    type Error = Infallible;
}

impl InputPin for SimPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut s = self.bus.state.borrow_mut();
        s.reads = s.reads.saturating_add(1);
        s.settle();
        Ok(s.level(self.line))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}

impl OutputPin for SimPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if let Some(l) = self.bus.state.borrow_mut().host_level.get_mut(self.line as usize) {
            *l = false;
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if let Some(l) = self.bus.state.borrow_mut().host_level.get_mut(self.line as usize) {
            *l = true;
        }
        Ok(())
    }
}

impl FlexPin for SimPin<'_> {
    fn set_as_input_pullup(&mut self) -> Result<(), Self::Error> {
        let mut s = self.bus.state.borrow_mut();
        if let Some(o) = s.host_output.get_mut(self.line as usize) {
            *o = false;
        }
        if let Some(l) = s.host_level.get_mut(self.line as usize) {
            *l = true;
        }
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        if let Some(o) = self.bus.state.borrow_mut().host_output.get_mut(self.line as usize) {
            *o = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_manual_clock_advances_per_read() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now(), Instant::from_millis(10));
        assert_eq!(clock.now(), Instant::from_millis(11));
        clock.set_step(0);
        assert_eq!(clock.now(), Instant::from_millis(12));
        assert_eq!(clock.now(), Instant::from_millis(12));
    }

    #[test]
    fn test_mock_relays_record_writes() {
        let mut relays = MockRelays::new();
        relays.set(Relay::AuxAc, true).unwrap();
        relays.set(Relay::Aux9V, true).unwrap();
        relays.set(Relay::Aux9V, false).unwrap();
        assert_eq!(relays.levels(), (true, false));
        assert_eq!(relays.history.len(), 3);
    }

    #[test]
    fn test_idle_bus_reads_high() {
        let bus = SimBus::new();
        let mut data = bus.pin(Line::Data);
        assert!(data.is_high().unwrap());
    }

    #[test]
    fn test_queued_message_pulls_data_low() {
        let bus = SimBus::new();
        assert!(bus.queue_message(0x2001));
        let mut data = bus.pin(Line::Data);
        assert!(data.is_low().unwrap());
    }

    #[test]
    fn test_host_output_low_wins() {
        let bus = SimBus::new();
        bus.set_responsive(false);
        let mut strobe = bus.pin(Line::Strobe);
        strobe.set_as_output().unwrap();
        strobe.set_low().unwrap();
        assert!(!bus.level(Line::Strobe));
        strobe.set_as_input_pullup().unwrap();
        assert!(bus.level(Line::Strobe));
    }

    #[test]
    fn test_mechanism_answers_sync_request() {
        let bus = SimBus::new();
        let mut data = bus.pin(Line::Data);
        let mut ack = bus.pin(Line::Ack);
        data.set_as_output().unwrap();
        data.set_low().unwrap();
        assert!(ack.is_low().unwrap(), "mechanism pulls ACK low on sync");
        data.set_high().unwrap();
        assert!(ack.is_high().unwrap(), "mechanism releases ACK after DATA rises");
    }
}
