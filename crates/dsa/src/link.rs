//! Bit-banged DSA link.
//!
//! Three open-drain style lines (DATA, STROBE, ACK) idle as inputs with
//! pull-up. Either side starts a transfer by pulling DATA low; the receiver
//! answers on ACK and the sender clocks 16 bits MSB first on STROBE, each
//! bit acknowledged on ACK. A final acknowledge phase reverses the roles of
//! the lines so the receiver can report success (DATA high) or a line error
//! (DATA low).
//!
//! Every wait is bounded by [`DSA_TIMEOUT`], re-armed at the start of the
//! synchronisation, transfer and acknowledge phases. Whatever the outcome,
//! the lines are released before the call returns.

use core::ops::{Deref, DerefMut};

use embedded_hal::digital::InputPin;
use platform::config::DSA_TIMEOUT;
use platform::{Clock, Deadline, FlexPin};

use crate::{DsaError, Message, Transport};

/// Map any HAL pin error onto [`DsaError::Pin`].
fn pin<T, E>(result: Result<T, E>) -> Result<T, DsaError> {
    result.map_err(|_| DsaError::Pin)
}

/// Spin until `line` reads `high`, or the deadline passes.
fn wait_level<P: InputPin, C: Clock>(
    line: &mut P,
    high: bool,
    clock: &C,
    deadline: &Deadline,
    _phase: &'static str,
) -> Result<(), DsaError> {
    loop {
        if pin(line.is_high())? == high {
            return Ok(());
        }
        if deadline.expired(clock.now()) {
            #[cfg(feature = "defmt")]
            defmt::debug!("DSA timeout in {}", _phase);
            return Err(DsaError::Timeout);
        }
    }
}

/// The three bus lines.
#[derive(Debug)]
pub struct DsaLines<P> {
    /// DSA_DATA
    pub data: P,
    /// DSA_STROBE
    pub strobe: P,
    /// DSA_ACK
    pub ack: P,
}

impl<P: FlexPin> DsaLines<P> {
    /// Release all three lines (input, pull-up).
    pub fn release(&mut self) -> Result<(), DsaError> {
        pin(self.data.set_as_input_pullup())?;
        pin(self.strobe.set_as_input_pullup())?;
        pin(self.ack.set_as_input_pullup())?;
        Ok(())
    }
}

/// Borrow of the lines for one transfer; releases them on drop.
struct Session<'a, P: FlexPin> {
    lines: &'a mut DsaLines<P>,
}

impl<'a, P: FlexPin> Session<'a, P> {
    fn new(lines: &'a mut DsaLines<P>) -> Self {
        Self { lines }
    }
}

impl<P: FlexPin> Deref for Session<'_, P> {
    type Target = DsaLines<P>;

    fn deref(&self) -> &Self::Target {
        self.lines
    }
}

impl<P: FlexPin> DerefMut for Session<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.lines
    }
}

impl<P: FlexPin> Drop for Session<'_, P> {
    fn drop(&mut self) {
        if self.lines.release().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("DSA: failed to release bus lines");
        }
    }
}

/// DSA bus master/slave over three [`FlexPin`]s.
pub struct DsaLink<P: FlexPin, C: Clock> {
    lines: DsaLines<P>,
    clock: C,
    deadline: Deadline,
    last_response: Message,
}

impl<P: FlexPin, C: Clock> DsaLink<P, C> {
    /// Create a link. Call [`Transport::init`] before the first transfer.
    pub fn new(data: P, strobe: P, ack: P, clock: C) -> Self {
        Self {
            lines: DsaLines { data, strobe, ack },
            clock,
            deadline: Deadline::new(DSA_TIMEOUT),
            last_response: Message::INVALID,
        }
    }

    /// The last message received successfully, or [`Message::INVALID`] if
    /// the most recent receive failed.
    pub fn last_response(&self) -> Message {
        self.last_response
    }

    /// Give the pins and clock back.
    pub fn release(self) -> (DsaLines<P>, C) {
        (self.lines, self.clock)
    }

    fn receive_inner(
        lines: &mut DsaLines<P>,
        clock: &C,
        deadline: &mut Deadline,
    ) -> Result<Message, DsaError> {
        let mut bus = Session::new(lines);

        // Synchronisation: answer the peer's DATA low with ACK low.
        deadline.arm(clock.now());
        pin(bus.ack.set_low())?;
        pin(bus.ack.set_as_output())?;
        wait_level(&mut bus.data, true, clock, deadline, "rx sync")?;
        pin(bus.ack.set_high())?;

        // Transfer: sample DATA on each STROBE falling edge.
        deadline.arm(clock.now());
        let mut raw: u16 = 0;
        for bit in (0..16u32).rev() {
            wait_level(&mut bus.strobe, false, clock, deadline, "rx strobe low")?;
            if pin(bus.data.is_high())? {
                raw |= 1u16.wrapping_shl(bit);
            }
            pin(bus.ack.set_low())?;
            wait_level(&mut bus.strobe, true, clock, deadline, "rx strobe high")?;
            pin(bus.ack.set_high())?;
        }

        // Acknowledge: we now drive DATA/STROBE, the peer drives ACK.
        pin(bus.data.set_high())?;
        pin(bus.data.set_as_output())?;
        pin(bus.strobe.set_high())?;
        pin(bus.strobe.set_as_output())?;
        pin(bus.ack.set_as_input_pullup())?;
        deadline.arm(clock.now());
        wait_level(&mut bus.ack, false, clock, deadline, "rx ack low")?;
        pin(bus.strobe.set_low())?;
        wait_level(&mut bus.ack, true, clock, deadline, "rx ack high")?;
        pin(bus.data.set_high())?;
        pin(bus.strobe.set_high())?;

        Ok(Message::from_raw(raw))
    }

    fn transmit_inner(
        lines: &mut DsaLines<P>,
        clock: &C,
        deadline: &mut Deadline,
        message: Message,
    ) -> Result<(), DsaError> {
        let mut bus = Session::new(lines);

        // Synchronisation: DATA low, wait for the peer to pulse ACK.
        deadline.arm(clock.now());
        pin(bus.data.set_low())?;
        pin(bus.data.set_as_output())?;
        wait_level(&mut bus.ack, false, clock, deadline, "tx sync ack low")?;
        pin(bus.data.set_high())?;
        wait_level(&mut bus.ack, true, clock, deadline, "tx sync ack high")?;

        // Transfer: present each bit, then pulse STROBE until ACKed.
        pin(bus.strobe.set_high())?;
        pin(bus.strobe.set_as_output())?;
        deadline.arm(clock.now());
        let raw = message.raw();
        for bit in (0..16u32).rev() {
            if raw & 1u16.wrapping_shl(bit) == 0 {
                pin(bus.data.set_low())?;
            }
            pin(bus.strobe.set_low())?;
            wait_level(&mut bus.ack, false, clock, deadline, "tx ack low")?;
            pin(bus.strobe.set_high())?;
            pin(bus.data.set_high())?;
            wait_level(&mut bus.ack, true, clock, deadline, "tx ack high")?;
        }

        // Acknowledge: the peer drives DATA/STROBE, we drive ACK.
        pin(bus.strobe.set_as_input_pullup())?;
        pin(bus.data.set_as_input_pullup())?;
        pin(bus.ack.set_high())?;
        pin(bus.ack.set_as_output())?;
        deadline.arm(clock.now());
        pin(bus.ack.set_low())?;
        wait_level(&mut bus.strobe, false, clock, deadline, "tx ack strobe low")?;
        let accepted = pin(bus.data.is_high())?;
        pin(bus.ack.set_high())?;
        wait_level(&mut bus.strobe, true, clock, deadline, "tx ack strobe high")?;

        if accepted {
            Ok(())
        } else {
            Err(DsaError::LineError)
        }
    }
}

impl<P: FlexPin, C: Clock> Transport for DsaLink<P, C> {
    fn init(&mut self) -> Result<(), DsaError> {
        self.lines.release()?;
        self.deadline.arm(self.clock.now());
        Ok(())
    }

    fn transmit_requested(&mut self) -> bool {
        self.lines.data.is_low().unwrap_or(false)
    }

    fn receive(&mut self) -> Result<Message, DsaError> {
        self.last_response = Message::INVALID;
        let result = Self::receive_inner(&mut self.lines, &self.clock, &mut self.deadline);
        match result {
            Ok(message) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("DSA RX {=u16:04X}", message.raw());
                self.last_response = message;
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("DSA RX failed: {}", _err);
            }
        }
        result
    }

    fn transmit(&mut self, message: Message) -> Result<(), DsaError> {
        let result =
            Self::transmit_inner(&mut self.lines, &self.clock, &mut self.deadline, message);
        #[cfg(feature = "defmt")]
        match result {
            Ok(()) => defmt::debug!("DSA TX {=u16:04X}", message.raw()),
            Err(err) => defmt::warn!("DSA TX {=u16:04X} failed: {}", message.raw(), err),
        }
        result
    }
}
