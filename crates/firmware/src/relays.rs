//! GPIO relay driver for the mechanism supply rails
//!
//! Each rail relay coil is switched by one push-pull output through a
//! transistor; driving the pin high energises the relay.

use embedded_hal::digital::OutputPin;
use platform::{Relay, RelayDriver};

/// Relay driver over two `OutputPin`s.
///
/// Holds ownership of both coil pins. Construction releases both relays so
/// the mechanism starts unpowered regardless of the reset state of the pins.
pub struct GpioRelays<P: OutputPin> {
    aux_ac: P,
    aux_9v: P,
}

impl<P: OutputPin> GpioRelays<P> {
    /// Take the coil pins and release both relays.
    pub fn new(mut aux_ac: P, mut aux_9v: P) -> Self {
        // A broken pin surfaces on the first power step; nothing to do here.
        let _ = aux_9v.set_low();
        let _ = aux_ac.set_low();
        Self { aux_ac, aux_9v }
    }

    /// Give the pins back.
    pub fn release(self) -> (P, P) {
        (self.aux_ac, self.aux_9v)
    }
}

impl<P: OutputPin> RelayDriver for GpioRelays<P> {
    type Error = P::Error;

    fn set(&mut self, relay: Relay, on: bool) -> Result<(), Self::Error> {
        let pin = match relay {
            Relay::AuxAc => &mut self.aux_ac,
            Relay::Aux9V => &mut self.aux_9v,
        };
        if on {
            pin.set_high()
        } else {
            pin.set_low()
        }
    }
}
