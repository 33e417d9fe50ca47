//! Relay outputs
//!
//! The CD mechanism is supplied through two relay-switched rails. Only the
//! power sequencer writes them; nothing reads them back.

/// Relay identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Relay {
    /// Auxiliary AC supply (mechanism 5V/logic supply transformer).
    AuxAc,
    /// Auxiliary 9V rail (mechanism motors and laser).
    Aux9V,
}

/// Relay driver interface.
pub trait RelayDriver {
    /// Error type
    type Error: core::fmt::Debug;

    /// Energise (`true`) or release (`false`) a relay.
    fn set(&mut self, relay: Relay, on: bool) -> Result<(), Self::Error>;
}

impl<R: RelayDriver + ?Sized> RelayDriver for &mut R {
    type Error = R::Error;

    fn set(&mut self, relay: Relay, on: bool) -> Result<(), Self::Error> {
        (**self).set(relay, on)
    }
}
