//! GPIO line abstractions
//!
//! The DSA bus needs pins that change direction in the middle of a transfer:
//! a line is an input with pull-up while the peer drives it, and a push-pull
//! output while we drive it. `embedded-hal` 1.0 has no direction-switching
//! trait, so [`FlexPin`] extends its digital traits with the two mode changes.

use embedded_hal::digital::{InputPin, OutputPin};

/// A bidirectional GPIO line.
///
/// Idle configuration is input with the internal pull-up enabled, so a line
/// that nobody drives reads high.
pub trait FlexPin: InputPin + OutputPin {
    /// Switch to input mode with the pull-up enabled (released line).
    fn set_as_input_pullup(&mut self) -> Result<(), Self::Error>;

    /// Switch to push-pull output mode.
    ///
    /// The output level after switching is unspecified; callers set it
    /// explicitly with [`OutputPin::set_high`] / [`OutputPin::set_low`].
    fn set_as_output(&mut self) -> Result<(), Self::Error>;
}
