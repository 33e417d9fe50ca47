//! STM32 pin adapters
//!
//! `embassy_stm32::gpio::Flex` can switch direction at runtime but knows
//! nothing about [`platform::FlexPin`]. [`FlexLine`] bridges the two so the
//! DSA link runs unchanged on the real pins.
//!
//! Only compiled for the `hardware` feature.

use core::convert::Infallible;

use embassy_stm32::gpio::{AnyPin, Flex, Pull, Speed};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use platform::FlexPin;

/// One DSA bus line on an STM32 GPIO.
pub struct FlexLine<'d> {
    pin: Flex<'d, AnyPin>,
}

impl<'d> FlexLine<'d> {
    /// Wrap `pin` and release it (input, pull-up).
    pub fn new(pin: AnyPin) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_as_input(Pull::Up);
        Self { pin }
    }
}

impl ErrorType for FlexLine<'_> {
    type Error = Infallible;
}

impl InputPin for FlexLine<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_low())
    }
}

impl OutputPin for FlexLine<'_> {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }
}

impl FlexPin for FlexLine<'_> {
    fn set_as_input_pullup(&mut self) -> Result<(), Self::Error> {
        self.pin.set_as_input(Pull::Up);
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        // Bit periods are in the millisecond range; slow edges are plenty.
        self.pin.set_as_output(Speed::Low);
        Ok(())
    }
}
