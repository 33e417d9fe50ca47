//! 16-bit DSA message codec.
//!
//! A message is an opcode in the high byte and a single parameter byte in
//! the low byte, transmitted MSB first. The all-zero value is reserved as
//! "no message".

use core::fmt;

/// One DSA bus message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message(u16);

impl Message {
    /// Sentinel for "no message".
    pub const INVALID: Self = Self(0);

    /// Pack an opcode and its parameter.
    pub const fn pack(opcode: u8, data: u8) -> Self {
        Self(u16::from_be_bytes([opcode, data]))
    }

    /// Wrap a raw wire value.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw wire value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// High byte: opcode (outbound) or response code (inbound).
    pub const fn opcode(self) -> u8 {
        let [opcode, _] = self.0.to_be_bytes();
        opcode
    }

    /// Low byte: parameter.
    pub const fn data(self) -> u8 {
        let [_, data] = self.0.to_be_bytes();
        data
    }

    /// `false` for [`Message::INVALID`].
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u16> for Message {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Message> for u16 {
    fn from(message: Message) -> Self {
        message.0
    }
}

impl fmt::UpperHex for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
