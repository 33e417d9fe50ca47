//! The single in-flight mechanism command.

use dsa::{DsaStatus, Opcode};

/// Which completion logic owns the in-flight command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseHandler {
    /// `PLAY_TITLE` / `PAUSE_RELEASE`: done on `FOUND`, now playing.
    Play,
    /// `PAUSE`: done on `FOUND`.
    Pause,
    /// `READ_TOC`: done once the TOC is complete.
    ReadToc,
}

/// An instruction sent to the mechanism and awaiting its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AsyncCommand {
    /// Instruction sent.
    pub opcode: Opcode,
    /// Its parameter.
    pub param: u8,
    /// Completion logic.
    pub handler: ResponseHandler,
    /// Outcome of the transmit.
    pub dsa_status: DsaStatus,
}
