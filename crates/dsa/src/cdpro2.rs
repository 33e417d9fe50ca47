//! CDPro2 mechanism command set.
//!
//! Opcodes go in the high byte of an outbound [`Message`], response codes in
//! the high byte of an inbound one. Only the subset the controller uses is
//! modelled; unknown response codes decode to `Err(raw)` and are ignored.

use crate::Message;

/// Outbound instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Start playback at the title given in the parameter.
    PlayTitle = 0x01,
    /// Stop the disc.
    Stop = 0x02,
    /// Read the table of contents.
    ReadToc = 0x03,
    /// Pause playback.
    Pause = 0x04,
    /// Resume from pause.
    PauseRelease = 0x05,
    /// Request the length of a title.
    GetTitleLength = 0x09,
    /// Request the total disc time.
    GetCompleteTime = 0x0d,
    /// Set the playback mode bits.
    SetMode = 0x15,
    /// Spin the disc up without playing.
    SpinUp = 0x18,
    /// Request the disc identifier bytes.
    GetDiscIdentifiers = 0x30,
}

impl Opcode {
    /// Build the wire message for this opcode.
    pub const fn message(self, param: u8) -> Message {
        Message::pack(self as u8, param)
    }

    /// Short mnemonic for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PlayTitle => "PLAY_TITLE",
            Self::Stop => "STOP",
            Self::ReadToc => "READ_TOC",
            Self::Pause => "PAUSE",
            Self::PauseRelease => "PAUSE_RELEASE",
            Self::GetTitleLength => "GET_TITLE_LENGTH",
            Self::GetCompleteTime => "GET_COMPLETE_TIME",
            Self::SetMode => "SET_MODE",
            Self::SpinUp => "SPIN_UP",
            Self::GetDiscIdentifiers => "GET_DISC_IDENTIFIERS",
        }
    }
}

/// Inbound response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Response {
    /// A seek or mode change completed; sub-code in the parameter.
    Found = 0x01,
    /// The disc stopped.
    Stopped = 0x02,
    /// Disc status bits.
    DiscStatus = 0x03,
    /// Error report; [`ErrorCode`] in the parameter.
    ErrorValues = 0x04,
    /// Low byte of a title length.
    LengthOfTitleLsb = 0x09,
    /// High byte of a title length.
    LengthOfTitleMsb = 0x0a,
    /// Current title number.
    ActualTitle = 0x10,
    /// Current index number.
    ActualIndex = 0x11,
    /// Relative minutes into the current title.
    ActualMinutes = 0x12,
    /// Relative seconds into the current title.
    ActualSeconds = 0x13,
    /// Absolute minutes.
    AbsoluteTimeMinutes = 0x14,
    /// Absolute seconds.
    AbsoluteTimeSeconds = 0x15,
    /// Absolute frames.
    AbsoluteTimeFrames = 0x16,
    /// Current mode bits.
    ModeStatus = 0x17,
    /// First track on the disc.
    TocMinTrackNumber = 0x20,
    /// Last track on the disc.
    TocMaxTrackNumber = 0x21,
    /// Lead-out minutes.
    TocTimeMinutes = 0x22,
    /// Lead-out seconds.
    TocTimeSeconds = 0x23,
    /// Lead-out frames.
    TocTimeFrames = 0x24,
    /// Disc identifier byte 0.
    DiscIdentifier0 = 0x30,
    /// Disc identifier byte 1.
    DiscIdentifier1 = 0x31,
    /// Disc identifier byte 2.
    DiscIdentifier2 = 0x32,
    /// Disc identifier byte 3.
    DiscIdentifier3 = 0x33,
    /// Disc identifier byte 4.
    DiscIdentifier4 = 0x34,
    /// The mechanism discarded its TOC.
    TocCleared = 0x6a,
    /// DAC output mode.
    DacMode = 0x70,
    /// Servo firmware version.
    ServoVersionNumber = 0xf0,
}

impl TryFrom<u8> for Response {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0x01 => Self::Found,
            0x02 => Self::Stopped,
            0x03 => Self::DiscStatus,
            0x04 => Self::ErrorValues,
            0x09 => Self::LengthOfTitleLsb,
            0x0a => Self::LengthOfTitleMsb,
            0x10 => Self::ActualTitle,
            0x11 => Self::ActualIndex,
            0x12 => Self::ActualMinutes,
            0x13 => Self::ActualSeconds,
            0x14 => Self::AbsoluteTimeMinutes,
            0x15 => Self::AbsoluteTimeSeconds,
            0x16 => Self::AbsoluteTimeFrames,
            0x17 => Self::ModeStatus,
            0x20 => Self::TocMinTrackNumber,
            0x21 => Self::TocMaxTrackNumber,
            0x22 => Self::TocTimeMinutes,
            0x23 => Self::TocTimeSeconds,
            0x24 => Self::TocTimeFrames,
            0x30 => Self::DiscIdentifier0,
            0x31 => Self::DiscIdentifier1,
            0x32 => Self::DiscIdentifier2,
            0x33 => Self::DiscIdentifier3,
            0x34 => Self::DiscIdentifier4,
            0x6a => Self::TocCleared,
            0x70 => Self::DacMode,
            0xf0 => Self::ServoVersionNumber,
            other => return Err(other),
        })
    }
}

impl Response {
    /// Decode the response code of an inbound message.
    pub fn of(message: Message) -> Result<Self, u8> {
        Self::try_from(message.opcode())
    }

    /// Build an inbound message (used by tests and the raw console).
    pub const fn message(self, param: u8) -> Message {
        Message::pack(self as u8, param)
    }
}

/// Parameter of a [`Response::ErrorValues`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// No error.
    NoError = 0x00,
    /// No disc in the tray.
    NoDisc = 0x02,
    /// Subcode could not be read.
    SubcodeError = 0x07,
    /// TOC could not be read.
    TocError = 0x08,
    /// Radial servo failure.
    RadialError = 0x0a,
    /// Sledge failed to move.
    FatalSledgeError = 0x0c,
    /// Turntable motor failure.
    TurnTableMotorError = 0x0d,
    /// Search timed out.
    SearchTimeOut = 0x1f,
    /// Binary search failed.
    SearchBinaryError = 0x20,
    /// Index search failed.
    SearchIndexError = 0x21,
    /// Time search failed.
    SearchTimeError = 0x22,
    /// Opcode not understood.
    IllegalCommand = 0x28,
    /// Parameter out of range.
    IllegalValue = 0x29,
    /// Time parameter out of range.
    IllegalTimeValue = 0x2a,
    /// Bus error seen by the mechanism.
    CommunicationError = 0x2b,
    /// Reserved.
    Reserved = 0x2c,
    /// HF detector failure.
    HfDetectorError = 0x2d,
    /// Emergency stop.
    EmergencyStop = 0x30,
}

impl TryFrom<u8> for ErrorCode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0x00 => Self::NoError,
            0x02 => Self::NoDisc,
            0x07 => Self::SubcodeError,
            0x08 => Self::TocError,
            0x0a => Self::RadialError,
            0x0c => Self::FatalSledgeError,
            0x0d => Self::TurnTableMotorError,
            0x1f => Self::SearchTimeOut,
            0x20 => Self::SearchBinaryError,
            0x21 => Self::SearchIndexError,
            0x22 => Self::SearchTimeError,
            0x28 => Self::IllegalCommand,
            0x29 => Self::IllegalValue,
            0x2a => Self::IllegalTimeValue,
            0x2b => Self::CommunicationError,
            0x2c => Self::Reserved,
            0x2d => Self::HfDetectorError,
            0x30 => Self::EmergencyStop,
            other => return Err(other),
        })
    }
}

/// Parameter of a [`Response::Found`] message: which operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FoundKind {
    /// Playback started.
    Play = 0x00,
    /// Playback paused.
    Pause = 0x01,
    /// Playback resumed from pause.
    PauseRelease = 0x02,
    /// A time search landed.
    GotoTime = 0x03,
    /// Disc spun up.
    SpinUp = 0x04,
    /// Loop start marker reached.
    LoopA = 0x05,
    /// Loop end marker reached.
    LoopB = 0x06,
}

impl TryFrom<u8> for FoundKind {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0x00 => Self::Play,
            0x01 => Self::Pause,
            0x02 => Self::PauseRelease,
            0x03 => Self::GotoTime,
            0x04 => Self::SpinUp,
            0x05 => Self::LoopA,
            0x06 => Self::LoopB,
            other => return Err(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_message() {
        assert_eq!(Opcode::ReadToc.message(0).raw(), 0x0300);
        assert_eq!(Opcode::PlayTitle.message(5).raw(), 0x0105);
    }

    #[test]
    fn test_response_decode() {
        assert_eq!(Response::of(Message::from_raw(0x2001)), Ok(Response::TocMinTrackNumber));
        assert_eq!(Response::of(Message::from_raw(0x0402)), Ok(Response::ErrorValues));
        assert_eq!(Response::of(Message::from_raw(0x5500)), Err(0x55));
    }

    #[test]
    fn test_response_codes_round_trip() {
        for raw in 0..=u8::MAX {
            if let Ok(r) = Response::try_from(raw) {
                assert_eq!(r as u8, raw);
            }
        }
    }

    #[test]
    fn test_error_code_decode() {
        assert_eq!(ErrorCode::try_from(0x02), Ok(ErrorCode::NoDisc));
        assert_eq!(ErrorCode::try_from(0x30), Ok(ErrorCode::EmergencyStop));
        assert_eq!(ErrorCode::try_from(0x01), Err(0x01));
    }

    #[test]
    fn test_found_kind_decode() {
        assert_eq!(FoundKind::try_from(0x01), Ok(FoundKind::Pause));
        assert_eq!(FoundKind::try_from(0x07), Err(0x07));
    }
}
