//! User intent dispatch
//!
//! The IR remote, the serial console and the front-panel button all end up
//! as a [`UserCommand`], which is the only thing that touches the player's
//! public operations.

use cd_player::CdPlayer;
use dsa::{DsaStatus, Message, Transport};
use platform::RelayDriver;

/// Something the user asked the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UserCommand {
    /// Toggle mechanism power.
    Power,
    /// Play (or resume).
    Play,
    /// Pause or resume.
    Pause,
    /// Stop immediately.
    Stop,
    /// Next title.
    Next,
    /// Previous title.
    Prev,
    /// Re-read the disc TOC.
    ReadToc,
    /// Send a raw DSA message.
    Raw(Message),
}

impl UserCommand {
    /// Run the command against `player`.
    ///
    /// Returns the link status for [`UserCommand::Raw`] when the message was
    /// actually sent, `None` otherwise.
    pub fn apply<T: Transport, R: RelayDriver>(
        self,
        player: &mut CdPlayer<T, R>,
    ) -> Option<DsaStatus> {
        #[cfg(feature = "defmt")]
        defmt::debug!("command {}", self);
        match self {
            Self::Power => player.toggle_power(),
            Self::Play => player.play(),
            Self::Pause => player.pause(),
            Self::Stop => player.stop(),
            Self::Next => player.next_title(),
            Self::Prev => player.prev_title(),
            Self::ReadToc => player.read_toc(),
            Self::Raw(message) => return player.transmit_raw(message),
        }
        None
    }
}

// ── IR remote ────────────────────────────────────────────────────────────────

/// Device address of the remote handset.
pub const REMOTE_ADDRESS: u16 = 0x1c;

/// Remote keys the player reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum RemoteKey {
    /// Standby
    Off = 0x0c,
    /// Play
    Play = 0x32,
    /// Stop
    Stop = 0x36,
    /// Play/pause
    PlayPause = 0x71,
    /// Skip forward
    SkipFwd = 0x34,
    /// Skip back
    SkipBack = 0x37,
}

impl RemoteKey {
    /// Look up a key code.
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0c => Some(Self::Off),
            0x32 => Some(Self::Play),
            0x36 => Some(Self::Stop),
            0x71 => Some(Self::PlayPause),
            0x34 => Some(Self::SkipFwd),
            0x37 => Some(Self::SkipBack),
            _ => None,
        }
    }

    /// The command this key issues.
    pub const fn command(self) -> UserCommand {
        match self {
            Self::Off => UserCommand::Power,
            Self::Play => UserCommand::Play,
            Self::Stop => UserCommand::Stop,
            Self::PlayPause => UserCommand::Pause,
            Self::SkipFwd => UserCommand::Next,
            Self::SkipBack => UserCommand::Prev,
        }
    }
}

/// A decoded IR frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrFrame {
    /// Device address
    pub address: u16,
    /// Key code
    pub code: u16,
    /// Auto-repeat frame (key held down)
    pub repeat: bool,
}

/// Map an IR frame to a command.
///
/// Frames for other devices, key repeats and keys with no player meaning are
/// ignored so the menu layer can still act on them.
pub fn remote_command(frame: IrFrame) -> Option<UserCommand> {
    if frame.repeat || frame.address != REMOTE_ADDRESS {
        return None;
    }
    RemoteKey::from_code(frame.code).map(RemoteKey::command)
}

// ── Serial console ───────────────────────────────────────────────────────────

/// Console parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Nothing but whitespace.
    #[error("empty command")]
    Empty,
    /// Not a known word and not a hex message.
    #[error("unknown command")]
    Unknown,
}

const WORDS: [(&str, UserCommand); 7] = [
    ("TOC", UserCommand::ReadToc),
    ("PLAY", UserCommand::Play),
    ("STOP", UserCommand::Stop),
    ("PAUSE", UserCommand::Pause),
    ("NEXT", UserCommand::Next),
    ("PREV", UserCommand::Prev),
    ("POWER", UserCommand::Power),
];

/// Parse one console line.
///
/// Accepts the command words (any case) or a raw message of one to four hex
/// digits, e.g. `0300` for READ_TOC.
pub fn parse(line: &str) -> Result<UserCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Some((_, command)) = WORDS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(line))
    {
        return Ok(*command);
    }
    if line.len() <= 4 && line.bytes().all(|b| b.is_ascii_hexdigit()) {
        return u16::from_str_radix(line, 16)
            .map(|raw| UserCommand::Raw(Message::from_raw(raw)))
            .map_err(|_| ParseError::Unknown);
    }
    Err(ParseError::Unknown)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_words_are_case_insensitive() {
        assert_eq!(parse("toc"), Ok(UserCommand::ReadToc));
        assert_eq!(parse("Play"), Ok(UserCommand::Play));
        assert_eq!(parse("  STOP\r\n"), Ok(UserCommand::Stop));
        assert_eq!(parse("power"), Ok(UserCommand::Power));
    }

    #[test]
    fn test_hex_message() {
        assert_eq!(
            parse("0300"),
            Ok(UserCommand::Raw(Message::from_raw(0x0300)))
        );
        assert_eq!(parse("2"), Ok(UserCommand::Raw(Message::from_raw(0x0002))));
        assert_eq!(parse("0"), Ok(UserCommand::Raw(Message::INVALID)));
        assert_eq!(
            parse("FfFf"),
            Ok(UserCommand::Raw(Message::from_raw(0xffff)))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("EJECT"), Err(ParseError::Unknown));
        assert_eq!(parse("12345"), Err(ParseError::Unknown));
        assert_eq!(parse("+12"), Err(ParseError::Unknown));
    }

    #[test]
    fn test_remote_mapping() {
        let frame = |code, repeat| IrFrame {
            address: REMOTE_ADDRESS,
            code,
            repeat,
        };
        assert_eq!(remote_command(frame(0x0c, false)), Some(UserCommand::Power));
        assert_eq!(remote_command(frame(0x32, false)), Some(UserCommand::Play));
        assert_eq!(remote_command(frame(0x36, false)), Some(UserCommand::Stop));
        assert_eq!(remote_command(frame(0x36, true)), None, "repeat ignored");
        assert_eq!(remote_command(frame(0x0d, false)), None, "mute is not ours");
    }

    #[test]
    fn test_foreign_address_ignored() {
        let frame = IrFrame {
            address: 0x1d,
            code: RemoteKey::Play as u16,
            repeat: false,
        };
        assert_eq!(remote_command(frame), None);
    }

    #[test]
    fn test_key_codes_round_trip() {
        for key in [
            RemoteKey::Off,
            RemoteKey::Play,
            RemoteKey::Stop,
            RemoteKey::PlayPause,
            RemoteKey::SkipFwd,
            RemoteKey::SkipBack,
        ] {
            assert_eq!(RemoteKey::from_code(key as u16), Some(key));
        }
    }
}
