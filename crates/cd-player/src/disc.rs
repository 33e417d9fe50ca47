//! Disc state tracking: TOC, now-playing position and transport motion.
//!
//! The mechanism reports these piecemeal, one byte per response, in no
//! guaranteed order.

use dsa::Response;

/// Transport motion. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// Disc not moving (or not loaded).
    #[default]
    Stopped,
    /// Playing.
    Playing,
    /// Paused mid-title.
    Paused,
}

/// What the controller believes the mechanism is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscState {
    loaded: bool,
    motion: Motion,
}

impl DiscState {
    /// No disc, stopped.
    pub const EMPTY: Self = Self {
        loaded: false,
        motion: Motion::Stopped,
    };

    /// A valid TOC has been read.
    pub const fn loaded(&self) -> bool {
        self.loaded
    }

    /// Current motion.
    pub const fn motion(&self) -> Motion {
        self.motion
    }

    /// `true` when stopped.
    pub const fn stopped(&self) -> bool {
        matches!(self.motion, Motion::Stopped)
    }

    /// `true` when playing.
    pub const fn playing(&self) -> bool {
        matches!(self.motion, Motion::Playing)
    }

    /// `true` when paused.
    pub const fn paused(&self) -> bool {
        matches!(self.motion, Motion::Paused)
    }

    pub(crate) fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    pub(crate) fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

/// One of the five TOC fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TocField {
    /// First track number.
    MinTrack = 0,
    /// Last track number.
    MaxTrack = 1,
    /// Disc length, minutes.
    Minutes = 2,
    /// Disc length, seconds.
    Seconds = 3,
    /// Disc length, frames.
    Frames = 4,
}

impl TocField {
    /// Every field, in response-code order.
    pub const ALL: [Self; 5] = [
        Self::MinTrack,
        Self::MaxTrack,
        Self::Minutes,
        Self::Seconds,
        Self::Frames,
    ];

    /// The field carried by a `TOC_*` response.
    pub const fn from_response(response: Response) -> Option<Self> {
        match response {
            Response::TocMinTrackNumber => Some(Self::MinTrack),
            Response::TocMaxTrackNumber => Some(Self::MaxTrack),
            Response::TocTimeMinutes => Some(Self::Minutes),
            Response::TocTimeSeconds => Some(Self::Seconds),
            Response::TocTimeFrames => Some(Self::Frames),
            _ => None,
        }
    }

    const fn flag(self) -> u8 {
        1u8.wrapping_shl(self as u32)
    }
}

/// Table of contents, accumulated field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Toc {
    fields: [u8; 5],
    flags: u8,
}

impl Toc {
    const ALL_FLAGS: u8 = 0x1f;

    /// Empty, invalid TOC.
    pub const fn new() -> Self {
        Self {
            fields: [0; 5],
            flags: 0,
        }
    }

    /// Record one field.
    pub fn set(&mut self, field: TocField, value: u8) {
        if let Some(slot) = self.fields.get_mut(field as usize) {
            *slot = value;
            self.flags |= field.flag();
        }
    }

    /// Value of `field` (0 until set).
    pub fn get(&self, field: TocField) -> u8 {
        self.fields.get(field as usize).copied().unwrap_or(0)
    }

    /// `true` once all five fields have arrived.
    pub const fn valid(&self) -> bool {
        self.flags & Self::ALL_FLAGS == Self::ALL_FLAGS
    }

    /// First track number.
    pub fn min_track(&self) -> u8 {
        self.get(TocField::MinTrack)
    }

    /// Last track number.
    pub fn max_track(&self) -> u8 {
        self.get(TocField::MaxTrack)
    }

    /// Disc length, minutes.
    pub fn minutes(&self) -> u8 {
        self.get(TocField::Minutes)
    }

    /// Disc length, seconds.
    pub fn seconds(&self) -> u8 {
        self.get(TocField::Seconds)
    }

    /// Disc length, frames.
    pub fn frames(&self) -> u8 {
        self.get(TocField::Frames)
    }

    /// Number of tracks, 0 if the last track is unknown.
    pub fn num_tracks(&self) -> u8 {
        match self.max_track() {
            0 => 0,
            max => max.saturating_sub(self.min_track()).saturating_add(1),
        }
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Now-playing position; every field holds the latest reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Actual {
    /// Title (track) number.
    pub title: u8,
    /// Index within the title.
    pub index: u8,
    /// Minutes into the title.
    pub minutes: u8,
    /// Seconds into the title.
    pub seconds: u8,
}

impl Actual {
    /// Store an `ACTUAL_*` response. Returns `false` for other responses.
    pub fn update(&mut self, response: Response, value: u8) -> bool {
        let slot = match response {
            Response::ActualTitle => &mut self.title,
            Response::ActualIndex => &mut self.index,
            Response::ActualMinutes => &mut self.minutes,
            Response::ActualSeconds => &mut self.seconds,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
