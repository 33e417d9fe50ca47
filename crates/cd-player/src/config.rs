//! Controller sizing constants.

/// Queued user actions held while a command is in flight.
pub const ACTION_QUEUE_CAPACITY: usize = 8;

/// Maximum length of the rendered status line.
pub const STATUS_LEN: usize = 40;

/// Maximum length of the free-text notice (errors, "NO DISC").
pub const NOTICE_LEN: usize = 24;

/// Busy spinner frames, shown while a command is in flight.
pub const BUSY_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

/// Ticks per spinner frame, as a shift (2^n ticks).
pub const BUSY_GLYPH_SHIFT: u32 = 3;
