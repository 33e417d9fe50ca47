//! Front-panel status line
//!
//! The VFD shows one fixed-width line of player status. Shorter text is
//! padded with blanks so stale characters from the previous frame are
//! overwritten; longer text is cut at the last column.

use heapless::String;

/// Visible characters on the status row.
pub const PANEL_COLUMNS: usize = 23;

/// One rendered row.
pub type PanelLine = String<PANEL_COLUMNS>;

/// Fit `status` to exactly [`PANEL_COLUMNS`] characters.
pub fn panel_line(status: &str) -> PanelLine {
    let mut line = PanelLine::new();
    for c in status.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    while line.push(' ').is_ok() {}
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_padded() {
        let line = panel_line("OFF");
        assert_eq!(line.len(), PANEL_COLUMNS);
        assert!(line.starts_with("OFF "));
        assert_eq!(line.trim_end(), "OFF");
    }

    #[test]
    fn test_long_text_is_truncated() {
        let line = panel_line(" LS__ 12 45:03 and some more text");
        assert_eq!(line.as_str(), " LS__ 12 45:03 and some");
    }

    #[test]
    fn test_empty_text_blanks_the_row() {
        assert!(panel_line("").bytes().all(|b| b == b' '));
    }
}
