//! Application configuration and constants
//!
//! Central timing and sizing values shared by the CD transport crates. All
//! protocol windows and sequencing delays should reference these constants
//! rather than hardcoding values.

use embassy_time::Duration;

/// The application name
pub const APP_NAME: &str = "CDPFW";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// DSA protocol window for synchronisation (Tsyn), acknowledge (Tcom) and
/// the transfer of all bits (Ttfr).
pub const DSA_TIMEOUT: Duration = Duration::from_millis(250);

/// How long a transmit error stays in the status text.
pub const ERROR_DISPLAY_TIMEOUT_MS: u16 = 2000;

/// Delay between energising AUX AC and the 9V rail (and between releasing
/// 9V and releasing AC). The mechanism datasheet asks for 150 ms; we are
/// conservative.
pub const POWER_RAIL_DELAY_MS: u16 = 750;

/// Settling delay around the 9V rail switch.
pub const POWER_SETTLE_DELAY_MS: u16 = 250;

/// Boot banner
pub const fn boot_banner() -> &'static str {
    "CDPFW CD transport controller"
}
