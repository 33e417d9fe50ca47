//! Boot sequence for the CD player controller.
//!
//! Initialization order:
//!   1. Clocks (HSI → PLL1 → 400 MHz core)
//!   2. Relay outputs low (mechanism unpowered)
//!   3. DSA lines released (input, pull-up)
//!   4. `CdPlayer::init()` → [`BootFlags::CDP_OK`]
//!   5. Main loop
//!
//! The relay pins must be driven low before anything else touches the
//! mechanism: the 9V rail must never come up ahead of the AC supply.

use dsa::DsaError;

/// Ordered list of boot steps, logged at startup.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. RCC: HSI 64 MHz -> PLL1 -> 400 MHz sysclk",
    "2. Relays: AUX_AC and AUX_9V released",
    "3. DSA: data/strobe/ack released with pull-ups",
    "4. CD player: init link, relays off",
    "5. Main loop: lid poll + player tick",
];

/// Subsystems that came up cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootFlags(u8);

impl BootFlags {
    /// CD player link and relays initialised.
    pub const CDP_OK: u8 = 0x04;

    /// No subsystem reported yet.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Raw bit set.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Mark `flag` as up.
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// `true` if every bit in `flag` is set.
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Record the player init result.
    pub fn record_player_init(&mut self, result: Result<(), DsaError>) {
        match result {
            Ok(()) => self.set(Self::CDP_OK),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("CD player init failed: {}", _e);
            }
        }
    }
}

// ── RCC clock configuration ───────────────────────────────────────────────────

/// Build the `embassy_stm32::Config` for the controller board.
///
/// # Clock Tree (HSI → 400 MHz core)
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// AHB prescaler: DIV2 → 200 MHz
/// APB1/2/3/4:    DIV2 → 100 MHz
///
/// No peripheral here needs a kernel clock of its own; GPIO and the TIM2
/// time driver run from the bus clocks.
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;

    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    // PLL1_P = VCO / divp(2) = 400 MHz  → system clock
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2),
        divq: None,
        divr: None,
    });

    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relays_released_before_player_init() {
        let pos = |needle: &str| {
            BOOT_SEQUENCE_STEPS
                .iter()
                .position(|s| s.contains(needle))
                .unwrap_or(usize::MAX)
        };
        assert!(pos("Relays") < pos("CD player"));
        assert!(pos("DSA") < pos("CD player"));
    }

    #[test]
    fn test_player_init_sets_cdp_ok() {
        let mut flags = BootFlags::new();
        flags.record_player_init(Ok(()));
        assert!(flags.contains(BootFlags::CDP_OK));
        assert_eq!(flags.bits(), 0x04);
    }

    #[test]
    fn test_failed_init_leaves_flag_clear() {
        let mut flags = BootFlags::new();
        flags.record_player_init(Err(DsaError::Pin));
        assert!(!flags.contains(BootFlags::CDP_OK));
    }
}
