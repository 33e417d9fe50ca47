//! CD player controller firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI.

#![no_std]
#![no_main]

use cd_player::CdPlayer;
use dsa::DsaLink;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pin, Pull, Speed};
use embassy_time::{Duration, Instant, Timer};
use platform::config::{boot_banner, APP_NAME, APP_VERSION};
use platform::SystemClock;

use firmware::boot::{self, BootFlags};
use firmware::{FlexLine, Frontend, GpioRelays};

use defmt_rtt as _;
use panic_probe as _;

/// Main loop period. The DSA link busy-waits inside a tick, so this only
/// bounds the idle poll rate.
const LOOP_PERIOD: Duration = Duration::from_millis(1);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    defmt::info!("{=str} v{=str}: {=str}", APP_NAME, APP_VERSION, boot_banner());
    for step in boot::BOOT_SEQUENCE_STEPS {
        defmt::debug!("boot: {=str}", *step);
    }

    let p = embassy_stm32::init(boot::build_embassy_config());

    // Relays first: the mechanism must stay unpowered through the rest of boot.
    let relays = GpioRelays::new(
        Output::new(p.PE0.degrade(), Level::Low, Speed::Low), // AUX_AC
        Output::new(p.PE1.degrade(), Level::Low, Speed::Low), // AUX_9V
    );

    let link = DsaLink::new(
        FlexLine::new(p.PD0.degrade()), // DATA
        FlexLine::new(p.PD1.degrade()), // STROBE
        FlexLine::new(p.PD2.degrade()), // ACK
        SystemClock,
    );

    // Cover switch closes to ground when the lid is shut.
    let lid = Input::new(p.PA0.degrade(), Pull::Up);
    // Nucleo user button, active high.
    let power_button = Input::new(p.PC13.degrade(), Pull::Down);

    let mut player = CdPlayer::new(link, relays);
    let mut boot_flags = BootFlags::new();
    boot_flags.record_player_init(player.init());
    defmt::info!("boot flags: {=u8:#04x}", boot_flags.bits());

    let mut frontend = Frontend::new(player);
    loop {
        if frontend.poll(Instant::now(), lid.is_high(), power_button.is_high()) {
            defmt::info!("[{=str}]", frontend.panel());
        }
        Timer::after(LOOP_PERIOD).await;
    }
}
