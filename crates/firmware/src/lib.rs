//! CD player front-end controller firmware
//!
//! Application glue around the [`cd_player`] core for an STM32H7 board
//! driving a Philips CDPro2 mechanism.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs, frontend, command)
//!         ↓
//! Feature Layers (cd-player, dsa)
//!         ↓
//! Board adapters (hal, relays)
//!         ↓
//! Platform HAL (Embassy, STM32)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt-rtt, pin adapters)
//! - `std` - Enable standard library (host mocks of the lower crates)
//!
//! # Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod boot;
pub mod command;
pub mod frontend;
pub mod panel;
pub mod relays;

#[cfg(feature = "hardware")]
pub mod hal;

pub use boot::BootFlags;
pub use command::{parse, remote_command, IrFrame, ParseError, RemoteKey, UserCommand};
pub use frontend::Frontend;
pub use panel::{panel_line, PanelLine, PANEL_COLUMNS};
pub use relays::GpioRelays;

#[cfg(feature = "hardware")]
pub use hal::FlexLine;
