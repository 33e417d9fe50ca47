//! Hardware Abstraction Layer (HAL) for the CD player front-end controller
//!
//! This crate provides trait-based abstractions for the hardware the CD
//! transport core touches, enabling development and testing without the
//! physical mechanism.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Feature Layers (cd-player, dsa)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstractions
//!
//! - [`FlexPin`] - Bidirectional GPIO line (DSA data/strobe/ack)
//! - [`RelayDriver`] - Relay-switched supply rails
//! - [`Clock`] / [`Deadline`] - Monotonic time and bounded spin-waits
//! - [`TimerSlots`] - Named one-shot main-loop timers
//! - [`Tracked`] - Dirty-tracked values (lid sensor)
//!
//! # Features
//!
//! - `std`: Enable host mocks ([`mocks`])
//! - `hardware`: Physical hardware implementations
//! - `defmt`: Enable defmt logging

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![allow(clippy::doc_markdown)] // signal names in doc comments
#![allow(clippy::must_use_candidate)] // accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clock;
pub mod config;
pub mod gpio;
pub mod relay;
pub mod timer_slots;
pub mod tracked;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use clock::{Clock, Deadline, SystemClock};
pub use gpio::FlexPin;
pub use relay::{Relay, RelayDriver};
pub use timer_slots::{TimerSlot, TimerSlots};
pub use tracked::Tracked;
