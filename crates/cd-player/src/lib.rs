//! CD transport controller for the Philips CDPro2 mechanism
//!
//! Power sequencing, disc state tracking, the user action queue and the
//! single in-flight command tracker, all driven from [`CdPlayer::tick`].
//! No hardware access: the DSA link comes in as a [`dsa::Transport`] and
//! the supply rails as a [`platform::RelayDriver`], so everything here runs
//! on the host against mocks.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![allow(clippy::doc_markdown)] // opcode names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod action_queue;
pub mod command;
pub mod config;
pub mod disc;
pub mod player;
pub mod power;

pub use action_queue::{ActionQueue, ActionType, QueueFull, QueuedAction};
pub use command::{AsyncCommand, ResponseHandler};
pub use disc::{Actual, DiscState, Motion, Toc, TocField};
pub use player::{CdPlayer, StatusLine};
pub use power::{PowerSequenceStep, PowerSequencer, PowerState};
