//! DSA link to a Philips CDPro2 CD mechanism
//!
//! The CDPro2 talks over DSA, a three-wire (DATA, STROBE, ACK) handshaked
//! serial bus carrying 16-bit messages. This crate provides:
//!
//! - [`Message`] - the 16-bit opcode/parameter codec
//! - [`cdpro2`] - opcodes, response codes and error codes
//! - [`DsaLink`] - the bit-banged link over three [`platform::FlexPin`]s
//! - [`Transport`] - the seam the player controller is written against
//!
//! # Features
//!
//! - `std`: host mocks ([`mock::MockTransport`])
//! - `defmt`: log every transfer

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)] // signal names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cdpro2;
pub mod link;
pub mod message;
pub mod transport;

#[cfg(any(test, feature = "std"))]
pub mod mock;

pub use cdpro2::{ErrorCode, FoundKind, Opcode, Response};
pub use link::{DsaLines, DsaLink};
pub use message::Message;
pub use transport::{DsaError, DsaStatus, Transport};
