//! Shared fixtures for controller integration tests.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::arithmetic_side_effects
)]

use cd_player::CdPlayer;
use dsa::mock::MockTransport;
use dsa::{Message, Opcode, Response};
use embassy_time::Instant;
use platform::mocks::MockRelays;

pub type Player = CdPlayer<MockTransport, MockRelays>;

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Drives a player with a monotonically increasing fake clock.
pub struct Bench {
    pub player: Player,
    pub now_ms: u64,
}

impl Bench {
    /// Initialised, powered off.
    pub fn new() -> Self {
        let mut player = CdPlayer::new(MockTransport::new(), MockRelays::new());
        player.init().expect("init");
        let mut bench = Self { player, now_ms: 0 };
        bench.tick();
        bench
    }

    /// Run the power-up sequence to completion. The READ_TOC issued on
    /// reaching ON is left in flight.
    pub fn powered() -> Self {
        let mut bench = Self::new();
        bench.player.toggle_power();
        bench.advance(750);
        bench.advance(250);
        assert!(bench.player.powered(), "power-up did not complete");
        bench
    }

    /// Powered, TOC read (tracks 1..=12, 45:03), first title playing.
    pub fn playing() -> Self {
        let mut bench = Self::powered();
        bench.deliver_toc(1, 12);
        bench.respond(Response::Found, 0x00);
        assert!(bench.player.disc_state().playing());
        bench
    }

    pub fn tick(&mut self) {
        self.player.tick(at(self.now_ms));
    }

    /// Move the clock forward and tick once.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
        self.tick();
    }

    /// Queue one inbound message and tick until it is consumed.
    pub fn respond(&mut self, response: Response, param: u8) {
        self.player
            .transport_mut()
            .push_inbound(response.message(param));
        self.advance(1);
    }

    /// All five TOC fields.
    pub fn deliver_toc(&mut self, min: u8, max: u8) {
        self.respond(Response::TocMinTrackNumber, min);
        self.respond(Response::TocMaxTrackNumber, max);
        self.respond(Response::TocTimeMinutes, 45);
        self.respond(Response::TocTimeSeconds, 3);
        self.respond(Response::TocTimeFrames, 60);
    }

    pub fn sent(&self) -> &[Message] {
        self.player.transport().sent.as_slice()
    }

    pub fn last_sent(&self) -> Option<Message> {
        self.player.transport().last_sent()
    }

    pub fn clear_sent(&mut self) {
        self.player.transport_mut().clear_sent();
    }

    pub fn status(&self) -> String {
        self.player.status().as_str().to_owned()
    }
}

pub fn msg(opcode: Opcode, param: u8) -> Message {
    opcode.message(param)
}
