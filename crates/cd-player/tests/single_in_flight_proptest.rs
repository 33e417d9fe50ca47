//! Property-based tests for the controller's command discipline.
//!
//! Whatever the user and the mechanism do, the queue is never drained past
//! an unanswered command and a tick with a command in flight sends nothing
//! new unless the mechanism said something.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

mod common;

use common::Bench;
use dsa::{ErrorCode, Response};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Play,
    Pause,
    Next,
    Prev,
    Stop,
    ReadToc,
    Tick,
    Respond(Response, u8),
}

fn response() -> impl Strategy<Value = (Response, u8)> {
    prop_oneof![
        (0u8..3).prop_map(|p| (Response::Found, p)),
        Just((Response::Stopped, 0)),
        Just((Response::ErrorValues, ErrorCode::NoDisc as u8)),
        Just((Response::ErrorValues, ErrorCode::TocError as u8)),
        Just((Response::ErrorValues, ErrorCode::NoError as u8)),
        (1u8..4).prop_map(|v| (Response::TocMinTrackNumber, v)),
        (4u8..20).prop_map(|v| (Response::TocMaxTrackNumber, v)),
        (0u8..80).prop_map(|v| (Response::TocTimeMinutes, v)),
        (0u8..60).prop_map(|v| (Response::TocTimeSeconds, v)),
        (0u8..75).prop_map(|v| (Response::TocTimeFrames, v)),
        (1u8..20).prop_map(|v| (Response::ActualTitle, v)),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Play),
        Just(Op::Pause),
        Just(Op::Next),
        Just(Op::Prev),
        Just(Op::Stop),
        Just(Op::ReadToc),
        Just(Op::Tick),
        response().prop_map(|(r, p)| Op::Respond(r, p)),
    ]
}

proptest! {
    #[test]
    fn at_most_one_command_in_flight(ops in proptest::collection::vec(op(), 1..60)) {
        let mut bench = Bench::powered();

        for op in ops {
            bench.clear_sent();
            let in_flight = bench.player.async_command().is_some();
            match op {
                Op::Play => bench.player.play(),
                Op::Pause => bench.player.pause(),
                Op::Next => bench.player.next_title(),
                Op::Prev => bench.player.prev_title(),
                Op::Stop => bench.player.stop(),
                Op::ReadToc => {
                    bench.player.read_toc();
                    if in_flight {
                        prop_assert!(bench.sent().is_empty(), "TOC request sent {:?}", bench.sent());
                    }
                }
                Op::Tick => {
                    bench.advance(1);
                    if in_flight {
                        prop_assert!(bench.sent().is_empty(), "tick sent {:?}", bench.sent());
                    }
                }
                Op::Respond(response, param) => bench.respond(response, param),
            }

            // Queue drains only into a free slot.
            prop_assert!(
                bench.player.async_command().is_some() || bench.player.queued_actions() == 0
                    || !matches!(op, Op::Tick | Op::Respond(..)),
                "queue left waiting with no command in flight"
            );

            let d = bench.player.disc_state();
            let motions = [d.stopped(), d.playing(), d.paused()];
            prop_assert_eq!(motions.iter().filter(|m| **m).count(), 1);
        }
    }
}
