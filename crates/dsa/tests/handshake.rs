//! DSA handshake tests against the simulated CDPro2 mechanism.
//!
//! The simulated peer follows the same line protocol as the drive, so these
//! tests exercise every phase of both transfer directions, plus the failure
//! paths: a silent peer, a peer that stalls mid-message, and a peer that
//! rejects a message in the acknowledge phase.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use dsa::{DsaError, DsaLink, DsaStatus, Message, Transport};
use platform::mocks::{Line, ManualClock, SimBus, SimPin};

fn link<'a>(bus: &'a SimBus, clock: &'a ManualClock) -> DsaLink<SimPin<'a>, &'a ManualClock> {
    let mut link = DsaLink::new(
        bus.pin(Line::Data),
        bus.pin(Line::Strobe),
        bus.pin(Line::Ack),
        clock,
    );
    link.init().expect("init");
    link
}

fn assert_idle(bus: &SimBus) {
    for line in [Line::Data, Line::Strobe, Line::Ack] {
        assert!(!bus.host_driving(line), "{line:?} still driven by host");
    }
}

#[test]
fn transmit_then_receive_reply() {
    let bus = SimBus::new();
    let clock = ManualClock::new(0);
    let mut link = link(&bus, &clock);

    link.transmit(Message::pack(0x03, 0x00)).expect("tx");
    bus.queue_message(0x2001);
    assert!(link.transmit_requested());
    assert_eq!(link.receive(), Ok(Message::pack(0x20, 0x01)));

    assert_eq!(bus.received().as_slice(), &[0x0300]);
    assert_eq!(bus.host_acks().as_slice(), &[true]);
    assert_idle(&bus);
}

#[test]
fn back_to_back_receives() {
    let bus = SimBus::new();
    let clock = ManualClock::new(0);
    let mut link = link(&bus, &clock);

    bus.queue_message(0x2101);
    bus.queue_message(0x220C);
    assert_eq!(link.receive(), Ok(Message::from_raw(0x2101)));
    assert!(link.transmit_requested());
    assert_eq!(link.receive(), Ok(Message::from_raw(0x220C)));
    assert_eq!(bus.host_acks().as_slice(), &[true, true]);
}

#[test]
fn silent_peer_times_out_within_one_phase() {
    let bus = SimBus::new();
    bus.set_responsive(false);
    let clock = ManualClock::new(0);
    let mut link = link(&bus, &clock);
    let start = clock.millis();

    assert_eq!(link.transmit(Message::pack(0x02, 0x00)), Err(DsaError::Timeout));
    let spent = clock.millis() - start;
    assert!((250..260).contains(&spent), "blocked for {spent} ms");
    assert_idle(&bus);
}

#[test]
fn peer_stalling_mid_message_times_out() {
    let bus = SimBus::new();
    let clock = ManualClock::new(0);
    let mut link = link(&bus, &clock);

    bus.stall_after_bits(5);
    bus.queue_message(0xFFFF);
    assert_eq!(link.receive(), Err(DsaError::Timeout));
    assert_eq!(link.last_response(), Message::INVALID);
    assert_idle(&bus);

    // The bus recovers once the peer does.
    bus.reset_peer();
    bus.queue_message(0x1005);
    assert_eq!(link.receive(), Ok(Message::from_raw(0x1005)));
}

#[test]
fn rejected_message_reports_line_error() {
    let bus = SimBus::new();
    let clock = ManualClock::new(0);
    let mut link = link(&bus, &clock);

    bus.reject_next();
    let result = link.transmit(Message::pack(0x01, 0x01));
    assert_eq!(result, Err(DsaError::LineError));
    assert_eq!(DsaStatus::from(&result), DsaStatus::Error);
    assert_idle(&bus);

    // Only the next message is rejected.
    assert_eq!(link.transmit(Message::pack(0x01, 0x01)), Ok(()));
}

#[test]
fn no_request_on_idle_bus() {
    let bus = SimBus::new();
    let clock = ManualClock::new(0);
    let mut link = link(&bus, &clock);
    assert!(!link.transmit_requested());
}

proptest::proptest! {
    /// Any 16-bit value survives a transfer in either direction.
    #[test]
    fn any_message_crosses_the_bus(raw in proptest::num::u16::ANY) {
        let bus = SimBus::new();
        let clock = ManualClock::new(0);
        let mut link = link(&bus, &clock);

        link.transmit(Message::from_raw(raw)).unwrap();
        bus.queue_message(raw);
        let echoed = link.receive().unwrap();

        let received = bus.received();
        proptest::prop_assert_eq!(received.as_slice(), &[raw]);
        proptest::prop_assert_eq!(echoed.raw(), raw);
    }
}
