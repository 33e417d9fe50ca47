//! Scripted [`Transport`] for controller tests.

#![cfg(any(test, feature = "std"))]

use heapless::{Deque, Vec};

use crate::{DsaError, Message, Transport};

/// Transport that replays queued inbound messages and records outbound ones.
#[derive(Debug, Default)]
pub struct MockTransport {
    inbound: Deque<Message, 32>,
    /// Every message passed to [`Transport::transmit`], successful or not.
    pub sent: Vec<Message, 64>,
    transmit_error: Option<DsaError>,
    receive_error: Option<DsaError>,
    /// Number of [`Transport::init`] calls.
    pub init_calls: u32,
}

impl MockTransport {
    /// Nothing queued, all transfers succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for the controller to receive.
    pub fn push_inbound(&mut self, message: Message) {
        // Tests never queue more than the capacity.
        let _ = self.inbound.push_back(message);
    }

    /// Make every transmit fail with `error` (or succeed again with `None`).
    pub fn fail_transmits(&mut self, error: Option<DsaError>) {
        self.transmit_error = error;
    }

    /// Make the next receive fail with `error`, consuming the queued message.
    pub fn fail_next_receive(&mut self, error: DsaError) {
        self.receive_error = Some(error);
    }

    /// Messages still waiting to be received.
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    /// Forget everything that was sent.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Most recent outbound message.
    pub fn last_sent(&self) -> Option<Message> {
        self.sent.last().copied()
    }
}

impl Transport for MockTransport {
    fn init(&mut self) -> Result<(), DsaError> {
        self.init_calls = self.init_calls.saturating_add(1);
        Ok(())
    }

    fn transmit_requested(&mut self) -> bool {
        !self.inbound.is_empty()
    }

    fn receive(&mut self) -> Result<Message, DsaError> {
        let message = self.inbound.pop_front().ok_or(DsaError::Timeout)?;
        match self.receive_error.take() {
            Some(err) => Err(err),
            None => Ok(message),
        }
    }

    fn transmit(&mut self, message: Message) -> Result<(), DsaError> {
        let _ = self.sent.push(message);
        match self.transmit_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let mut t = MockTransport::new();
        t.push_inbound(Message::from_raw(1));
        t.push_inbound(Message::from_raw(2));
        assert!(t.transmit_requested());
        assert_eq!(t.receive(), Ok(Message::from_raw(1)));
        assert_eq!(t.receive(), Ok(Message::from_raw(2)));
        assert!(!t.transmit_requested());
    }

    #[test]
    fn test_records_failed_transmits() {
        let mut t = MockTransport::new();
        t.fail_transmits(Some(DsaError::Timeout));
        assert_eq!(t.transmit(Message::from_raw(0x0300)), Err(DsaError::Timeout));
        assert_eq!(t.last_sent(), Some(Message::from_raw(0x0300)));
    }
}
