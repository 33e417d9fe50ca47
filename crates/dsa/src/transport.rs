//! Transport seam between the DSA link and the player controller.

use crate::Message;

/// Link-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DsaError {
    /// The peer did not complete a handshake phase in time.
    #[error("DSA handshake timed out")]
    Timeout,
    /// The peer flagged the transfer as failed in the acknowledge phase.
    #[error("DSA peer reported a line error")]
    LineError,
    /// A GPIO operation failed.
    #[error("DSA pin access failed")]
    Pin,
}

/// Outcome of a transfer, as reported to callers and the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DsaStatus {
    /// Transfer acknowledged.
    #[default]
    Ok,
    /// A phase timed out.
    Timeout,
    /// Line error or pin failure.
    Error,
}

impl DsaStatus {
    /// Status text shown on the front panel.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Timeout => "TIMEOUT",
            Self::Error => "ERR",
        }
    }

    /// `true` for [`DsaStatus::Ok`].
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<DsaError> for DsaStatus {
    fn from(err: DsaError) -> Self {
        match err {
            DsaError::Timeout => Self::Timeout,
            DsaError::LineError | DsaError::Pin => Self::Error,
        }
    }
}

impl<T> From<&Result<T, DsaError>> for DsaStatus {
    fn from(result: &Result<T, DsaError>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => Self::from(*err),
        }
    }
}

impl core::fmt::Display for DsaStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-duplex message link to the CD mechanism.
///
/// Every call blocks for a bounded time and leaves the bus idle on return,
/// whatever the outcome.
pub trait Transport {
    /// Put the lines into their idle configuration.
    fn init(&mut self) -> Result<(), DsaError>;

    /// `true` when the peer is asking to send a message.
    fn transmit_requested(&mut self) -> bool;

    /// Receive one message from the peer.
    fn receive(&mut self) -> Result<Message, DsaError>;

    /// Send one message to the peer.
    fn transmit(&mut self, message: Message) -> Result<(), DsaError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn init(&mut self) -> Result<(), DsaError> {
        (**self).init()
    }

    fn transmit_requested(&mut self) -> bool {
        (**self).transmit_requested()
    }

    fn receive(&mut self) -> Result<Message, DsaError> {
        (**self).receive()
    }

    fn transmit(&mut self, message: Message) -> Result<(), DsaError> {
        (**self).transmit(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(DsaStatus::Ok.as_str(), "OK");
        assert_eq!(DsaStatus::Timeout.as_str(), "TIMEOUT");
        assert_eq!(DsaStatus::Error.as_str(), "ERR");
    }

    #[test]
    fn test_status_from_result() {
        let ok: Result<(), DsaError> = Ok(());
        assert_eq!(DsaStatus::from(&ok), DsaStatus::Ok);
        assert_eq!(DsaStatus::from(&Err::<(), _>(DsaError::Timeout)), DsaStatus::Timeout);
        assert_eq!(DsaStatus::from(&Err::<(), _>(DsaError::LineError)), DsaStatus::Error);
        assert_eq!(DsaStatus::from(&Err::<(), _>(DsaError::Pin)), DsaStatus::Error);
    }
}
