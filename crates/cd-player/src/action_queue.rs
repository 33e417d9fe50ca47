//! Const-generic, stack-allocated FIFO of pending user actions.
//!
//! User requests that arrive while the mechanism is busy wait here until the
//! in-flight command completes. The queue never overwrites: pushing into a
//! full queue fails and the caller decides what to do with the action.

use crate::config::ACTION_QUEUE_CAPACITY;

/// A deferred user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionType {
    /// Start or resume playback.
    Play,
    /// Pause or resume.
    Pause,
    /// Skip to the next title.
    NextTitle,
    /// Skip to the previous title.
    PrevTitle,
}

/// An action plus its parameter (a title number for `Play`, 0 = first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueuedAction {
    /// What to do.
    pub action_type: ActionType,
    /// Action parameter.
    pub param: u8,
}

impl QueuedAction {
    /// Action without a parameter.
    pub const fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            param: 0,
        }
    }
}

/// Returned by [`ActionQueue::push`] when every slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("action queue full")]
pub struct QueueFull;

/// Fixed-capacity FIFO ring of [`QueuedAction`]s.
pub struct ActionQueue<const N: usize = ACTION_QUEUE_CAPACITY> {
    buf: [QueuedAction; N],
    /// Index of the next slot to read from.
    read: usize,
    /// Index of the next slot to write to.
    write: usize,
    /// Number of queued actions.
    count: usize,
}

impl<const N: usize> ActionQueue<N> {
    /// Create a new, empty queue.
    pub const fn new() -> Self {
        Self {
            buf: [QueuedAction::new(ActionType::Play); N],
            read: 0,
            write: 0,
            count: 0,
        }
    }

    /// Append an action.
    ///
    /// # Errors
    ///
    /// [`QueueFull`] if all `N` slots are taken; the queue is unchanged.
    #[allow(clippy::indexing_slicing)] // Safety: write < N invariant; count < N checked above
    #[allow(clippy::arithmetic_side_effects)] // Safety: wrap via % N with N > 0 (count < N); count < N
    pub fn push(&mut self, action: QueuedAction) -> Result<(), QueueFull> {
        if self.count >= N {
            return Err(QueueFull);
        }
        self.buf[self.write] = action;
        self.write = (self.write + 1) % N;
        self.count += 1;
        Ok(())
    }

    /// Take the oldest action.
    #[allow(clippy::indexing_slicing)] // Safety: read < N invariant; count > 0 checked above
    #[allow(clippy::arithmetic_side_effects)] // Safety: wrap via % N with N > 0 (count > 0); count > 0
    pub fn pop(&mut self) -> Option<QueuedAction> {
        if self.count == 0 {
            return None;
        }
        let action = self.buf[self.read];
        self.read = (self.read + 1) % N;
        self.count -= 1;
        Some(action)
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.count = 0;
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Maximum number of queued actions.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `true` when a push would fail.
    pub fn is_full(&self) -> bool {
        self.count == N
    }
}

impl<const N: usize> Default for ActionQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
