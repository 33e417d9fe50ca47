//! Dirty-tracked values.
//!
//! Producers set the value whenever they like; consumers react only to
//! changes by checking [`Tracked::dirty`], and the owner of the main loop
//! clears the flag once everybody has had a look.

/// A value with a "changed since last clear" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracked<T> {
    value: T,
    dirty: bool,
}

impl<T: Copy + PartialEq> Tracked<T> {
    /// Wrap an initial value. Starts clean.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value
    }

    /// Store `value`; marks dirty only if it differs from the current value.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.dirty = true;
        }
    }

    /// `true` if the value changed since the last [`Tracked::clear`].
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge the current value.
    pub fn clear(&mut self) {
        self.dirty = false;
    }

    /// Mark dirty without changing the value (forces consumers to refresh).
    pub fn force_dirty(&mut self) {
        self.dirty = true;
    }
}

impl<T: Copy + PartialEq + Default> Default for Tracked<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
