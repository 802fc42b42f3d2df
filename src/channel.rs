//! Allocation of the peripheral's transmission channels.

use core::cell::Cell;

/// Number of transmission channels on the ESP32 RMT peripheral.
pub const DEFAULT_CHANNEL_COUNT: usize = 8;

/// Largest pool a [`Channel`] index can address.
pub const MAX_CHANNEL_COUNT: usize = u8::MAX as usize + 1;

/// One hardware transmission channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Refers to the channel with hardware index `index`.
    #[inline]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the hardware index of this channel.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl From<Channel> for usize {
    fn from(channel: Channel) -> Self {
        channel.0 as usize
    }
}

/// Registry of which channels are claimed.
///
/// Hands out the lowest free index first. Uses `Cell`s so strips can share
/// one pool by reference; it is not meant to be used from more than one
/// execution context.
pub struct ChannelPool<const C: usize> {
    used: [Cell<bool>; C],
}

impl<const C: usize> ChannelPool<C> {
    /// Creates a pool with every channel free.
    ///
    /// Fails to compile when `C` exceeds [`MAX_CHANNEL_COUNT`].
    pub fn new() -> Self {
        const { assert!(C <= MAX_CHANNEL_COUNT, "channel index must fit in u8") };
        Self {
            used: core::array::from_fn(|_| Cell::new(false)),
        }
    }

    /// Claims the lowest-numbered free channel.
    ///
    /// Returns `None` when every channel is in use.
    pub fn acquire(&self) -> Option<Channel> {
        let index = self.used.iter().position(|used| !used.get())?;
        let id = u8::try_from(index).ok()?;
        self.used[index].set(true);
        Some(Channel(id))
    }

    /// Returns a channel to the pool.
    ///
    /// Releasing a free channel, or one this pool does not own, does nothing.
    pub fn release(&self, channel: Channel) {
        if let Some(used) = self.used.get(usize::from(channel)) {
            used.set(false);
        }
    }

    /// Returns true if the channel is currently claimed.
    pub fn is_used(&self, channel: Channel) -> bool {
        self.used
            .get(usize::from(channel))
            .is_some_and(Cell::get)
    }

    /// Number of channels still available.
    pub fn free_count(&self) -> usize {
        self.used.iter().filter(|used| !used.get()).count()
    }

    /// Total number of channels managed by this pool.
    pub const fn capacity(&self) -> usize {
        C
    }

    /// Marks every channel free again.
    ///
    /// Only for test setups: strips still holding a channel are not told.
    pub fn reset(&self) {
        for used in &self.used {
            used.set(false);
        }
    }
}

impl<const C: usize> Default for ChannelPool<C> {
    fn default() -> Self {
        Self::new()
    }
}
