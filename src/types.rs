//! Core types shared by the strip driver.

/// Index of a single LED on a strip (0-based).
pub type PixelIndex = u16;

/// Byte order expected by the LED chip family.
///
/// The pulse peripheral's wiring swaps the second and third byte of every
/// pixel, so green and blue always land at offsets `+2` and `+1`. Only the
/// position of red relative to green differs between the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    /// Red first. Common for SK6812 RGBW chips.
    #[default]
    Rgbw,

    /// Green first. Common for WS2812 style chips.
    Grbw,
}

/// Byte offsets of each logical channel within one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChannelOffsets {
    pub(crate) r: usize,
    pub(crate) g: usize,
    pub(crate) b: usize,
    pub(crate) w: usize,
}

impl ColorOrder {
    #[inline]
    pub(crate) const fn offsets(self) -> ChannelOffsets {
        match self {
            ColorOrder::Rgbw => ChannelOffsets { r: 0, g: 2, b: 1, w: 3 },
            ColorOrder::Grbw => ChannelOffsets { r: 2, g: 0, b: 1, w: 3 },
        }
    }
}

/// Errors returned by strip operations.
///
/// `E` is the error type of the [`PulsePeripheral`](crate::PulsePeripheral)
/// driving the strip; peripheral failures are passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripError<E> {
    /// The configuration is missing a required value or holds one the
    /// hardware cannot represent.
    InvalidArgument,

    /// A strip of exactly two LEDs was requested.
    Unsupported,

    /// The pixel buffer could not be allocated.
    OutOfMemory,

    /// Every transmission channel is already claimed.
    NotFound,

    /// Pixel index is past the end of the strip.
    InvalidSize,

    /// A flush is still in flight.
    NotFinished,

    /// The peripheral driver reported a failure.
    Peripheral(E),
}

impl<E> StripError<E> {
    /// Returns the peripheral error, if this is one.
    pub fn peripheral(&self) -> Option<&E> {
        match self {
            StripError::Peripheral(err) => Some(err),
            _ => None,
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for StripError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StripError::InvalidArgument => write!(f, "invalid strip configuration"),
            StripError::Unsupported => {
                write!(f, "a strip of 2 LEDs is not supported by the hardware")
            }
            StripError::OutOfMemory => write!(f, "out of memory for pixel buffer"),
            StripError::NotFound => write!(f, "no free transmission channel"),
            StripError::InvalidSize => write!(f, "pixel index out of range"),
            StripError::NotFinished => write!(f, "previous flush has not finished"),
            StripError::Peripheral(err) => write!(f, "peripheral error: {:?}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for StripError<E> {}
