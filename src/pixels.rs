//! Per-strip pixel storage in wire byte order.

use alloc::vec::Vec;

use crate::colors::Rgbw;
use crate::types::{ColorOrder, PixelIndex};

/// Errors from pixel buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelError {
    /// The buffer could not be allocated.
    OutOfMemory,

    /// Index is not below the LED count.
    IndexOutOfRange,
}

impl core::fmt::Display for PixelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PixelError::OutOfMemory => write!(f, "out of memory for pixel buffer"),
            PixelError::IndexOutOfRange => write!(f, "pixel index out of range"),
        }
    }
}

/// Color bytes for every LED on a strip, laid out exactly as transmitted.
///
/// Each pixel takes 3 bytes, or 4 when the white channel is enabled.
/// Allocated once and never resized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    bytes: Vec<u8>,
    led_count: PixelIndex,
    color_order: ColorOrder,
    white_channel: bool,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer for `led_count` pixels.
    pub fn new(
        led_count: PixelIndex,
        color_order: ColorOrder,
        white_channel: bool,
    ) -> Result<Self, PixelError> {
        let len = usize::from(led_count) * component_width(white_channel);
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| PixelError::OutOfMemory)?;
        bytes.resize(len, 0);

        Ok(Self {
            bytes,
            led_count,
            color_order,
            white_channel,
        })
    }

    /// Writes one pixel.
    ///
    /// The white byte is only written when the white channel is enabled.
    pub fn write_pixel(&mut self, index: PixelIndex, color: Rgbw) -> Result<(), PixelError> {
        if index >= self.led_count {
            return Err(PixelError::IndexOutOfRange);
        }
        self.store(index, color);
        Ok(())
    }

    /// Writes the same color to every pixel, lowest index first.
    pub fn fill(&mut self, color: Rgbw) {
        for index in 0..self.led_count {
            self.store(index, color);
        }
    }

    /// Reads a pixel back. White reads as 0 on RGB strips.
    pub fn pixel(&self, index: PixelIndex) -> Option<Rgbw> {
        if index >= self.led_count {
            return None;
        }
        let base = self.base(index);
        let at = self.color_order.offsets();
        let w = if self.white_channel {
            self.bytes[base + at.w]
        } else {
            0
        };
        Some(Rgbw::new(
            self.bytes[base + at.r],
            self.bytes[base + at.g],
            self.bytes[base + at.b],
            w,
        ))
    }

    /// Raw bytes in transmission order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of pixels.
    #[inline]
    pub fn led_count(&self) -> PixelIndex {
        self.led_count
    }

    /// Bytes per pixel, 3 or 4.
    #[inline]
    pub fn component_width(&self) -> usize {
        component_width(self.white_channel)
    }

    #[inline]
    pub fn color_order(&self) -> ColorOrder {
        self.color_order
    }

    #[inline]
    pub fn white_channel(&self) -> bool {
        self.white_channel
    }

    /// Gives up the allocation without freeing it and empties the buffer.
    ///
    /// For a peripheral that could not be stopped and may still read it.
    pub(crate) fn leak(&mut self) {
        let _ = core::mem::take(&mut self.bytes).leak();
        self.led_count = 0;
    }

    #[inline]
    fn base(&self, index: PixelIndex) -> usize {
        usize::from(index) * self.component_width()
    }

    fn store(&mut self, index: PixelIndex, color: Rgbw) {
        let base = self.base(index);
        let at = self.color_order.offsets();
        if self.white_channel {
            self.bytes[base + at.w] = color.w;
        }
        self.bytes[base + at.r] = color.r;
        self.bytes[base + at.g] = color.g;
        self.bytes[base + at.b] = color.b;
    }
}

#[inline]
const fn component_width(white_channel: bool) -> usize {
    if white_channel { 4 } else { 3 }
}
