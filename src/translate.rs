//! Byte to pulse translation.
//!
//! [`translate`] is called by the peripheral's service routine (usually an
//! interrupt) each time its pulse memory drains. It must stay cheap: no
//! allocation, no locking, no division beyond a shift, and work strictly
//! proportional to the bytes it converts. It never fails; anything it
//! cannot handle is reported as zero progress and the peripheral calls
//! again later.

use crate::timing::{MAX_TICKS, TimingProfile};

/// Number of pulse entries produced per source byte.
pub const PULSES_PER_BYTE: usize = 8;

/// One two-phase pulse entry, packed the way the hardware stores it.
///
/// Bits 0-14 hold the first duration, bit 15 its level, bits 16-30 the
/// second duration and bit 31 its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PulseCode(u32);

const DURATION_MASK: u32 = MAX_TICKS as u32;
const LEVEL0_BIT: u32 = 1 << 15;
const LEVEL1_BIT: u32 = 1 << 31;

impl PulseCode {
    /// Packs a pulse. Durations above 15 bits are truncated.
    #[inline]
    pub const fn new(level0: bool, duration0: u16, level1: bool, duration1: u16) -> Self {
        let mut bits = (duration0 as u32 & DURATION_MASK)
            | ((duration1 as u32 & DURATION_MASK) << 16);
        if level0 {
            bits |= LEVEL0_BIT;
        }
        if level1 {
            bits |= LEVEL1_BIT;
        }
        Self(bits)
    }

    /// High for `on` ticks, then low for `off` ticks.
    #[inline]
    pub const fn high_low(on: u16, off: u16) -> Self {
        Self::new(true, on, false, off)
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn level0(self) -> bool {
        self.0 & LEVEL0_BIT != 0
    }

    #[inline]
    pub const fn duration0(self) -> u16 {
        (self.0 & DURATION_MASK) as u16
    }

    #[inline]
    pub const fn level1(self) -> bool {
        self.0 & LEVEL1_BIT != 0
    }

    #[inline]
    pub const fn duration1(self) -> u16 {
        ((self.0 >> 16) & DURATION_MASK) as u16
    }
}

/// Progress made by one [`translate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Translation {
    /// Source bytes converted.
    pub consumed: usize,

    /// Pulse entries written.
    pub produced: usize,
}

impl Translation {
    /// No progress.
    pub const NONE: Translation = Translation {
        consumed: 0,
        produced: 0,
    };
}

/// Converts as many whole bytes of `src` as fit into `dest`.
///
/// Every byte becomes 8 pulses, most significant bit first: a 1 bit is
/// `high_on`/`high_off`, a 0 bit is `low_on`/`low_off`, always high then
/// low. `dest.len()` is the capacity the peripheral asked for.
///
/// Returns [`Translation::NONE`] without touching `dest` when `timing` is
/// missing or `dest` cannot hold a full byte.
pub fn translate(timing: Option<&TimingProfile>, src: &[u8], dest: &mut [PulseCode]) -> Translation {
    let Some(timing) = timing else {
        return Translation::NONE;
    };
    if dest.len() < PULSES_PER_BYTE {
        return Translation::NONE;
    }

    let bytes = core::cmp::min(dest.len() / PULSES_PER_BYTE, src.len());
    let zero = PulseCode::high_low(timing.low_on, timing.low_off);
    let one = PulseCode::high_low(timing.high_on, timing.high_off);

    for (&byte, pulses) in src[..bytes]
        .iter()
        .zip(dest.chunks_exact_mut(PULSES_PER_BYTE))
    {
        encode_byte(byte, pulses, zero, one);
    }

    Translation {
        consumed: bytes,
        produced: bytes * PULSES_PER_BYTE,
    }
}

#[inline(always)]
fn encode_byte(byte: u8, pulses: &mut [PulseCode], zero: PulseCode, one: PulseCode) {
    for (bit, pulse) in pulses.iter_mut().enumerate() {
        *pulse = if byte & (0x80 >> bit) != 0 { one } else { zero };
    }
}

/// Function signature the peripheral calls to refill its pulse memory.
pub type TranslateFn = fn(Option<&TimingProfile>, &[u8], &mut [PulseCode]) -> Translation;

/// Cursor over one frame, for peripherals that drain it in batches.
///
/// Holds everything [`translate`] needs so the service routine does not
/// have to look up the owning strip.
#[derive(Debug, Clone)]
pub struct FrameTranslator<'a> {
    source: &'a [u8],
    cursor: usize,
    timing: Option<TimingProfile>,
    translator: TranslateFn,
}

impl<'a> FrameTranslator<'a> {
    /// Creates a cursor at the start of `source` using [`translate`].
    pub fn new(source: &'a [u8], timing: Option<TimingProfile>) -> Self {
        Self::with_translator(source, timing, translate)
    }

    /// Creates a cursor that refills through a custom translator.
    pub fn with_translator(
        source: &'a [u8],
        timing: Option<TimingProfile>,
        translator: TranslateFn,
    ) -> Self {
        Self {
            source,
            cursor: 0,
            timing,
            translator,
        }
    }

    /// Fills `dest` with the next batch and advances past the consumed bytes.
    pub fn fill(&mut self, dest: &mut [PulseCode]) -> Translation {
        let progress = (self.translator)(self.timing.as_ref(), self.remaining(), dest);
        self.cursor += progress.consumed.min(self.remaining().len());
        progress
    }

    /// Bytes not yet translated.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.source[self.cursor..]
    }

    /// True once every byte has been translated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.source.len()
    }
}
