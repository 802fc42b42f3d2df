//! Pulse timing profiles and nanosecond to tick conversion.
//!
//! All durations handed to the peripheral are expressed in ticks of the
//! divided source clock. Conversion happens once, when a profile is built;
//! the translator only copies precomputed tick counts.

/// Frequency of the clock feeding the pulse peripheral.
pub const SOURCE_CLOCK_HZ: u32 = 80_000_000;

/// Divider applied to [`SOURCE_CLOCK_HZ`] for every strip channel.
pub const CLOCK_DIVIDER: u8 = 8;

/// Length of one tick in nanoseconds (100 ns with the default clock).
pub const NS_PER_TICK: u32 = 1_000_000_000 / (SOURCE_CLOCK_HZ / CLOCK_DIVIDER as u32);

/// Largest tick count a pulse duration field can hold (15 bits).
pub const MAX_TICKS: u16 = 0x7FFF;

/// Converts nanoseconds to ticks, rounding up to the next whole tick.
#[inline]
pub const fn ns_to_ticks(ns: u32) -> u32 {
    ns.div_ceil(NS_PER_TICK)
}

/// Converts microseconds to ticks, rounding up to the next whole tick.
#[inline]
pub const fn us_to_ticks(us: u32) -> u32 {
    ns_to_ticks(us.saturating_mul(1000))
}

const fn clamp_ticks(ticks: u32) -> u16 {
    if ticks > u16::MAX as u32 {
        u16::MAX
    } else {
        ticks as u16
    }
}

/// Tick counts for both bit encodings plus the inter-frame reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingProfile {
    /// High time of a 0 bit.
    pub low_on: u16,

    /// Low time of a 0 bit.
    pub low_off: u16,

    /// High time of a 1 bit.
    pub high_on: u16,

    /// Low time of a 1 bit.
    pub high_off: u16,

    /// Idle time that latches a frame.
    pub reset: u16,
}

impl TimingProfile {
    /// Creates a profile from raw tick counts.
    #[inline]
    pub const fn new(low_on: u16, low_off: u16, high_on: u16, high_off: u16, reset: u16) -> Self {
        Self {
            low_on,
            low_off,
            high_on,
            high_off,
            reset,
        }
    }

    /// Creates a profile from datasheet values, rounding each up to whole ticks.
    ///
    /// Values too large for the hardware saturate and are rejected by
    /// [`is_valid`](Self::is_valid).
    pub const fn from_nanos(
        low_on_ns: u32,
        low_off_ns: u32,
        high_on_ns: u32,
        high_off_ns: u32,
        reset_us: u32,
    ) -> Self {
        Self {
            low_on: clamp_ticks(ns_to_ticks(low_on_ns)),
            low_off: clamp_ticks(ns_to_ticks(low_off_ns)),
            high_on: clamp_ticks(ns_to_ticks(high_on_ns)),
            high_off: clamp_ticks(ns_to_ticks(high_off_ns)),
            reset: clamp_ticks(us_to_ticks(reset_us)),
        }
    }

    /// Returns true if every tick count fits the 15-bit duration field.
    pub const fn is_valid(&self) -> bool {
        self.low_on <= MAX_TICKS
            && self.low_off <= MAX_TICKS
            && self.high_on <= MAX_TICKS
            && self.high_off <= MAX_TICKS
            && self.reset <= MAX_TICKS
    }

    /// Inter-frame reset time in ticks.
    #[inline]
    pub const fn reset_ticks(&self) -> u16 {
        self.reset
    }
}

/// Identifier of a bundled LED protocol.
///
/// Kept as a raw number rather than a closed enum: identifiers that are
/// not in the preset table resolve to the first entry (SK6822).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedProtocol(pub u8);

impl LedProtocol {
    /// SK6822 / SK6812 family.
    pub const SK6822: LedProtocol = LedProtocol(0x01);

    /// WS2811 / WS2812 / WS2812B family.
    pub const WS281X: LedProtocol = LedProtocol(0x03);
}

impl From<u8> for LedProtocol {
    fn from(id: u8) -> Self {
        LedProtocol(id)
    }
}

const PRESETS: [(LedProtocol, TimingProfile); 2] = [
    (
        LedProtocol::SK6822,
        TimingProfile::from_nanos(300, 900, 600, 600, 80),
    ),
    (
        LedProtocol::WS281X,
        TimingProfile::from_nanos(350, 900, 900, 350, 50),
    ),
];

/// Looks up the preset profile for a protocol.
///
/// Unknown identifiers fall back to the first preset instead of failing.
// FIXME: an unknown id silently selects SK6822 timing. Return an error
// instead once `StripConfig` validation can report it.
pub fn preset(protocol: LedProtocol) -> TimingProfile {
    PRESETS
        .iter()
        .find(|(id, _)| *id == protocol)
        .map(|(_, timing)| *timing)
        .unwrap_or(PRESETS[0].1)
}

/// Where a strip gets its timing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingConfig {
    /// Use the bundled profile for a protocol.
    Protocol(LedProtocol),

    /// Use caller supplied tick counts as-is.
    Manual(TimingProfile),
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig::Protocol(LedProtocol::SK6822)
    }
}

impl TimingConfig {
    /// Produces the concrete profile for this configuration.
    pub fn resolve(self) -> TimingProfile {
        match self {
            TimingConfig::Protocol(protocol) => preset(protocol),
            TimingConfig::Manual(timing) => timing,
        }
    }
}

impl From<LedProtocol> for TimingConfig {
    fn from(protocol: LedProtocol) -> Self {
        TimingConfig::Protocol(protocol)
    }
}

impl From<TimingProfile> for TimingConfig {
    fn from(timing: TimingProfile) -> Self {
        TimingConfig::Manual(timing)
    }
}
