//! Pixel color values and RGB/RGBW conversion.
//!
//! The conversions between RGB and RGBW are pass-throughs: the white
//! component is either dropped or zeroed, never derived from the other
//! channels. Callers driving RGBW strips supply white themselves.

use palette::Srgb;

/// An 8-bit red, green, blue and white color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgbw {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Rgbw {
    /// Creates a color with an explicit white component.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Creates a color with white off.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }
}

/// Prepares an RGB color for an RGBW strip. White is set to zero.
#[inline]
pub const fn rgb_to_rgbw(color: Rgbw) -> Rgbw {
    Rgbw::rgb(color.r, color.g, color.b)
}

/// Prepares an RGBW color for an RGB strip. White is dropped.
#[inline]
pub const fn rgbw_to_rgb(color: Rgbw) -> Rgbw {
    Rgbw::rgb(color.r, color.g, color.b)
}

impl From<Srgb<u8>> for Rgbw {
    fn from(color: Srgb<u8>) -> Self {
        Rgbw::rgb(color.red, color.green, color.blue)
    }
}

impl From<Srgb<f32>> for Rgbw {
    fn from(color: Srgb<f32>) -> Self {
        color.into_format::<u8>().into()
    }
}

impl From<(u8, u8, u8)> for Rgbw {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgbw::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Rgbw {
    fn from((r, g, b, w): (u8, u8, u8, u8)) -> Self {
        Rgbw::new(r, g, b, w)
    }
}

impl From<Rgbw> for Srgb<u8> {
    fn from(color: Rgbw) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}
