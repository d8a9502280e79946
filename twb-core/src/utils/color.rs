//! Packed 24-bit RGB colors.
//!
//! The expansion board's block protocol carries colors as a single integer
//! with the layout `0x00RRGGBB`: the high byte is unused and always zero,
//! then 8 bits each of red, green, and blue. `Color` wraps that layout,
//! extracts channels by shift-and-mask, and converts to the `RGB8` triples
//! the nav-light driver consumes.

use serde::{Deserialize, Deserializer, Serialize};
use smart_leds_trait::RGB8;

/// A 24-bit packed RGB color (`0x00RRGGBB`).
///
/// Serializes transparently as its packed integer, so command payloads
/// carry the same value the block surface passes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(u32);

/// All channels off.
pub const OFF: Color = Color::rgb(0, 0, 0);
/// Full red.
pub const RED: Color = Color::rgb(255, 0, 0);
/// Full green.
pub const GREEN: Color = Color::rgb(0, 255, 0);
/// Full blue.
pub const BLUE: Color = Color::rgb(0, 0, 255);
/// Red + green.
pub const YELLOW: Color = Color::rgb(255, 255, 0);
/// Green + blue.
pub const CYAN: Color = Color::rgb(0, 255, 255);
/// Red + blue.
pub const MAGENTA: Color = Color::rgb(255, 0, 255);
/// All channels full.
pub const WHITE: Color = Color::rgb(255, 255, 255);

impl Color {
    /// Pack red, green, and blue channels into a single color.
    pub const fn rgb(
        red: u8,
        green: u8,
        blue: u8,
    ) -> Self {
        Color(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Wrap an already-packed value, masking the unused high byte to zero.
    pub const fn packed(raw: u32) -> Self {
        Color(raw & 0x00FF_FFFF)
    }

    /// The packed `0x00RRGGBB` value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// All three channels as `(red, green, blue)`.
    pub const fn channels(self) -> (u8, u8, u8) {
        (self.red(), self.green(), self.blue())
    }
}

// Incoming payloads may carry junk in the unused high byte; mask it on
// the way in so equality and re-serialization stay canonical.
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Color::packed)
    }
}

impl From<Color> for RGB8 {
    fn from(color: Color) -> Self {
        RGB8 {
            r: color.red(),
            g: color.green(),
            b: color.blue(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels_in_rgb_order() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).as_u32(), 0x0012_3456);
        assert_eq!(RED.as_u32(), 0x00FF_0000);
        assert_eq!(GREEN.as_u32(), 0x0000_FF00);
        assert_eq!(BLUE.as_u32(), 0x0000_00FF);
    }

    #[test]
    fn round_trips_every_channel_value() {
        for v in 0..=255u8 {
            assert_eq!(Color::rgb(v, 0, 0).channels(), (v, 0, 0));
            assert_eq!(Color::rgb(0, v, 0).channels(), (0, v, 0));
            assert_eq!(Color::rgb(0, 0, v).channels(), (0, 0, v));
        }
        assert_eq!(Color::rgb(17, 203, 89).channels(), (17, 203, 89));
    }

    #[test]
    fn packed_masks_the_unused_high_byte() {
        assert_eq!(Color::packed(0xAB12_3456), Color::rgb(0x12, 0x34, 0x56));
        assert_eq!(Color::packed(0xFF00_0000).as_u32(), 0);
    }

    #[test]
    fn converts_to_rgb8() {
        let c: RGB8 = Color::rgb(10, 20, 30).into();
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
    }

    #[test]
    fn serde_carries_the_packed_integer() {
        let json = serde_json::to_string(&YELLOW).unwrap();
        assert_eq!(json, "16776960");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, YELLOW);
    }
}
