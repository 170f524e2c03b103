use std::str::FromStr;

use image::Rgb;
use strum::{EnumString, IntoStaticStr, VariantArray};

/// The flow colors of the classic game, addressable by name in puzzle files.
#[derive(Copy, Clone, Debug, Eq, PartialEq, EnumString, IntoStaticStr, VariantArray)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum NamedColor {
    Blue,
    Brown,
    DarkRed,
    Gray,
    Green,
    LightBlue,
    Lime,
    Orange,
    Pink,
    Purple,
    Red,
    White,
    Yellow,
}

impl NamedColor {
    /// The color's RGB value.
    pub fn rgb(&self) -> Rgb<u8> {
        Rgb(match self {
            Self::Blue => [0, 0, 255],
            Self::Brown => [205, 133, 63],
            Self::DarkRed => [139, 0, 0],
            Self::Gray => [128, 128, 128],
            Self::Green => [0, 139, 0],
            Self::LightBlue => [135, 206, 250],
            Self::Lime => [0, 255, 0],
            Self::Orange => [255, 165, 0],
            Self::Pink => [255, 0, 255],
            Self::Purple => [128, 0, 128],
            Self::Red => [255, 0, 0],
            Self::White => [255, 255, 255],
            Self::Yellow => [255, 255, 0],
        })
    }
}

/// Background drawn between cells.
pub const BORDER: Rgb<u8> = Rgb([192, 192, 192]);
/// Fill of cells no flow claims.
pub const UNCLAIMED: Rgb<u8> = Rgb([0, 0, 0]);

/// Read a color written either as a [`NamedColor`] (`"light_blue"`, `"RED"`) or as `#rrggbb` hex.
pub fn parse_color(text: &str) -> Option<Rgb<u8>> {
    if let Some(hex) = text.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        return Some(Rgb([channel(0)?, channel(2)?, channel(4)?]));
    }

    NamedColor::from_str(text).ok().map(|named| named.rgb())
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use strum::VariantArray;

    use super::{parse_color, NamedColor};

    #[test]
    fn names_and_hex() {
        assert_eq!(parse_color("BLUE"), Some(Rgb([0, 0, 255])));
        assert_eq!(parse_color("light_blue"), Some(Rgb([135, 206, 250])));
        assert_eq!(parse_color("#CD853F"), Some(NamedColor::Brown.rgb()));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#12345g"), None);
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn every_name_round_trips() {
        for color in NamedColor::VARIANTS {
            let name: &'static str = (*color).into();
            assert_eq!(parse_color(name), Some(color.rgb()));
        }
    }
}
