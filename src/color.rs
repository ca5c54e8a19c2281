//! Console color parsing and quantization.
//!
//! Cell colors are indices into the 16-cell console palette: the eight
//! base colors plus their bright variants. Hex colors quantize by
//! dominant channel, picking up the bright bit when any channel is hot.

/// Base palette names, index order 0–7.
pub const COLOR_NAMES: [&str; 8] = [
    "black", "blue", "green", "cyan", "red", "magenta", "yellow", "white",
];

/// Channel threshold for a color bit.
const CHANNEL_ON: u8 = 0x80;
/// Threshold above which the bright bit is set.
const BRIGHT_ON: u8 = 0xC0;

/// Parse a color argument: a palette name (`black`..`white`, indices 0–7)
/// or a `#RRGGBB` hex quantized to the nearest of the 16 console cells.
/// Returns `None` for anything else.
#[must_use]
pub fn parse_color(input: &str) -> Option<u8> {
    let s = input.trim();

    if let Some(idx) = COLOR_NAMES
        .iter()
        .position(|name| s.eq_ignore_ascii_case(name))
    {
        #[allow(clippy::cast_possible_truncation)] // idx < 8
        return Some(idx as u8);
    }

    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(quantize(r, g, b))
}

/// Quantize an RGB triple to the 16-color console palette: blue=1,
/// green=2, red=4 bits at the channel threshold, +8 bright when any
/// channel exceeds the high threshold.
#[must_use]
pub fn quantize(r: u8, g: u8, b: u8) -> u8 {
    let mut idx = 0u8;
    if b >= CHANNEL_ON {
        idx |= 1;
    }
    if g >= CHANNEL_ON {
        idx |= 2;
    }
    if r >= CHANNEL_ON {
        idx |= 4;
    }
    if r >= BRIGHT_ON || g >= BRIGHT_ON || b >= BRIGHT_ON {
        idx |= 8;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("black", 0)]
    #[test_case("blue", 1)]
    #[test_case("green", 2)]
    #[test_case("cyan", 3)]
    #[test_case("red", 4)]
    #[test_case("magenta", 5)]
    #[test_case("yellow", 6)]
    #[test_case("white", 7)]
    #[test_case("RED", 4; "names are case-insensitive")]
    fn names_map_to_base_indices(name: &str, expected: u8) {
        assert_eq!(parse_color(name), Some(expected));
    }

    #[test_case("#000000", 0; "black hex")]
    #[test_case("#000080", 1; "navy is blue")]
    #[test_case("#FF0000", 12; "pure red is bright red")]
    #[test_case("#00FFFF", 11; "pure cyan is bright cyan")]
    #[test_case("#808080", 7; "mid gray is white")]
    #[test_case("#FFFFFF", 15; "white hex is bright white")]
    fn hex_quantizes(hex: &str, expected: u8) {
        assert_eq!(parse_color(hex), Some(expected));
    }

    #[test_case(""; "empty")]
    #[test_case("#12345"; "short hex")]
    #[test_case("#GGGGGG"; "bad digits")]
    #[test_case("carrot"; "unknown name")]
    #[test_case("123456"; "missing hash")]
    fn invalid_inputs_are_rejected(input: &str) {
        assert_eq!(parse_color(input), None);
    }
}
