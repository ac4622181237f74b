//! Fixed colors for waterfall tokens.

use image::Rgb;
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::annotate::*;
use crate::order::SEPARATOR;

pub const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
pub const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
pub const GREY: Rgb<u8> = Rgb([0x80, 0x80, 0x80]);
pub const LIGHT_GREY: Rgb<u8> = Rgb([0xAA, 0xAA, 0xAA]);

/// Color for tokens that have no palette entry.
pub const FALLBACK: Rgb<u8> = Rgb([0x33, 0x33, 0x33]);

lazy_static! {
    static ref COLORS: FxHashMap<u8, Rgb<u8>> = {
        let mut colors = FxHashMap::default();
        colors.insert(DOUBLE_MOTIF, Rgb([0x77, 0x77, 0xFF]));
        colors.insert(SINGLE_MOTIF, Rgb([0x55, 0x55, 0xFF]));
        colors.insert(SINGLE_REV_MOTIF, Rgb([0xFF, 0x55, 0x55]));
        colors.insert(DOUBLE_REV_MOTIF, Rgb([0xFF, 0x77, 0x77]));
        colors.insert(FLANK, WHITE);
        colors.insert(OTHER, FALLBACK);
        colors.insert(b'A', Rgb([0x00, 0xA0, 0x00]));
        colors.insert(b'C', Rgb([0x00, 0x00, 0xC0]));
        colors.insert(b'G', Rgb([0xE0, 0xA0, 0x00]));
        colors.insert(b'T', Rgb([0xD0, 0x00, 0x00]));
        colors.insert(b'N', Rgb([0x40, 0x40, 0x40]));
        colors.insert(SEPARATOR, Rgb([0xFF, 0xFF, 0x55]));
        colors
    };
}

pub fn color(token: u8) -> Rgb<u8> {
    COLORS.get(&token).copied().unwrap_or(FALLBACK)
}

/// Color of the cell at column `col` of a stretched row: black when the token
/// agrees with the repeating `reference`, otherwise the token's own color.
pub fn cell_color(token: u8, col: usize, reference: &[u8]) -> Rgb<u8> {
    if !reference.is_empty() && token == reference[col % reference.len()] {
        BLACK
    } else {
        color(token)
    }
}
