//! Text Measurement
//!
//! Intrinsic size of text leaves in template content, in terminal cells.
//!
//! Widths come from `unicode-width` (East Asian Width tables) applied per
//! grapheme cluster from `unicode-segmentation`, so combining marks never add
//! width and emoji sequences count as one wide cell pair.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a single grapheme cluster.
fn grapheme_width(grapheme: &str) -> u16 {
    // Multi-codepoint emoji sequences (ZWJ, VS16, skin tones) render wide.
    let is_emoji_sequence = grapheme.chars().skip(1).any(|c| {
        matches!(c as u32, 0x200D | 0xFE0F | 0x1F3FB..=0x1F3FF)
    });
    if is_emoji_sequence {
        return 2;
    }
    grapheme.width().min(2) as u16
}

/// Measure the display width of a single line of text.
pub fn string_width(s: &str) -> u16 {
    if s.is_ascii() {
        let count = s.bytes().filter(|b| !b.is_ascii_control()).count();
        return count.min(u16::MAX as usize) as u16;
    }

    s.graphemes(true)
        .map(grapheme_width)
        .fold(0u16, |acc, w| acc.saturating_add(w))
}

/// Width of the widest line of `text`.
pub fn max_line_width(text: &str) -> u16 {
    text.split('\n').map(string_width).max().unwrap_or(0)
}

/// Measure the height of text when wrapped to a given width.
///
/// Returns the number of lines (minimum 1 for non-empty text, 0 for empty),
/// saturating at `u16::MAX`.
pub fn measure_text_height(text: &str, available_width: u16) -> u16 {
    if text.is_empty() {
        return 0;
    }

    if available_width == 0 {
        return 1;
    }

    let mut lines = 0u16;
    for line in text.split('\n') {
        let mut current = 0u16;
        let mut wrapped = 1u16;
        for grapheme in line.graphemes(true) {
            let w = if grapheme.chars().all(|c| c.is_ascii_control()) {
                0
            } else {
                grapheme_width(grapheme)
            };
            if current > 0 && current.saturating_add(w) > available_width {
                wrapped = wrapped.saturating_add(1);
                current = w;
            } else {
                current = current.saturating_add(w);
            }
        }
        lines = lines.saturating_add(wrapped);
    }

    lines
}
