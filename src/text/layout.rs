//! Line layout: wraps text into a block that fits a fixed frame.
//!
//! The engine is pure and deterministic: greedy word packing at a candidate
//! font size, shrinking the size until the block fits the height budget, with
//! an ellipsis cut once the configured floor is reached. Measurement goes
//! through [`TextMeasurer`] so the algorithm can be exercised without a font
//! stack; production rendering uses [`PangoMeasurer`].

use pango::prelude::FontMapExt;

/// Pixel metrics for a single line of text at a given font size.
pub trait TextMeasurer {
    fn line_width(&self, text: &str, size: f64) -> f64;
    fn line_height(&self, size: f64) -> f64;
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Maximum line width in pixels.
    pub max_width: f64,
    /// Maximum total block height in pixels.
    pub max_height: f64,
    /// Candidate size the shrink loop starts from.
    pub starting_size: f64,
    /// Floor below which the size never shrinks.
    pub min_size: f64,
    /// Vertical advance between lines, as a multiple of the line height.
    pub line_spacing: f64,
}

const SIZE_STEP: f64 = 2.0;
const ELLIPSIS: char = '…';

/// A fitted block: the chosen size and the wrapped lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub size: f64,
    /// Vertical step between line tops, in pixels.
    pub advance: f64,
}

impl TextBlock {
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.advance
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Wraps `text` so that every line fits `opts.max_width` and the whole block
/// fits `opts.max_height`, shrinking from `starting_size` down to `min_size`
/// and truncating with an ellipsis only at the floor.
///
/// Empty (or all-whitespace) text produces a block with zero lines.
pub fn fit_block(text: &str, measurer: &impl TextMeasurer, opts: &LayoutOptions) -> TextBlock {
    let text = text.trim();
    if text.is_empty() {
        return TextBlock {
            lines: Vec::new(),
            size: opts.starting_size,
            advance: 0.0,
        };
    }

    let mut size = opts.starting_size.max(opts.min_size);
    loop {
        let lines = wrap(text, measurer, size, opts.max_width);
        let advance = measurer.line_height(size) * opts.line_spacing;
        let height = lines.len() as f64 * advance;
        if height <= opts.max_height {
            return TextBlock {
                lines,
                size,
                advance,
            };
        }
        if size <= opts.min_size {
            return truncate(lines, size, advance, measurer, opts);
        }
        size = (size - SIZE_STEP).max(opts.min_size);
    }
}

/// Greedy word packing. A word that alone exceeds the width is split by
/// characters as a last resort, so the width contract holds even then.
fn wrap(text: &str, measurer: &impl TextMeasurer, size: f64, max_width: f64) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            place_word(word, &mut lines, &mut current, measurer, size, max_width);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measurer.line_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            place_word(word, &mut lines, &mut current, measurer, size, max_width);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Starts a fresh line with `word`, hard-splitting it when it cannot fit a
/// line on its own. Completed fragments go to `lines`, the remainder becomes
/// the new current line.
fn place_word(
    word: &str,
    lines: &mut Vec<String>,
    current: &mut String,
    measurer: &impl TextMeasurer,
    size: f64,
    max_width: f64,
) {
    if measurer.line_width(word, size) <= max_width {
        current.push_str(word);
        return;
    }
    let mut fragment = String::new();
    for c in word.chars() {
        fragment.push(c);
        if measurer.line_width(&fragment, size) > max_width && fragment.chars().count() > 1 {
            let last = fragment.pop().unwrap();
            lines.push(std::mem::take(&mut fragment));
            fragment.push(last);
        }
    }
    *current = fragment;
}

/// At the size floor: keep as many lines as fit and end the last kept line
/// with an ellipsis that itself respects the width limit.
fn truncate(
    mut lines: Vec<String>,
    size: f64,
    advance: f64,
    measurer: &impl TextMeasurer,
    opts: &LayoutOptions,
) -> TextBlock {
    let capacity = if advance > 0.0 {
        ((opts.max_height / advance).floor() as usize).max(1)
    } else {
        1
    };
    if lines.len() > capacity {
        lines.truncate(capacity);
        if let Some(last) = lines.last_mut() {
            last.push(ELLIPSIS);
            while measurer.line_width(last, size) > opts.max_width && last.chars().count() > 1 {
                last.pop();
                last.pop();
                last.push(ELLIPSIS);
            }
        }
    }
    TextBlock {
        lines,
        size,
        advance,
    }
}

/// [`TextMeasurer`] backed by Pango metrics. One instance holds its own
/// layout and context, so concurrent renders never share measurement state.
pub struct PangoMeasurer {
    layout: pango::Layout,
    desc: pango::FontDescription,
}

impl PangoMeasurer {
    pub fn new(desc: pango::FontDescription) -> Self {
        let context = pangocairo::FontMap::new().create_context();
        let layout = pango::Layout::new(&context);
        Self { layout, desc }
    }

    fn prepare(&self, text: &str, size: f64) {
        let mut desc = self.desc.clone();
        desc.set_absolute_size(size * pango::SCALE as f64);
        self.layout.set_font_description(Some(&desc));
        self.layout.set_text(text);
    }
}

impl TextMeasurer for PangoMeasurer {
    fn line_width(&self, text: &str, size: f64) -> f64 {
        self.prepare(text, size);
        self.layout.pixel_size().0 as f64
    }

    fn line_height(&self, size: f64) -> f64 {
        // Representative ascender + descender sample.
        self.prepare("Ágy", size);
        self.layout.pixel_size().1 as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-advance mock: every char is 0.6×size wide, lines are size tall.
    struct MonoMeasurer;

    impl TextMeasurer for MonoMeasurer {
        fn line_width(&self, text: &str, size: f64) -> f64 {
            text.chars().count() as f64 * size * 0.6
        }

        fn line_height(&self, size: f64) -> f64 {
            size
        }
    }

    fn opts(max_width: f64, max_height: f64) -> LayoutOptions {
        LayoutOptions {
            max_width,
            max_height,
            starting_size: 20.0,
            min_size: 10.0,
            line_spacing: 1.0,
        }
    }

    #[test]
    fn empty_text_yields_no_lines() {
        let block = fit_block("   ", &MonoMeasurer, &opts(300.0, 300.0));
        assert!(block.is_empty());
        assert_eq!(block.height(), 0.0);
    }

    #[test]
    fn every_line_fits_the_width() {
        let o = opts(120.0, 1000.0);
        let block = fit_block(
            "the quick brown fox jumps over the lazy dog",
            &MonoMeasurer,
            &o,
        );
        assert!(!block.is_empty());
        for line in &block.lines {
            assert!(MonoMeasurer.line_width(line, block.size) <= o.max_width, "{line}");
        }
        // Short input at the default size should not shrink.
        assert_eq!(block.size, o.starting_size);
    }

    #[test]
    fn wrapping_preserves_all_words() {
        let text = "one two three four five six seven";
        let block = fit_block(text, &MonoMeasurer, &opts(80.0, 1000.0));
        let rejoined = block.lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn shrinks_until_block_fits_height() {
        // 3 lines at size 20 (h=60) exceed 40px; shrinking makes room.
        let o = opts(130.0, 40.0);
        let block = fit_block(
            "alpha beta gamma delta epsilon zeta eta theta",
            &MonoMeasurer,
            &o,
        );
        assert!(block.size < o.starting_size);
        assert!(block.height() <= o.max_height);
        for line in &block.lines {
            assert!(MonoMeasurer.line_width(line, block.size) <= o.max_width);
        }
    }

    #[test]
    fn oversized_word_is_split_not_overflowed() {
        let o = opts(60.0, 1000.0);
        let block = fit_block("pneumonoultramicroscopic", &MonoMeasurer, &o);
        assert!(block.lines.len() > 1);
        for line in &block.lines {
            assert!(MonoMeasurer.line_width(line, block.size) <= o.max_width);
        }
        assert_eq!(block.lines.concat(), "pneumonoultramicroscopic");
    }

    #[test]
    fn floor_truncates_with_ellipsis() {
        // Height fits a single line even at the floor; the rest is cut.
        let o = LayoutOptions {
            max_width: 100.0,
            max_height: 12.0,
            starting_size: 20.0,
            min_size: 10.0,
            line_spacing: 1.0,
        };
        let block = fit_block(
            "a very long quote that cannot possibly fit in one tiny line",
            &MonoMeasurer,
            &o,
        );
        assert_eq!(block.size, o.min_size);
        assert_eq!(block.lines.len(), 1);
        assert!(block.lines[0].ends_with(ELLIPSIS));
        assert!(MonoMeasurer.line_width(&block.lines[0], block.size) <= o.max_width);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let o = opts(90.0, 50.0);
        let text = "determinism is a feature not an accident";
        assert_eq!(
            fit_block(text, &MonoMeasurer, &o),
            fit_block(text, &MonoMeasurer, &o)
        );
    }
}
