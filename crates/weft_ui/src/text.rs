//! Text measurement seam.
//!
//! The engine never shapes or rasterizes text. It asks a [`TextMeasurer`] for
//! the bounding size of a run and, when painting, for positioned glyphs that
//! already carry their atlas texture and UVs.

use serde::{Deserialize, Serialize};

use crate::layout::{Rect, Size};
use crate::render::{TextureId, UvRect};

/// Opaque font identifier, passed through to the measurer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FontId(pub u32);

/// A run of text to measure or emit.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    /// Font to use.
    pub font: FontId,
    /// Distance between baselines.
    pub line_height: f32,
    /// UTF-8 text.
    pub text: &'a str,
    /// Wrap width in pixels; 0 means no wrapping.
    pub wrap_width: f32,
}

/// One positioned glyph produced while emitting a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Font the glyph came from.
    pub font: FontId,
    /// Unicode scalar value.
    pub codepoint: char,
    /// Destination rectangle in screen space.
    pub dst: Rect,
    /// Source rectangle in the atlas.
    pub uv: UvRect,
    /// Atlas texture holding the glyph.
    pub texture: TextureId,
}

/// Capability injected at session construction to size and lay out text.
pub trait TextMeasurer {
    /// Returns the bounding size of `run` placed at `origin`. When `emit` is
    /// given, calls it once per visible glyph in reading order.
    fn measure_and_emit(
        &self,
        run: &TextRun<'_>,
        origin: (f32, f32),
        emit: Option<&mut dyn FnMut(Glyph)>,
    ) -> Size;

    /// Returns the bounding size of `run` without emitting glyphs.
    fn measure(&self, run: &TextRun<'_>) -> Size {
        self.measure_and_emit(run, (0.0, 0.0), None)
    }
}

/// Fixed-advance measurer over an ASCII grid atlas.
///
/// Printable ASCII (`' '..='~'`) maps to consecutive cells of a
/// `columns x rows` grid; anything else renders as `'?'`. Wrapping is greedy
/// at whitespace, falling back to a hard break inside long words.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    /// Horizontal advance of every glyph.
    pub advance: f32,
    /// Atlas texture.
    pub texture: TextureId,
    /// Atlas grid columns.
    pub columns: u32,
    /// Atlas grid rows.
    pub rows: u32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance: 8.0,
            texture: TextureId(0),
            columns: 16,
            rows: 6,
        }
    }
}

impl MonospaceMeasurer {
    /// Creates a measurer with the given advance and atlas texture.
    #[must_use]
    pub fn new(advance: f32, texture: TextureId) -> Self {
        Self {
            advance,
            texture,
            ..Self::default()
        }
    }

    /// Atlas cell of a character.
    fn uv_for(&self, c: char) -> UvRect {
        let code = u32::from(c);
        let cell = if (0x20..=0x7E).contains(&code) {
            code - 0x20
        } else {
            u32::from('?') - 0x20
        };
        let columns = self.columns.max(1);
        let rows = self.rows.max(1);
        #[allow(clippy::cast_precision_loss)]
        let (col, row, cw, ch) = (
            (cell % columns) as f32,
            (cell / columns) as f32,
            1.0 / columns as f32,
            1.0 / rows as f32,
        );
        UvRect::new(col * cw, row * ch, (col + 1.0) * cw, (row + 1.0) * ch)
    }

    /// Splits `text` into visual lines, calling `line` with each line's text.
    fn for_each_line<'t>(&self, text: &'t str, wrap_width: f32, mut line: impl FnMut(&'t str)) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_chars = if wrap_width > 0.0 && self.advance > 0.0 {
            ((wrap_width / self.advance).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        for hard_line in text.split('\n') {
            let chars: Vec<(usize, char)> = hard_line.char_indices().collect();
            if chars.len() <= max_chars {
                line(hard_line);
                continue;
            }

            let byte_at = |i: usize| chars.get(i).map_or(hard_line.len(), |&(b, _)| b);
            let mut start = 0;
            while start < chars.len() {
                if chars.len() - start <= max_chars {
                    line(&hard_line[byte_at(start)..]);
                    break;
                }
                let limit = start + max_chars;
                let split = (start + 1..=limit)
                    .rev()
                    .find(|&p| chars.get(p).is_some_and(|&(_, c)| c.is_whitespace()));
                match split {
                    Some(p) => {
                        line(&hard_line[byte_at(start)..byte_at(p)]);
                        start = p + 1;
                    }
                    None => {
                        line(&hard_line[byte_at(start)..byte_at(limit)]);
                        start = limit;
                    }
                }
            }
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_and_emit(
        &self,
        run: &TextRun<'_>,
        origin: (f32, f32),
        mut emit: Option<&mut dyn FnMut(Glyph)>,
    ) -> Size {
        let mut lines = 0_u32;
        let mut widest = 0_usize;

        self.for_each_line(run.text, run.wrap_width, |line| {
            #[allow(clippy::cast_precision_loss)]
            let y = origin.1 + lines as f32 * run.line_height;
            let mut count = 0_usize;
            for c in line.chars() {
                if let Some(emit) = emit.as_mut() {
                    if !c.is_whitespace() {
                        #[allow(clippy::cast_precision_loss)]
                        let x = origin.0 + count as f32 * self.advance;
                        emit(Glyph {
                            font: run.font,
                            codepoint: c,
                            dst: Rect::new(x, y, self.advance, run.line_height),
                            uv: self.uv_for(c),
                            texture: self.texture,
                        });
                    }
                }
                count += 1;
            }
            widest = widest.max(count);
            lines += 1;
        });

        #[allow(clippy::cast_precision_loss)]
        Size::new(
            widest as f32 * self.advance,
            lines.max(1) as f32 * run.line_height,
        )
    }
}
