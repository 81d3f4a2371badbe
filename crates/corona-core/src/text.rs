//! Text styles and text measurement.
//!
//! The layout engine never draws text, but it must know how much room a
//! label needs in order to size sectors. This module provides the seam a
//! rendering backend plugs its font metrics into.
//!
//! # Overview
//!
//! - [`TextStyle`] - Font family and size of one kind of label
//! - [`TextMeasure`] - Trait answering "how large is this string?"
//! - [`MonospaceMeasure`] - Deterministic estimate, independent of installed fonts
//! - [`CosmicMeasure`] - Shaping-based measurement through `cosmic-text`
//! - [`fit_to_width`] - Truncates a label with an ellipsis to fit a width
//!
//! # Quick Start
//!
//! ```
//! # use corona_core::text::{MonospaceMeasure, TextMeasure, TextStyle};
//! let style = TextStyle::new("sans-serif", 10.0);
//! let size = MonospaceMeasure::default().measure("Sender", &style);
//! assert_eq!(size.width(), 36.0);
//! assert_eq!(size.height(), 12.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, warn};
use serde::Deserialize;

use crate::geometry::Size;

const ELLIPSIS: &str = "...";

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Ascent as a multiple of the font size.
const ASCENT_FACTOR: f64 = 0.8;

/// Visual style of a label.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `12` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    font_family: String,
    font_size: f64,
}

impl TextStyle {
    /// Creates a new text style.
    pub fn new(font_family: &str, font_size: f64) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Height of one line of text in this style.
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    /// Distance from the top of a line to its baseline.
    pub fn ascent(&self) -> f64 {
        self.font_size * ASCENT_FACTOR
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
        }
    }
}

/// Measures rendered text.
///
/// Implementations return the size of the whole string, where each `\n`
/// separated line contributes one line height.
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size;
}

/// Estimates text size assuming every character has the same advance.
///
/// Results do not depend on the fonts installed on the machine, which makes
/// this the measure of choice for tests and headless runs.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    advance_ratio: f64,
}

impl MonospaceMeasure {
    /// Creates a measure where each character advances `advance_ratio` times
    /// the font size.
    pub fn new(advance_ratio: f64) -> Self {
        Self { advance_ratio }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let advance = style.font_size() * self.advance_ratio;
        let lines = text.lines().count().max(1);
        let longest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        Size::new(longest as f64 * advance, lines as f64 * style.line_height())
    }
}

/// Measures text by shaping it with `cosmic-text` against system fonts.
///
/// A single [`FontSystem`] is shared by all instances, since loading the
/// font database is expensive.
#[derive(Debug, Default, Clone, Copy)]
pub struct CosmicMeasure;

fn font_system() -> &'static Mutex<FontSystem> {
    static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();
    FONT_SYSTEM.get_or_init(|| {
        info!("Initializing FontSystem");
        Mutex::new(FontSystem::new())
    })
}

impl TextMeasure for CosmicMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let Ok(mut font_system) = font_system().lock() else {
            warn!("FontSystem lock poisoned, falling back to monospace estimate");
            return MonospaceMeasure::default().measure(text, style);
        };

        let font_size = style.font_size() as f32;
        let metrics = Metrics::new(font_size, style.line_height() as f32);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(style.font_family()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if total_height == 0.0 {
            return MonospaceMeasure::default().measure(text, style);
        }

        Size::new(f64::from(max_width), f64::from(total_height))
    }
}

/// Returns the longest prefix of `text` that fits into `max_width`.
///
/// When the text has to be shortened an ellipsis is appended, and the
/// ellipsis itself counts against the width. Returns an empty string when
/// not even the ellipsis fits.
///
/// # Examples
///
/// ```
/// # use corona_core::text::{fit_to_width, MonospaceMeasure, TextStyle};
/// let style = TextStyle::new("monospace", 10.0); // 6 units per character
/// let measure = MonospaceMeasure::default();
///
/// assert_eq!(fit_to_width("HttpSender", 60.0, &style, &measure), "HttpSender");
/// assert_eq!(fit_to_width("HttpSender", 48.0, &style, &measure), "HttpS...");
/// assert_eq!(fit_to_width("HttpSender", 10.0, &style, &measure), "");
/// ```
pub fn fit_to_width(
    text: &str,
    max_width: f64,
    style: &TextStyle,
    measure: &dyn TextMeasure,
) -> String {
    if measure.measure(text, style).width() <= max_width {
        return text.to_string();
    }

    let boundaries: Vec<usize> = text.char_indices().map(|(index, _)| index).collect();
    for &end in boundaries.iter().rev() {
        let candidate = format!("{}{ELLIPSIS}", &text[..end]);
        if measure.measure(&candidate, style).width() <= max_width {
            return candidate;
        }
    }

    String::new()
}
