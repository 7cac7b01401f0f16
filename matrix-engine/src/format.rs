//! FILENAME: matrix-engine/src/format.rs
//! Format-string resolution and the renderer seam.
//!
//! The core decides which format string and which raw value apply to a
//! cell; the actual rendering sits behind the `ValueRenderer` trait so a
//! platform formatter can be plugged in. `BasicValueRenderer` covers the
//! common numeric masks for standalone use and tests.

use matrix_model::{CellValue, MeasureDescriptor, MeasureValue};

use crate::error::MatrixError;

/// Rendering of an empty value. Normalized to "" before display.
pub const BLANK_SENTINEL: &str = "(Blank)";

/// Fallback format when neither the measure nor the row declares one.
pub const DEFAULT_FORMAT: &str = "0.0";

// ============================================================================
// RENDERER SEAM
// ============================================================================

/// Renders a raw value under an opaque format string.
pub trait ValueRenderer {
    fn render(&self, value: &CellValue, format_string: &str) -> String;
}

/// Minimal mask-driven renderer: decimal places and thousands separators
/// are read from the mask, a trailing `%` scales and suffixes, text and
/// booleans pass through, empties render the blank sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicValueRenderer;

impl ValueRenderer for BasicValueRenderer {
    fn render(&self, value: &CellValue, format_string: &str) -> String {
        match value {
            CellValue::Empty => BLANK_SENTINEL.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Number(n) => render_number(*n, format_string),
        }
    }
}

fn render_number(value: f64, mask: &str) -> String {
    let percent = mask.ends_with('%');
    let mask = mask.trim_end_matches('%');
    let value = if percent { value * 100.0 } else { value };

    let decimal_places = mask
        .rsplit_once('.')
        .map(|(_, frac)| frac.chars().filter(|c| *c == '0' || *c == '#').count())
        .unwrap_or(0);
    let use_thousands = mask.split('.').next().is_some_and(|int| int.contains(','));

    let mut formatted = format_decimal(value, decimal_places, use_thousands);
    if percent {
        formatted.push('%');
    }
    formatted
}

/// Format a number with fixed decimal places and an optional thousands
/// separator.
fn format_decimal(value: f64, decimal_places: usize, use_thousands_separator: bool) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places);

    if use_thousands_separator {
        add_thousands_separator(&rounded)
    } else {
        rounded
    }
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let parts: Vec<&str> = s.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1);

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{}", result);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

// ============================================================================
// MEASURE FORMATTER
// ============================================================================

fn present(format: Option<&String>) -> Option<&str> {
    format.map(String::as_str).filter(|s| !s.is_empty())
}

/// Resolves the applicable format string per cell and renders through the
/// configured renderer.
pub struct MeasureFormatter<'a> {
    sources: &'a [MeasureDescriptor],
    renderer: &'a dyn ValueRenderer,
}

impl<'a> MeasureFormatter<'a> {
    pub fn new(sources: &'a [MeasureDescriptor], renderer: &'a dyn ValueRenderer) -> Self {
        MeasureFormatter { sources, renderer }
    }

    /// Formats one cell. Resolution order for the format string: the
    /// measure's declared format, then the cell's row-local fallback,
    /// then `DEFAULT_FORMAT`. A blank rendering normalizes to "".
    ///
    /// An out-of-range slot falls back to slot 0 only when exactly one
    /// measure exists; otherwise it is an error.
    pub fn format_value(
        &self,
        raw: &CellValue,
        slot: usize,
        row_values: &[MeasureValue],
    ) -> Result<String, MatrixError> {
        let count = self.sources.len();
        let source = if slot < count {
            &self.sources[slot]
        } else if count == 1 {
            &self.sources[0]
        } else {
            return Err(MatrixError::MeasureIndexOutOfRange { index: slot, count });
        };

        let format_string = present(source.format.as_ref())
            .or_else(|| {
                row_values
                    .get(slot)
                    .and_then(|v| present(v.format_string.as_ref()))
            })
            .unwrap_or(DEFAULT_FORMAT);

        let rendered = self.renderer.render(raw, format_string);
        if rendered == BLANK_SENTINEL {
            Ok(String::new())
        } else {
            Ok(rendered)
        }
    }
}
