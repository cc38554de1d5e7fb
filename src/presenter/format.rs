//! Display formatting for file metadata.

use chrono::{DateTime, Utc};

/// Binary units, largest last. Sizes beyond GB stay in GB.
const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with 1024-based units and up to two decimals.
///
/// `0` formats as `"0 B"`; trailing zeros are trimmed (`1536` → `"1.5 KB"`).
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut threshold: u64 = 1024;
    while unit < UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }

    let divisor = (1_u64 << (10 * unit)) as f64;
    let value = bytes as f64 / divisor;
    format!("{} {}", trim_decimals(value), UNITS[unit])
}

/// Two-decimal rendering with trailing zeros (and a bare point) removed.
fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Confidence in `[0, 1]` as a rounded whole percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn confidence_percent(confidence: f64) -> u8 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Badge label for a confidence score, e.g. `0.873` → `"87%"`.
pub fn confidence_label(confidence: f64) -> String {
    format!("{}%", confidence_percent(confidence))
}

/// Upload timestamp as shown under the filename.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %H:%M UTC").to_string()
}
