/*!
 * Timestamp normalization for subtitle formats.
 *
 * Accepts `HH:MM:SS.mmm`, `HH:MM:SS,mmm` and `MM:SS.mmm` and produces seconds as `f64`.
 * Fields that do not parse degrade to zero instead of failing, so a damaged
 * timestamp never blocks extraction of the surrounding text.
 */

use log::trace;

/// Cue range delimiter shared by WebVTT and SRT
pub const CUE_RANGE_DELIMITER: &str = "-->";

/// Convert a timestamp string to seconds.
///
/// Returns `None` only when the field count is neither 2 nor 3.
pub fn normalize(timestamp: &str) -> Option<f64> {
    let fields: Vec<&str> = timestamp.trim().split(':').collect();

    let (hours, minutes, seconds) = match fields.as_slice() {
        [hours, minutes, seconds] => (lenient_field(hours), lenient_field(minutes), lenient_seconds(seconds)),
        [minutes, seconds] => (0.0, lenient_field(minutes), lenient_seconds(seconds)),
        _ => {
            trace!("Not a timestamp: {:?}", timestamp);
            return None;
        }
    };

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Split a cue timing line into normalized start and end times.
///
/// Anything after the first whitespace on the end side (WebVTT cue settings) is dropped.
/// Returns `None` when the line has no range delimiter.
pub fn parse_range(line: &str) -> Option<(Option<f64>, Option<f64>)> {
    let (start, end) = line.split_once(CUE_RANGE_DELIMITER)?;

    let end = end.split_whitespace().next();
    Some((normalize(start), end.and_then(normalize)))
}

// Seconds accept either decimal separator
fn lenient_seconds(field: &str) -> f64 {
    lenient_field(&field.replace(',', "."))
}

fn lenient_field(field: &str) -> f64 {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}
