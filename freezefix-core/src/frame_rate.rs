//! Frame-rate string parsing.
//!
//! Containers and users describe frame rates either as a rational
//! (`"30000/1001"`, the form ffprobe reports) or as a decimal (`"29.97"`).
//! Malformed input never raises; it yields `None`.

/// Parses a frame-rate string into frames per second.
///
/// A string with exactly one `/` is treated as `numerator/denominator`;
/// anything else is parsed as a single floating-point number. A zero on
/// either side of a rational has no value. The result is otherwise not
/// checked for sign: `"-30/1"` yields `Some(-30.0)` and callers must reject
/// non-positive rates themselves (see [`is_usable_frame_rate`]).
///
/// # Examples
///
/// ```rust
/// use freezefix_core::parse_frame_rate;
///
/// assert_eq!(parse_frame_rate(Some("25")), Some(25.0));
/// assert_eq!(parse_frame_rate(Some("0/5")), None);
/// assert_eq!(parse_frame_rate(Some("abc")), None);
/// assert_eq!(parse_frame_rate(None), None);
/// ```
pub fn parse_frame_rate(input: Option<&str>) -> Option<f64> {
    let raw = input?.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.matches('/').count() == 1 {
        let (num, den) = raw.split_once('/')?;
        let num = parse_finite(num)?;
        let den = parse_finite(den)?;
        if num == 0.0 || den == 0.0 {
            return None;
        }
        let rate = num / den;
        return rate.is_finite().then_some(rate);
    }

    parse_finite(raw)
}

/// Returns true when `fps` can drive a time-to-frame conversion.
pub fn is_usable_frame_rate(fps: f64) -> bool {
    fps.is_finite() && fps > 0.0
}

fn parse_finite(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
