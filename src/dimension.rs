//! Numeric and dimensioned value primitives
//!
//! Transform function arguments are either bare numbers (scale factors,
//! matrix components) or dimensioned values: lengths in pixels, percentages,
//! and angles in degrees. This module provides the parsers for those literals
//! and the pairwise merge functions used to interpolate between two keyframe
//! values at an animation progress.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit kind attached to a dimensioned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Length in pixels
    Px,
    /// Length as a percentage of a reference box
    Percent,
    /// Angle in degrees
    Deg,
}

impl Unit {
    /// The textual suffix appended when formatting a value of this unit.
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Percent => "%",
            Unit::Deg => "deg",
        }
    }
}

/// A numeric magnitude tagged with a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dim {
    pub value: f64,
    pub unit: Unit,
}

impl Dim {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// The canonical zero length (`0px`).
    pub fn zero_px() -> Self {
        Self::new(0.0, Unit::Px)
    }

    /// The canonical zero angle (`0deg`).
    pub fn zero_deg() -> Self {
        Self::new(0.0, Unit::Deg)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit.suffix())
    }
}

/// A single transform function argument: a bare number or a dimensioned value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Number(f64),
    Dim(Dim),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Number(n) => write!(f, "{}", format_number(*n)),
            Arg::Dim(d) => write!(f, "{}", d),
        }
    }
}

/// Format a number with up to six decimal places, trimming trailing zeros.
///
/// `15.0` formats as `"15"`, `15.5` as `"15.5"`, `1.0 / 3.0` as `"0.333333"`.
/// Negative zero is normalized to `"0"`.
pub fn format_number(x: f64) -> String {
    let x = if x == 0.0 { 0.0 } else { x };
    let mut s = format!("{:.6}", x);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Parse a bare number literal. Rejects anything with a unit suffix.
pub fn parse_number(s: &str) -> Option<f64> {
    let n: f64 = s.trim().parse().ok()?;
    n.is_finite().then_some(n)
}

/// Parse the magnitude left after stripping a unit suffix. A dimension token
/// has no whitespace between magnitude and suffix, so `"10 px"` is rejected.
fn parse_magnitude(s: &str) -> Option<f64> {
    if s.ends_with(char::is_whitespace) {
        return None;
    }
    parse_number(s)
}

/// Parse a length literal with an optional `px` suffix.
///
/// A bare number is treated as pixels, matching the canvas-oriented length
/// handling of the rest of the crate.
pub fn parse_length(s: &str) -> Option<Dim> {
    let s = s.trim();
    let value = match s.strip_suffix("px") {
        Some(num) => parse_magnitude(num)?,
        None => parse_number(s)?,
    };
    Some(Dim::new(value, Unit::Px))
}

/// Parse a length-or-percentage literal: optional `px` suffix or a `%` suffix.
pub fn parse_length_or_percent(s: &str) -> Option<Dim> {
    let s = s.trim();
    if let Some(num) = s.strip_suffix('%') {
        let value = parse_magnitude(num)?;
        return Some(Dim::new(value, Unit::Percent));
    }
    parse_length(s)
}

/// Parse an angle literal, normalized to degrees.
///
/// Accepts `deg`, `rad`, `grad` and `turn` suffixes; a bare number is treated
/// as degrees. The literal `0` is the canonical zero angle regardless of unit.
pub fn parse_angle(s: &str) -> Option<Dim> {
    let s = s.trim();
    if s == "0" {
        return Some(Dim::zero_deg());
    }
    let (num, factor) = if let Some(n) = s.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix("grad") {
        // checked before "rad": "grad" also ends with "rad"
        (n, 360.0 / 400.0)
    } else if let Some(n) = s.strip_suffix("rad") {
        (n, 180.0 / std::f64::consts::PI)
    } else if let Some(n) = s.strip_suffix("turn") {
        (n, 360.0)
    } else {
        (s, 1.0)
    };
    let value = parse_magnitude(num)?;
    Some(Dim::new(value * factor, Unit::Deg))
}

/// A merged pair of plain numbers, sampled repeatedly at different progress
/// values. Stateless between samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberTween {
    pub from: f64,
    pub to: f64,
}

impl NumberTween {
    /// Linear interpolation at `t`. Unclamped: values outside `[0, 1]`
    /// extrapolate.
    pub fn sample(&self, t: f64) -> f64 {
        self.from + (self.to - self.from) * t
    }

    /// Format the interpolated value as a plain number string.
    pub fn format(&self, t: f64) -> String {
        format_number(self.sample(t))
    }
}

/// A merged pair of dimensioned values sharing a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimTween {
    pub from: f64,
    pub to: f64,
    pub unit: Unit,
}

impl DimTween {
    pub fn sample(&self, t: f64) -> f64 {
        self.from + (self.to - self.from) * t
    }

    /// Format the interpolated magnitude with the unit suffix re-attached.
    pub fn format(&self, t: f64) -> String {
        format!("{}{}", format_number(self.sample(t)), self.unit.suffix())
    }
}

/// Merge two plain numbers. Any two finite numbers are mergeable.
pub fn merge_numbers(a: f64, b: f64) -> NumberTween {
    NumberTween { from: a, to: b }
}

/// Merge two dimensioned values.
///
/// The unit kinds must match. A zero-valued operand is unit-agnostic and
/// adopts the other side's unit; otherwise a unit mismatch is an
/// incompatibility condition reported as `None`, never a panic.
pub fn merge_dims(a: Dim, b: Dim) -> Option<DimTween> {
    let unit = if a.unit == b.unit {
        a.unit
    } else if a.value == 0.0 {
        b.unit
    } else if b.value == 0.0 {
        a.unit
    } else {
        return None;
    };
    Some(DimTween { from: a.value, to: b.value, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(15.5), "15.5");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2"), Some(2.0));
        assert_eq!(parse_number(" -0.5 "), Some(-0.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("2px"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("10px"), Some(Dim::new(10.0, Unit::Px)));
        assert_eq!(parse_length("10"), Some(Dim::new(10.0, Unit::Px)));
        assert_eq!(parse_length("-3.5px"), Some(Dim::new(-3.5, Unit::Px)));
        assert_eq!(parse_length("50%"), None);
        assert_eq!(parse_length("px"), None);
    }

    #[test]
    fn test_parse_length_or_percent() {
        assert_eq!(parse_length_or_percent("50%"), Some(Dim::new(50.0, Unit::Percent)));
        assert_eq!(parse_length_or_percent("10px"), Some(Dim::new(10.0, Unit::Px)));
        assert_eq!(parse_length_or_percent("0"), Some(Dim::new(0.0, Unit::Px)));
        assert_eq!(parse_length_or_percent("%"), None);
    }

    #[test]
    fn test_parse_angle() {
        assert_eq!(parse_angle("45deg"), Some(Dim::new(45.0, Unit::Deg)));
        assert_eq!(parse_angle("45"), Some(Dim::new(45.0, Unit::Deg)));
        assert_eq!(parse_angle("0"), Some(Dim::zero_deg()));
        assert_eq!(parse_angle("0.5turn"), Some(Dim::new(180.0, Unit::Deg)));
        assert_eq!(parse_angle("200grad"), Some(Dim::new(180.0, Unit::Deg)));
        let rad = parse_angle("3.141592653589793rad").unwrap();
        assert!((rad.value - 180.0).abs() < 1e-9);
        assert_eq!(parse_angle("deg"), None);
    }

    #[test]
    fn test_rejects_whitespace_before_suffix() {
        assert_eq!(parse_length("10 px"), None);
        assert_eq!(parse_length("10\tpx"), None);
        assert_eq!(parse_length_or_percent("50 %"), None);
        assert_eq!(parse_angle("45 deg"), None);
        assert_eq!(parse_angle("0.5 turn"), None);
    }

    #[test]
    fn test_merge_numbers_endpoints_and_linearity() {
        let tween = merge_numbers(10.0, 20.0);
        assert_eq!(tween.sample(0.0), 10.0);
        assert_eq!(tween.sample(1.0), 20.0);
        assert_eq!(tween.sample(0.5), 15.0);
        // unclamped extrapolation
        assert_eq!(tween.sample(2.0), 30.0);
        assert_eq!(tween.sample(-1.0), 0.0);
        assert_eq!(tween.format(0.5), "15");
    }

    #[test]
    fn test_merge_dims_same_unit() {
        let tween = merge_dims(Dim::new(10.0, Unit::Px), Dim::new(20.0, Unit::Px)).unwrap();
        assert_eq!(tween.format(0.5), "15px");
    }

    #[test]
    fn test_merge_dims_mismatched_units() {
        assert_eq!(merge_dims(Dim::new(10.0, Unit::Px), Dim::new(50.0, Unit::Percent)), None);
        assert_eq!(merge_dims(Dim::new(10.0, Unit::Px), Dim::new(45.0, Unit::Deg)), None);
    }

    #[test]
    fn test_merge_dims_zero_reconciles() {
        let tween = merge_dims(Dim::new(0.0, Unit::Px), Dim::new(50.0, Unit::Percent)).unwrap();
        assert_eq!(tween.unit, Unit::Percent);
        assert_eq!(tween.format(1.0), "50%");

        let tween = merge_dims(Dim::new(30.0, Unit::Deg), Dim::zero_deg()).unwrap();
        assert_eq!(tween.format(0.5), "15deg");
    }

    #[test]
    fn test_dim_display() {
        assert_eq!(Dim::new(10.0, Unit::Px).to_string(), "10px");
        assert_eq!(Dim::new(50.0, Unit::Percent).to_string(), "50%");
        assert_eq!(Dim::new(-45.5, Unit::Deg).to_string(), "-45.5deg");
    }
}
