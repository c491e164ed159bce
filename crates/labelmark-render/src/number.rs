/// Stringifies a number for SVG attributes.
///
/// Magnitudes of at least `0.1` keep 6 fractional digits. Smaller magnitudes keep up to 18 so
/// that tiny baseline shifts do not collapse to zero. Trailing zeros and a dangling `.` are
/// removed, and the output is never in exponent form.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut s = if v.abs() >= 0.1 {
        format!("{v:.6}")
    } else {
        // `Display` for f64 is positional and shortest round-trip; rounding first caps it at
        // 18 places.
        let r = (v * 1e18).round() / 1e18;
        format!("{r}")
    };

    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s.is_empty() || s == "-0" {
        "0".to_string()
    } else {
        s
    }
}
