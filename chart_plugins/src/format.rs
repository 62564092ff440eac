//! Number formatting for bar labels, axis ticks and data tips.
//!
//! - [`humanize`]: fallback rendering of a measure when the host sent no
//!   pre-formatted string (`1000`, `1.00 K`, `2.50M`).
//! - [`to_fixed`]: fixed-decimal rendering; ties round away from zero.
//! - [`compact`]: short English compact notation (`1.2K`, `15M`) used by the
//!   weighted tree.

/// Round half up (towards +inf), like the host's `Math.round`.
fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}

// Every finite f64 has a terminating decimal expansion within this many
// fractional digits (the smallest subnormal is 2^-1074).
const EXACT_DIGITS: usize = 1074;

/// Render `x` with exactly `decimals` digits after the point, like the
/// host's `Number.prototype.toFixed`.
///
/// Rounding looks at the exact value of the double, not at its shortest
/// decimal spelling: `1.005` is stored as `1.00499999...` and renders as
/// `"1.00"`. Exact ties round away from zero (`1.125` -> `"1.13"`). A negative
/// input keeps its sign even when it rounds to zero (`-0.001` -> `"-0.00"`).
pub fn to_fixed(x: f64, decimals: usize) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let decimals = decimals.min(100);
    let exact = format!("{:.*}", EXACT_DIGITS, x.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();
    if frac.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        carry(&mut digits);
    }

    let split = digits.len() - decimals;
    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    let sign = if x < 0.0 { "-" } else { "" };
    if decimals == 0 {
        format!("{sign}{text}")
    } else {
        format!("{sign}{}.{}", &text[..split], &text[split..])
    }
}

// Add one unit in the last place of a decimal digit string.
fn carry(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

/// Human-friendly fallback for a measure value.
///
/// `n` is rounded to an integer first, then divided and passed through
/// [`to_fixed`], so the quotient's binary value decides ties
/// (`1005` -> `"1.00 K"`). Thresholds are strict: exactly 1 000
/// stays a plain integer and exactly 1 000 000 is still rendered in `K`.
/// Millions always use two decimals; thousands use `rounded` decimals.
pub fn humanize(n: f64, rounded: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let n = round_half_up(n);
    if n.abs() > 1_000_000.0 {
        format!("{}M", to_fixed(n / 1_000_000.0, 2))
    } else if n.abs() > 1_000.0 {
        format!("{} K", to_fixed(n / 1_000.0, rounded))
    } else {
        // |n| <= 1000, integral; `as` also folds -0.0 into 0.
        format!("{}", n as i64)
    }
}

const COMPACT_UNITS: [(f64, &str); 5] =
    [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// English compact notation: at most two significant digits below 10,
/// whole numbers from 10 up, with `K`/`M`/`B`/`T` suffixes.
pub fn compact(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    let mut idx = COMPACT_UNITS
        .iter()
        .rposition(|(unit, _)| abs >= *unit)
        .unwrap_or(0);

    loop {
        let (unit, suffix) = COMPACT_UNITS[idx];
        let scaled = abs / unit;
        let decimals = compact_decimals(scaled);
        let factor = 10f64.powi(decimals as i32);
        let rounded = (scaled * factor).round() / factor;
        if rounded >= 1000.0 && idx + 1 < COMPACT_UNITS.len() {
            idx += 1;
            continue;
        }
        let sign = if n < 0.0 { "-" } else { "" };
        return format!("{sign}{}{suffix}", trim_zeros(format!("{rounded:.decimals$}")));
    }
}

fn compact_decimals(scaled: f64) -> usize {
    if scaled >= 10.0 {
        0
    } else {
        // two significant digits
        let magnitude = scaled.log10().floor() as i32;
        (1 - magnitude).clamp(0, 12) as usize
    }
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_boundaries() {
        assert_eq!(humanize(1000.0, 2), "1000");
        assert_eq!(humanize(1001.0, 2), "1.00 K");
        assert_eq!(humanize(1_000_000.0, 2), "1000.00 K");
        assert_eq!(humanize(1_000_001.0, 2), "1.00M");
    }

    #[test]
    fn humanize_rounds_input_first() {
        assert_eq!(humanize(1000.4, 2), "1000");
        assert_eq!(humanize(1000.5, 2), "1.00 K");
        assert_eq!(humanize(-0.4, 2), "0");
        assert_eq!(humanize(-2.5, 2), "-2");
        assert_eq!(humanize(42.0, 2), "42");
    }

    #[test]
    fn humanize_negative_and_precision() {
        assert_eq!(humanize(-1500.0, 2), "-1.50 K");
        assert_eq!(humanize(-2_345_678.0, 2), "-2.35M");
        assert_eq!(humanize(1125.0, 2), "1.13 K");
        assert_eq!(humanize(12_345.0, 0), "12 K");
        assert_eq!(humanize(2_500_000.0, 0), "2.50M");
    }

    #[test]
    fn humanize_rounds_the_stored_quotient() {
        // 1005 / 1000 is stored just below 1.005
        assert_eq!(humanize(1005.0, 2), "1.00 K");
        assert_eq!(humanize(1015.0, 2), "1.01 K");
        assert_eq!(humanize(1200.0, 2), "1.20 K");
        assert_eq!(humanize(999_999_995.0, 2), "1000.00M");
    }

    #[test]
    fn to_fixed_matches_host_rounding() {
        assert_eq!(to_fixed(25.0, 2), "25.00");
        assert_eq!(to_fixed(12.5, 0), "13");
        assert_eq!(to_fixed(-12.5, 0), "-13");
        assert_eq!(to_fixed(33.333_333, 2), "33.33");
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(1.125, 2), "1.13");
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
    }

    #[test]
    fn compact_notation() {
        assert_eq!(compact(0.0), "0");
        assert_eq!(compact(7.0), "7");
        assert_eq!(compact(1.25), "1.3");
        assert_eq!(compact(999.0), "999");
        assert_eq!(compact(1234.0), "1.2K");
        assert_eq!(compact(12_345.0), "12K");
        assert_eq!(compact(123_456.0), "123K");
        assert_eq!(compact(999_999.0), "1M");
        assert_eq!(compact(1_500_000.0), "1.5M");
        assert_eq!(compact(2_000_000_000.0), "2B");
        assert_eq!(compact(-4_200.0), "-4.2K");
    }
}
