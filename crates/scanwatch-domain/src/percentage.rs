//! Percentage module - exact two-decimal percentages

use std::fmt;

/// A percentage with exactly two decimals, rounded half-up
///
/// Stored as an integer number of hundredths of a percent, so `25.00%` is
/// `2500`. Rounding is done on exact integer or decimal-string arithmetic,
/// never on binary floating point, so `12.345` always becomes `12.35`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(i64);

impl Percentage {
    /// Zero percent
    pub const ZERO: Percentage = Percentage(0);

    /// `100 * portion / total`, rounded half-up to two decimals
    ///
    /// A total of zero yields zero rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use scanwatch_domain::Percentage;
    ///
    /// assert_eq!(Percentage::of(1, 4).to_string(), "25.00");
    /// assert_eq!(Percentage::of(0, 0).to_string(), "0.00");
    /// assert_eq!(Percentage::of(1, 3).to_string(), "33.33");
    /// assert_eq!(Percentage::of(2, 3).to_string(), "66.67");
    /// ```
    pub fn of(portion: u64, total: u64) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        // hundredths = round_half_up(10_000 * portion / total)
        let numerator = 20_000u128 * portion as u128 + total as u128;
        let hundredths = numerator / (2 * total as u128);
        Self(i64::try_from(hundredths).unwrap_or(i64::MAX))
    }

    /// `100 * ratio`, rounded half-up to two decimals
    ///
    /// The ratio is taken at its shortest decimal representation, so `0.12345`
    /// is treated as exactly `0.12345`. Non-finite ratios yield zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use scanwatch_domain::Percentage;
    ///
    /// assert_eq!(Percentage::from_ratio(0.6).to_string(), "60.00");
    /// assert_eq!(Percentage::from_ratio(0.12345).to_string(), "12.35");
    /// ```
    pub fn from_ratio(ratio: f64) -> Self {
        if !ratio.is_finite() {
            return Self::ZERO;
        }

        // f64 Display never uses exponent notation and prints the shortest
        // representation that round-trips.
        let repr = format!("{}", ratio.abs());
        let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
        let Ok(whole) = int_part.parse::<i64>() else {
            return Self::ZERO;
        };

        // Four fractional digits of the ratio are the hundredths of a percent;
        // the fifth decides the rounding.
        let mut digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let mut hundredths = whole.saturating_mul(10_000);
        for scale in [1_000, 100, 10, 1] {
            hundredths = hundredths.saturating_add(digits.next().unwrap_or(0) * scale);
        }
        if digits.next().unwrap_or(0) >= 5 {
            hundredths = hundredths.saturating_add(1);
        }

        if ratio.is_sign_negative() {
            Self(-hundredths)
        } else {
            Self(hundredths)
        }
    }

    /// Raw value in hundredths of a percent
    pub fn hundredths(&self) -> i64 {
        self.0
    }

    /// Value as a float, for display or sorting
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
