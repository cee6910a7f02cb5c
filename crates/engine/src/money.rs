use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::EngineError;

/// Monetary amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (budgets, costs,
/// aggregates) to avoid floating-point drift. Sums are exact.
///
/// On the wire a `Money` is a decimal string with two fraction digits.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(35_50);
/// assert_eq!(amount.minor(), 3550);
/// assert_eq!(amount.to_string(), "35.50");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("25,5".parse::<Money>().unwrap().minor(), 2550);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

/// Upper bound accepted for a single amount (`9_999_999_999.99`).
pub(crate) const MAX_AMOUNT: Money = Money(999_999_999_999);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Lenient parsing for informal input.
    ///
    /// Missing, unparseable, negative and out of range (above
    /// `9_999_999_999.99`) values all become [`Money::ZERO`]; more than two
    /// fraction digits are rounded half-up. Never fails.
    #[must_use]
    pub fn lenient(raw: Option<&str>) -> Money {
        let Some(raw) = raw else {
            return Money::ZERO;
        };
        match parse_minor(raw, true) {
            Ok(value) if (0..=MAX_AMOUNT.0).contains(&value) => Money(value),
            _ => Money::ZERO,
        }
    }

    /// Like [`Money::lenient`], but a parseable negative value is kept so the
    /// caller can reject it.
    pub(crate) fn lenient_signed(raw: Option<&str>) -> Money {
        raw.and_then(|raw| parse_minor(raw, true).ok())
            .map(Money)
            .unwrap_or(Money::ZERO)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_minor(s, false).map(Money)
    }
}

fn parse_minor(s: &str, round_extra: bool) -> Result<i64, EngineError> {
    let empty = || EngineError::InvalidAmount("empty amount".to_string());
    let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().replace(',', ".");
    if rest.is_empty() {
        return Err(empty());
    }

    let mut parts = rest.split('.');
    let units_str = parts.next().ok_or_else(invalid)?;
    let frac_str = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(invalid());
    }

    // ".5" is accepted the same way "0.5" is.
    let units_str = if units_str.is_empty() && !frac_str.is_empty() {
        "0"
    } else {
        units_str
    };
    if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let units: i64 = units_str.parse().map_err(|_| overflow())?;

    let cents: i64 = match frac_str.len() {
        0 => 0,
        1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
        2 => frac_str.parse::<i64>().map_err(|_| invalid())?,
        _ if round_extra => {
            let kept: i64 = frac_str[..2].parse().map_err(|_| invalid())?;
            let next = frac_str.as_bytes()[2] - b'0';
            kept + i64::from(next >= 5)
        }
        _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
    };

    let total = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(overflow)?;

    if negative {
        total.checked_neg().ok_or_else(overflow)
    } else {
        Ok(total)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Int(i64),
            Float(f64),
        }

        let text = match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text,
            Repr::Int(units) => units.to_string(),
            Repr::Float(value) => format!("{value:.2}"),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}
