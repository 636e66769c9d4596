//! Length values and unit conversion.
//!
//! Presentation geometry is stored in EMUs (English Metric Units), the
//! integer unit of Office Open XML: 914,400 per inch, 360,000 per
//! centimeter, 12,700 per point. [`Length`] wraps an EMU count and converts
//! to and from the human units.

use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_CENTIPOINT: i64 = 127;

/// Units a [`Length`] can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// English Metric Unit, the storage unit
    Emu,
    Inch,
    Centimeter,
    Millimeter,
    /// Point (1/72 inch)
    Point,
    /// Hundredth of a point, used for font sizes
    Centipoint,
}

impl LengthUnit {
    /// The unit suffix, e.g. `in`.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emu => "emu",
            Self::Inch => "in",
            Self::Centimeter => "cm",
            Self::Millimeter => "mm",
            Self::Point => "pt",
            Self::Centipoint => "centipt",
        }
    }

    /// How many EMUs make one of this unit.
    #[inline]
    pub const fn emus_per_unit(&self) -> i64 {
        match self {
            Self::Emu => 1,
            Self::Inch => EMUS_PER_INCH,
            Self::Centimeter => EMUS_PER_CM,
            Self::Millimeter => EMUS_PER_MM,
            Self::Point => EMUS_PER_PT,
            Self::Centipoint => EMUS_PER_CENTIPOINT,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "emu" | "emus" => Ok(Self::Emu),
            "in" | "inch" | "inches" | "\"" => Ok(Self::Inch),
            "cm" => Ok(Self::Centimeter),
            "mm" => Ok(Self::Millimeter),
            "pt" => Ok(Self::Point),
            "centipt" => Ok(Self::Centipoint),
            other => Err(Error::ParseError(format!("Unknown length unit '{}'", other))),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A length stored as a whole number of EMUs.
///
/// Values are kept exactly as given: zero and negative lengths are
/// representable, and nothing is clamped.
///
/// # Examples
///
/// ```rust
/// use slidedeck::common::Length;
///
/// let width = Length::from_inches(10.0);
/// assert_eq!(width.emu(), 9_144_000);
/// assert_eq!(width, Length::from_cm(25.4));
///
/// let height: Length = "7.5in".parse().unwrap();
/// assert_eq!(height.emu(), 6_858_000);
/// ```
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Length(i64);

impl Length {
    pub const ZERO: Length = Length(0);

    #[inline]
    pub const fn from_emu(emu: i64) -> Self {
        Self(emu)
    }

    /// Fractional inches, rounded to the nearest EMU.
    #[inline]
    pub fn from_inches(inches: f64) -> Self {
        Self::from_f64(inches, LengthUnit::Inch)
    }

    #[inline]
    pub fn from_cm(cm: f64) -> Self {
        Self::from_f64(cm, LengthUnit::Centimeter)
    }

    #[inline]
    pub fn from_mm(mm: f64) -> Self {
        Self::from_f64(mm, LengthUnit::Millimeter)
    }

    #[inline]
    pub fn from_pt(pt: f64) -> Self {
        Self::from_f64(pt, LengthUnit::Point)
    }

    #[inline]
    pub const fn from_centipoints(centipoints: i64) -> Self {
        Self(centipoints.saturating_mul(EMUS_PER_CENTIPOINT))
    }

    /// `value` in `unit`, rounded to the nearest EMU.
    pub fn from_f64(value: f64, unit: LengthUnit) -> Self {
        Self((value * unit.emus_per_unit() as f64).round() as i64)
    }

    #[inline]
    pub const fn emu(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn inches(&self) -> f64 {
        self.to_f64(LengthUnit::Inch)
    }

    #[inline]
    pub fn cm(&self) -> f64 {
        self.to_f64(LengthUnit::Centimeter)
    }

    #[inline]
    pub fn mm(&self) -> f64 {
        self.to_f64(LengthUnit::Millimeter)
    }

    #[inline]
    pub fn pt(&self) -> f64 {
        self.to_f64(LengthUnit::Point)
    }

    /// Whole centipoints, truncated toward zero.
    #[inline]
    pub const fn centipoints(&self) -> i64 {
        self.0 / EMUS_PER_CENTIPOINT
    }

    #[inline]
    pub fn to_f64(&self, unit: LengthUnit) -> f64 {
        self.0 as f64 / unit.emus_per_unit() as f64
    }
}

impl From<i64> for Length {
    #[inline]
    fn from(emu: i64) -> Self {
        Self(emu)
    }
}

impl From<Length> for i64 {
    #[inline]
    fn from(length: Length) -> Self {
        length.0
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Length;

    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse a number with an optional unit suffix. A bare number is a
    /// count of EMUs.
    ///
    /// ```rust
    /// use slidedeck::common::Length;
    ///
    /// assert_eq!("9144000".parse::<Length>().unwrap().emu(), 9_144_000);
    /// assert_eq!("72pt".parse::<Length>().unwrap().emu(), 914_400);
    /// assert_eq!("2.54 cm".parse::<Length>().unwrap().emu(), 914_400);
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
            .map_or(s.len(), |(i, _)| i);
        let (number, suffix) = s.split_at(split);

        if number.is_empty() || number == "-" || number == "+" {
            return Err(Error::ParseError(format!("No numeric value in '{}'", s)));
        }

        let unit: LengthUnit = suffix.parse()?;
        if unit == LengthUnit::Emu && !number.contains('.') {
            // Exact integer path; f64 would lose precision past 2^53.
            return number
                .parse::<i64>()
                .map(Length)
                .map_err(|_| Error::ParseError(format!("Invalid EMU count '{}'", s)));
        }

        let value: f64 = number
            .parse()
            .map_err(|_| Error::ParseError(format!("Invalid number in '{}'", s)))?;
        Ok(Self::from_f64(value, unit))
    }
}

impl fmt::Display for Length {
    /// Writes the EMU count with its suffix, e.g. `9144000emu`, which parses
    /// back to the same value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}emu", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Length::from_inches(1.0).emu(), EMUS_PER_INCH);
        assert_eq!(Length::from_cm(1.0).emu(), EMUS_PER_CM);
        assert_eq!(Length::from_mm(1.0).emu(), EMUS_PER_MM);
        assert_eq!(Length::from_pt(1.0).emu(), EMUS_PER_PT);
        assert_eq!(Length::from_centipoints(1800).emu(), 228_600);
        assert_eq!(Length::from_inches(10.0), Length::from_emu(9_144_000));
        assert_eq!(Length::from_inches(7.5), Length::from_emu(6_858_000));
    }

    #[test]
    fn test_accessors() {
        let len = Length::from_emu(914_400);
        assert_eq!(len.inches(), 1.0);
        assert!((len.cm() - 2.54).abs() < 1e-9);
        assert!((len.mm() - 25.4).abs() < 1e-9);
        assert_eq!(len.pt(), 72.0);
        assert_eq!(len.centipoints(), 7200);
    }

    #[test]
    fn test_zero_and_negative_are_kept() {
        assert_eq!(Length::from_emu(0), Length::ZERO);
        assert_eq!(Length::from_emu(-5).emu(), -5);
        assert_eq!(-Length::from_inches(1.0), Length::from_inches(-1.0));
        assert!(Length::from_emu(-1) < Length::ZERO);
    }

    #[test]
    fn test_parse() {
        assert_eq!("10in".parse::<Length>().unwrap(), Length::from_inches(10.0));
        assert_eq!("  7.5 in ".parse::<Length>().unwrap(), Length::from_inches(7.5));
        assert_eq!("25.4mm".parse::<Length>().unwrap(), Length::from_inches(1.0));
        assert_eq!("-12700".parse::<Length>().unwrap(), Length::from_emu(-12_700));
        assert_eq!("1800centipt".parse::<Length>().unwrap(), Length::from_pt(18.0));
        assert_eq!("9223372036854775807".parse::<Length>().unwrap().emu(), i64::MAX);

        assert!(matches!("".parse::<Length>(), Err(Error::ParseError(_))));
        assert!(matches!("cm".parse::<Length>(), Err(Error::ParseError(_))));
        assert!(matches!("3furlongs".parse::<Length>(), Err(Error::ParseError(_))));
        assert!("1.2.3in".parse::<Length>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Length::from_inches(1.0);
        let b = Length::from_cm(1.0);
        assert_eq!((a + b).emu(), 1_274_400);
        assert_eq!((a - b).emu(), 554_400);
    }

    #[test]
    fn test_serde_is_transparent() {
        let len = Length::from_emu(8_000_000);
        assert_eq!(i64::from(len), 8_000_000);
        let de: Length = serde::de::Deserialize::deserialize(
            serde::de::value::I64Deserializer::<serde::de::value::Error>::new(8_000_000),
        )
        .unwrap();
        assert_eq!(de, len);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_display_parses_back(emu in any::<i64>()) {
            let len = Length::from_emu(emu);
            prop_assert_eq!(len.to_string().parse::<Length>().unwrap(), len);
        }

        #[test]
        fn prop_whole_inches_are_exact(inches in -1_000i64..1_000i64) {
            let len = Length::from_inches(inches as f64);
            prop_assert_eq!(len.emu(), inches * EMUS_PER_INCH);
            prop_assert_eq!(len.inches(), inches as f64);
        }
    }
}
