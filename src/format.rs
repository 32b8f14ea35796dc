use std::cmp::Ordering;
use std::str::FromStr;

use crate::decimal::Decimal;
use crate::error::FormatError;
use crate::units::{self, Scheme};

/// Precision spec for the scaled magnitude, printf style: "%f" or "%.Nf".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    precision: u8,
}

impl NumberFormat {
    pub fn with_precision(precision: u8) -> Self {
        NumberFormat { precision }
    }

    pub fn precision(self) -> usize {
        usize::from(self.precision)
    }
}

impl Default for NumberFormat {
    /// One fractional digit, as in "1.5 kB".
    fn default() -> Self {
        NumberFormat { precision: 1 }
    }
}

impl FromStr for NumberFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || format!("unsupported number format {s:?} (expected %f or %.Nf)");
        let spec = s
            .strip_prefix('%')
            .and_then(|rest| rest.strip_suffix('f'))
            .ok_or_else(err)?;
        if spec.is_empty() {
            // printf's default precision
            return Ok(NumberFormat { precision: 6 });
        }
        let digits = spec.strip_prefix('.').ok_or_else(err)?;
        if digits.is_empty() {
            return Ok(NumberFormat { precision: 0 });
        }
        let precision = digits.parse::<u8>().map_err(|_| err())?;
        Ok(NumberFormat { precision })
    }
}

/// Value accepted by `format_size`: any primitive integer, a float, or a
/// numeric string (via `FromStr`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeInput {
    Int(i128),
    Float(f64),
}

macro_rules! size_input_from_int {
    ($($t:ty),* $(,)?) => {
        $(impl From<$t> for SizeInput {
            fn from(v: $t) -> Self {
                SizeInput::Int(v as i128)
            }
        })*
    };
}

size_input_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, i128, isize);

impl From<f64> for SizeInput {
    fn from(v: f64) -> Self {
        SizeInput::Float(v)
    }
}

impl From<f32> for SizeInput {
    fn from(v: f32) -> Self {
        SizeInput::Float(f64::from(v))
    }
}

impl FromStr for SizeInput {
    type Err = FormatError;

    /// Integer strings keep full precision; anything else goes through
    /// f64 ("1.5", "2e6"). Non-numeric text fails with `InvalidValue`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(v) = t.parse::<i128>() {
            return Ok(SizeInput::Int(v));
        }
        match t.parse::<f64>() {
            Ok(v) => Ok(SizeInput::Float(v)),
            Err(_) => Err(FormatError::InvalidValue(s.to_string())),
        }
    }
}

/// Options for `format_size`. `binary` selects the 1024 base, `gnu` the
/// single-letter suffix with no separating space; the two are independent.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub binary: bool,
    pub gnu: bool,
    pub format: NumberFormat,
    pub strip_trailing_zeros: bool,
}

/// Render a byte count as a human-readable size.
///
/// The value is scaled to the largest tier it reaches, with exact decimal
/// arithmetic all the way to the rendered digits (rounded half away from
/// zero at the requested precision). Total over finite inputs; only
/// NaN/infinite floats and non-numeric strings fail.
pub fn format_size(value: impl Into<SizeInput>, opts: &FormatOptions) -> Result<String, FormatError> {
    let dec = match value.into() {
        SizeInput::Int(v) => Decimal::from_i128(v),
        SizeInput::Float(v) => {
            Decimal::from_f64(v).ok_or_else(|| FormatError::InvalidValue(v.to_string()))?
        }
    };

    let base = if opts.binary {
        units::BINARY_BASE
    } else {
        units::DECIMAL_BASE
    };
    let scheme = if opts.gnu {
        Scheme::Gnu
    } else if opts.binary {
        Scheme::Binary
    } else {
        Scheme::Decimal
    };

    // largest tier whose threshold the magnitude reaches; values below
    // 1 B still land on the bottom tier
    let tier = units::TIERS
        .iter()
        .rev()
        .find(|t| dec.cmp_magnitude(units::base_pow(base, t.power)) != Ordering::Less)
        .unwrap_or(&units::TIERS[0]);

    let mut magnitude = dec.div_round(units::base_pow(base, tier.power), opts.format.precision());

    if opts.strip_trailing_zeros && magnitude.contains('.') {
        magnitude = magnitude
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }

    // a magnitude that rounded to plain zero never takes a sign
    let negative = dec.is_negative() && magnitude.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };
    let sep = if opts.gnu { "" } else { " " };

    Ok(format!("{sign}{magnitude}{sep}{}", tier.suffix(scheme)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: impl Into<SizeInput>, opts: &FormatOptions) -> String {
        format_size(value, opts).unwrap()
    }

    #[test]
    fn decimal_defaults() {
        let opts = FormatOptions::default();
        let cases: [(i64, &str); 12] = [
            (0, "0.0 B"),
            (1, "1.0 B"),
            (999, "999.0 B"),
            (1000, "1.0 kB"),
            (1024, "1.0 kB"),
            (999999, "1000.0 kB"),
            (1000000, "1.0 MB"),
            (1234567, "1.2 MB"),
            (1000000000, "1.0 GB"),
            (1000000000000, "1.0 TB"),
            (1500000000000000, "1.5 PB"),
            (1000000000000000000, "1.0 EB"),
        ];
        for (value, want) in cases {
            assert_eq!(fmt(value, &opts), want, "{value}");
        }
    }

    #[test]
    fn binary_units() {
        let opts = FormatOptions {
            binary: true,
            ..Default::default()
        };
        let cases: [(i64, &str); 6] = [
            (1023, "1023.0 B"),
            (1024, "1.0 KiB"),
            (1536, "1.5 KiB"),
            (1048576, "1.0 MiB"),
            (1073741824, "1.0 GiB"),
            (1099511627776, "1.0 TiB"),
        ];
        for (value, want) in cases {
            assert_eq!(fmt(value, &opts), want, "{value}");
        }
    }

    #[test]
    fn gnu_style_has_no_space() {
        let gnu = FormatOptions {
            gnu: true,
            ..Default::default()
        };
        assert_eq!(fmt(1000, &gnu), "1.0K");
        assert_eq!(fmt(1, &gnu), "1.0B");
        assert_eq!(fmt(1000000, &gnu), "1.0M");
        assert_eq!(fmt(-1500, &gnu), "-1.5K");

        // gnu picks the suffix, binary still picks the base
        let gnu_binary = FormatOptions {
            gnu: true,
            binary: true,
            ..Default::default()
        };
        assert_eq!(fmt(1048576, &gnu_binary), "1.0M");
        assert_eq!(fmt(1536, &gnu_binary), "1.5K");
    }

    #[test]
    fn custom_precision() {
        let p0 = FormatOptions {
            format: NumberFormat::with_precision(0),
            ..Default::default()
        };
        assert_eq!(fmt(1500, &p0), "2 kB");
        assert_eq!(fmt(1400, &p0), "1 kB");

        let p2 = FormatOptions {
            format: NumberFormat::with_precision(2),
            ..Default::default()
        };
        assert_eq!(fmt(1500, &p2), "1.50 kB");
        assert_eq!(fmt(1234567, &p2), "1.23 MB");

        let p6 = FormatOptions {
            format: "%f".parse().unwrap(),
            ..Default::default()
        };
        assert_eq!(fmt(1500, &p6), "1.500000 kB");
    }

    #[test]
    fn strip_trailing_zeros() {
        let opts = FormatOptions {
            strip_trailing_zeros: true,
            ..Default::default()
        };
        assert_eq!(fmt(1000, &opts), "1 kB");
        assert_eq!(fmt(1200000, &opts), "1.2 MB");
        assert_eq!(fmt(0, &opts), "0 B");

        let p2 = FormatOptions {
            strip_trailing_zeros: true,
            format: NumberFormat::with_precision(2),
            ..Default::default()
        };
        assert_eq!(fmt(1200, &p2), "1.2 kB");
        assert_eq!(fmt(1250, &p2), "1.25 kB");
    }

    #[test]
    fn negative_values() {
        let opts = FormatOptions::default();
        assert_eq!(fmt(-1000, &opts), "-1.0 kB");
        assert_eq!(fmt(-1, &opts), "-1.0 B");
        assert_eq!(fmt(-1500000, &opts), "-1.5 MB");
    }

    #[test]
    fn zero_never_takes_a_sign() {
        let opts = FormatOptions::default();
        assert_eq!(fmt(-0.0f64, &opts), "0.0 B");
        assert_eq!(fmt(-0.04f64, &opts), "0.0 B");
        assert_eq!(fmt(-0.4f64, &opts), "-0.4 B");

        let strip = FormatOptions {
            strip_trailing_zeros: true,
            ..Default::default()
        };
        assert_eq!(fmt(-0.0f64, &strip), "0 B");
    }

    #[test]
    fn float_and_string_inputs() {
        let opts = FormatOptions::default();
        assert_eq!(fmt(1.5e3f64, &opts), "1.5 kB");
        assert_eq!(fmt(0.5f64, &opts), "0.5 B");
        assert_eq!(fmt("1000".parse::<SizeInput>().unwrap(), &opts), "1.0 kB");
        assert_eq!(fmt("1.5e3".parse::<SizeInput>().unwrap(), &opts), "1.5 kB");

        assert_eq!(
            "abc".parse::<SizeInput>(),
            Err(FormatError::InvalidValue("abc".to_string()))
        );
        let nan: SizeInput = "NaN".parse().unwrap();
        assert_eq!(
            format_size(nan, &opts),
            Err(FormatError::InvalidValue("NaN".to_string()))
        );
        assert_eq!(
            format_size(f64::INFINITY, &opts),
            Err(FormatError::InvalidValue("inf".to_string()))
        );
    }

    #[test]
    fn caps_at_the_largest_tier() {
        let opts = FormatOptions::default();
        assert_eq!(fmt(10i128.pow(24), &opts), "1.0 YB");
        assert_eq!(fmt(10i128.pow(27), &opts), "1000.0 YB");
        assert_eq!(fmt(1i128 << 70, &opts), "1.2 ZB");

        let binary = FormatOptions {
            binary: true,
            ..Default::default()
        };
        assert_eq!(fmt(1i128 << 70, &binary), "1.0 ZiB");
        assert_eq!(fmt(1i128 << 80, &binary), "1.0 YiB");
        assert_eq!(fmt(1i128 << 90, &binary), "1024.0 YiB");

        // total over the whole f64 range
        assert!(fmt(f64::MAX, &opts).ends_with(" YB"));
    }

    #[test]
    fn number_format_parsing() {
        assert_eq!("%.2f".parse::<NumberFormat>().unwrap().precision(), 2);
        assert_eq!("%.0f".parse::<NumberFormat>().unwrap().precision(), 0);
        assert_eq!("%.f".parse::<NumberFormat>().unwrap().precision(), 0);
        assert_eq!("%f".parse::<NumberFormat>().unwrap().precision(), 6);
        assert_eq!("%.12f".parse::<NumberFormat>().unwrap().precision(), 12);
        assert!("%d".parse::<NumberFormat>().is_err());
        assert!("%.xf".parse::<NumberFormat>().is_err());
        assert!("%.300f".parse::<NumberFormat>().is_err());
        assert!("".parse::<NumberFormat>().is_err());
    }

    #[test]
    fn deterministic_output() {
        let opts = FormatOptions::default();
        assert_eq!(fmt(123456789, &opts), fmt(123456789, &opts));
    }
}
