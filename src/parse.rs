use std::str::FromStr;

use crate::decimal::{Decimal, Rounding};
use crate::error::ParseError;
use crate::units::{self, SuffixKind};

/// Decimal-point and grouping conventions for the mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// point ".", group ","
    #[default]
    EnUs,
    /// point ",", group "."
    DeDe,
}

impl Locale {
    fn decimal_point(self) -> u8 {
        match self {
            Locale::EnUs => b'.',
            Locale::DeDe => b',',
        }
    }

    fn group_separator(self) -> u8 {
        match self {
            Locale::EnUs => b',',
            Locale::DeDe => b'.',
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts language tags by prefix, case-insensitive: "en", "en_US",
    /// "en-us", "de", "de_DE", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.to_ascii_lowercase();
        let lang = tag.split(['_', '-']).next().unwrap_or("");
        match lang {
            "en" => Ok(Locale::EnUs),
            "de" => Ok(Locale::DeDe),
            _ => Err(format!("unsupported locale {s:?} (expected en_* or de_*)")),
        }
    }
}

/// Options for `parse_size`. Defaults: strict, Nearest rounding, EnUs
/// locale, decimal resolution of ambiguous units, negatives rejected.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Resolve ambiguous suffixes (KB, K) as 1024-based.
    pub default_binary: bool,
    /// Compatibility flag; GNU letters are always accepted and their base
    /// already follows `default_binary`.
    pub default_gnu: bool,
    pub allow_thousands_separator: bool,
    pub rounding: Rounding,
    /// Unknown suffixes fail the parse when set (the default); otherwise
    /// they are ignored and the value is taken as bytes.
    pub strict: bool,
    pub locale: Locale,
    pub allow_negative: bool,
    /// Inclusive bounds on the result.
    pub min_value: Option<i128>,
    pub max_value: Option<i128>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            default_binary: false,
            default_gnu: false,
            allow_thousands_separator: false,
            rounding: Rounding::Nearest,
            strict: true,
            locale: Locale::EnUs,
            allow_negative: false,
            min_value: None,
            max_value: None,
        }
    }
}

/// Parse a human-readable size ("1.5 GiB", "2e3 KB", "1,000 B") into an
/// exact byte count.
///
/// The pipeline runs in fixed stages: trim, sign, mantissa (locale-aware,
/// kept as an exact digit string), unit suffix (case-insensitive, longest
/// match first), exact scaling, rounding, then the negative and bounds
/// checks. Values up to 1 YiB = 2^80 convert without precision loss;
/// Nearest rounds half away from zero.
pub fn parse_size(text: &str, opts: &ParseOptions) -> Result<i128, ParseError> {
    let input = text.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let bytes = input.as_bytes();
    let mut pos = 0usize;

    // leading sign; rejecting negatives is deferred until the rest of the
    // input is known to be well-formed
    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let number = scan_number(input, &mut pos, opts)?;

    // whatever remains is the unit token
    let suffix = input[pos..].trim();
    let kind = match units::classify_suffix(suffix) {
        Some(kind) => kind,
        None if opts.strict => {
            return Err(ParseError::UnknownUnit {
                unit: suffix.to_string(),
                input: input.to_string(),
            });
        }
        // permissive: ignore the suffix, the value is already bytes
        None => SuffixKind::Bytes,
    };
    let (power, base) = units::resolve_base(kind, opts.default_binary);

    let exp10 = number.exp10();
    let mut quantity = Decimal::from_parts(negative, number.digits, exp10);
    if base == units::BINARY_BASE && power > 0 {
        quantity.mul_u128(units::base_pow(base, power));
    } else {
        // powers of 1000 fold into the decimal exponent
        quantity.shift(3 * power as i32);
    }

    let magnitude = quantity
        .to_integer(opts.rounding)
        .ok_or_else(|| ParseError::Overflow(input.to_string()))?;
    // the signed range is asymmetric: 2^127 is only representable negated
    let limit = if negative {
        i128::MIN.unsigned_abs()
    } else {
        i128::MAX as u128
    };
    if magnitude > limit {
        return Err(ParseError::Overflow(input.to_string()));
    }
    let result = if negative {
        (magnitude as i128).wrapping_neg()
    } else {
        magnitude as i128
    };

    if result < 0 && !opts.allow_negative {
        return Err(ParseError::NegativeNotAllowed(input.to_string()));
    }
    if let Some(min) = opts.min_value {
        if result < min {
            return Err(ParseError::BelowMinimum { value: result, min });
        }
    }
    if let Some(max) = opts.max_value {
        if result > max {
            return Err(ParseError::AboveMaximum { value: result, max });
        }
    }
    Ok(result)
}

struct ScannedNumber {
    digits: Vec<u8>,
    frac_len: usize,
    exp: i64,
}

impl ScannedNumber {
    // effective power of ten; saturating, so an exponent pinned at the
    // i64 limit cannot wrap when the fraction length folds in
    fn exp10(&self) -> i32 {
        let e = self.exp.saturating_sub(self.frac_len as i64);
        e.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

// digits, optional decimal point, optional exponent; grouping per locale
// when enabled
fn scan_number(
    input: &str,
    pos: &mut usize,
    opts: &ParseOptions,
) -> Result<ScannedNumber, ParseError> {
    let bytes = input.as_bytes();
    let point = opts.locale.decimal_point();
    let group = opts.locale.group_separator();

    let mut digits: Vec<u8> = Vec::new();
    let mut frac_len = 0usize;
    let mut exp: i64 = 0;
    let mut any = false;

    // integer part; the locale's separator commits to exactly-three-digit
    // groups, a space only groups when the lookahead confirms one
    loop {
        match bytes.get(*pos).copied() {
            Some(c) if c.is_ascii_digit() => {
                digits.push(c - b'0');
                any = true;
                *pos += 1;
            }
            Some(c) if c == group && opts.allow_thousands_separator && any => {
                *pos += 1;
                if !take_group(bytes, pos, &mut digits) {
                    return Err(ParseError::InvalidNumber(input.to_string()));
                }
            }
            Some(b' ')
                if opts.allow_thousands_separator && any && spaced_group_ahead(bytes, *pos) =>
            {
                *pos += 1;
                if !take_group(bytes, pos, &mut digits) {
                    return Err(ParseError::InvalidNumber(input.to_string()));
                }
            }
            _ => break,
        }
    }

    // fraction
    if bytes.get(*pos).copied() == Some(point) {
        *pos += 1;
        while let Some(&c) = bytes.get(*pos) {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c - b'0');
            frac_len += 1;
            any = true;
            *pos += 1;
        }
    }

    // exponent marker, consumed only when a digit follows; "1E" stays an
    // exabyte while "1e3" is scientific notation
    if any && matches!(bytes.get(*pos).copied(), Some(b'e' | b'E')) {
        let mut look = *pos + 1;
        let exp_negative = match bytes.get(look).copied() {
            Some(b'-') => {
                look += 1;
                true
            }
            Some(b'+') => {
                look += 1;
                false
            }
            _ => false,
        };
        if bytes.get(look).copied().is_some_and(|c| c.is_ascii_digit()) {
            *pos = look;
            let mut value: i64 = 0;
            while let Some(&c) = bytes.get(*pos) {
                if !c.is_ascii_digit() {
                    break;
                }
                value = value.saturating_mul(10).saturating_add(i64::from(c - b'0'));
                *pos += 1;
            }
            exp = if exp_negative { -value } else { value };
        }
    }

    if !any {
        return Err(ParseError::InvalidNumber(input.to_string()));
    }
    Ok(ScannedNumber {
        digits,
        frac_len,
        exp,
    })
}

// exactly three digits, not followed by a fourth
fn take_group(bytes: &[u8], pos: &mut usize, digits: &mut Vec<u8>) -> bool {
    let group: [u8; 3] = match bytes.get(*pos..*pos + 3) {
        Some(&[a, b, c]) if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            [a, b, c]
        }
        _ => return false,
    };
    if bytes.get(*pos + 3).copied().is_some_and(|d| d.is_ascii_digit()) {
        return false;
    }
    for d in group {
        digits.push(d - b'0');
    }
    *pos += 3;
    true
}

// a space separates a thousands group only when exactly three digits
// follow it; otherwise it just ends the number
fn spaced_group_ahead(bytes: &[u8], pos: usize) -> bool {
    match bytes.get(pos + 1..pos + 4) {
        Some(&[a, b, c]) if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            !bytes.get(pos + 4).copied().is_some_and(|d| d.is_ascii_digit())
        }
        _ => false,
    }
}
