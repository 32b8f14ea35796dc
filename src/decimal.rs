use std::cmp::Ordering;
use std::str::FromStr;

/// How to collapse a fractional byte quantity to an integer.
///
/// Nearest rounds half away from zero (1.5 becomes 2, -1.5 becomes -2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    Floor,
    #[default]
    Nearest,
    Ceil,
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "floor" => Ok(Rounding::Floor),
            "nearest" => Ok(Rounding::Nearest),
            "ceil" => Ok(Rounding::Ceil),
            _ => Err(format!(
                "unknown rounding {s:?} (expected floor, nearest or ceil)"
            )),
        }
    }
}

/// An exact decimal quantity: `digits` x 10^`exp`, negative when `neg`.
///
/// Digits are stored most significant first, one value 0..=9 per entry.
/// Everything below works on the digit string directly; no value is ever
/// routed through a binary float.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    neg: bool,
    digits: Vec<u8>,
    exp: i32,
}

impl Decimal {
    pub fn from_parts(neg: bool, digits: Vec<u8>, exp: i32) -> Self {
        Decimal { neg, digits, exp }
    }

    pub fn from_i128(v: i128) -> Self {
        let digits = v
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        Decimal {
            neg: v < 0,
            digits,
            exp: 0,
        }
    }

    /// Exact decimal form of a finite float, read off its shortest
    /// round-trip representation (so 1.5 is 15 x 10^-1, not the nearest
    /// binary fraction). None for NaN and infinities.
    pub fn from_f64(v: f64) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        let neg = v.is_sign_negative();
        if v == 0.0 {
            return Some(Decimal {
                neg,
                digits: vec![0],
                exp: 0,
            });
        }

        // one leading digit, optional fraction, then "e" and the exponent
        let repr = format!("{:e}", v.abs());
        let (mantissa, exp) = repr.split_once('e')?;
        let exp: i32 = exp.parse().ok()?;
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let digits = int_part
            .bytes()
            .chain(frac_part.bytes())
            .map(|b| b - b'0')
            .collect();
        Some(Decimal {
            neg,
            digits,
            exp: exp - frac_part.len() as i32,
        })
    }

    pub fn is_negative(&self) -> bool {
        self.neg
    }

    /// Compare the magnitude (sign ignored) against a threshold >= 1.
    pub fn cmp_magnitude(&self, threshold: u128) -> Ordering {
        let Some(first) = self.digits.iter().position(|&d| d != 0) else {
            return Ordering::Less;
        };
        let digits = &self.digits[first..];

        // digit count in front of the decimal point decides all but ties
        let int_len = digits.len() as i64 + i64::from(self.exp);
        let t = threshold.to_string();
        let t_len = t.len() as i64;
        if int_len != t_len {
            return if int_len < t_len {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        for (i, tb) in t.bytes().enumerate() {
            let d = digits.get(i).copied().unwrap_or(0);
            let td = tb - b'0';
            if d != td {
                return if d < td {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
        }
        if digits.iter().skip(t.len()).any(|&d| d != 0) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Multiply the digit string by `m` in place. Callers pass multipliers
    /// up to 1024^8 = 2^80, so the per-digit product 9*m + carry fits u128.
    pub fn mul_u128(&mut self, m: u128) {
        let mut carry: u128 = 0;
        for d in self.digits.iter_mut().rev() {
            let t = u128::from(*d) * m + carry;
            *d = (t % 10) as u8;
            carry = t / 10;
        }
        while carry > 0 {
            self.digits.insert(0, (carry % 10) as u8);
            carry /= 10;
        }
    }

    /// Multiply by 10^delta.
    pub fn shift(&mut self, delta: i32) {
        self.exp = self.exp.saturating_add(delta);
    }

    /// Collapse to an integer magnitude per the rounding mode. Floor and
    /// ceil are sign-aware: the magnitude of floor(-0.4) is 1 here and the
    /// caller applies the sign. None when the result does not fit in u128.
    pub fn to_integer(&self, rounding: Rounding) -> Option<u128> {
        if self.exp >= 0 {
            let mut acc: u128 = 0;
            for &d in &self.digits {
                acc = acc.checked_mul(10)?.checked_add(u128::from(d))?;
            }
            if acc == 0 {
                return Some(0);
            }
            for _ in 0..self.exp {
                acc = acc.checked_mul(10)?;
            }
            return Some(acc);
        }

        let k = self.exp.unsigned_abs() as usize;
        let int_len = self.digits.len().saturating_sub(k);
        let mut acc: u128 = 0;
        for &d in &self.digits[..int_len] {
            acc = acc.checked_mul(10)?.checked_add(u128::from(d))?;
        }

        let first_frac = if k > self.digits.len() {
            0
        } else {
            self.digits.get(int_len).copied().unwrap_or(0)
        };
        let frac_nonzero = self.digits[int_len..].iter().any(|&d| d != 0);
        let round_up = match rounding {
            Rounding::Floor => self.neg && frac_nonzero,
            Rounding::Ceil => !self.neg && frac_nonzero,
            Rounding::Nearest => first_frac >= 5,
        };
        if round_up {
            acc = acc.checked_add(1)?;
        }
        Some(acc)
    }

    /// Magnitude divided by `divisor`, rendered with `precision` fraction
    /// digits and rounded half away from zero on the first dropped digit.
    /// Divisors never exceed 2^80, so remainder * 10 + 9 fits u128.
    pub fn div_round(&self, divisor: u128, precision: usize) -> String {
        let (int_digits, frac_digits) = self.fixed_point();

        let mut acc: u128 = 0;
        let mut q_int: Vec<u8> = Vec::with_capacity(int_digits.len());
        for &d in &int_digits {
            acc = acc * 10 + u128::from(d);
            q_int.push((acc / divisor) as u8);
            acc %= divisor;
        }

        // one digit past the requested precision decides the rounding
        let mut q_frac: Vec<u8> = Vec::with_capacity(precision + 1);
        for i in 0..=precision {
            let d = frac_digits.get(i).copied().unwrap_or(0);
            acc = acc * 10 + u128::from(d);
            q_frac.push((acc / divisor) as u8);
            acc %= divisor;
        }
        if q_frac.pop().is_some_and(|d| d >= 5) {
            increment(&mut q_int, &mut q_frac);
        }

        let lead = q_int
            .iter()
            .position(|&d| d != 0)
            .unwrap_or(q_int.len());
        let int_str: String = if lead == q_int.len() {
            "0".to_string()
        } else {
            q_int[lead..].iter().map(|&d| char::from(b'0' + d)).collect()
        };

        if precision == 0 {
            int_str
        } else {
            let frac_str: String = q_frac.iter().map(|&d| char::from(b'0' + d)).collect();
            format!("{int_str}.{frac_str}")
        }
    }

    // digit streams before and after the decimal point
    fn fixed_point(&self) -> (Vec<u8>, Vec<u8>) {
        if self.exp >= 0 {
            let mut int = self.digits.clone();
            int.resize(int.len() + self.exp as usize, 0);
            (int, Vec::new())
        } else {
            let k = self.exp.unsigned_abs() as usize;
            if k >= self.digits.len() {
                let mut frac = vec![0u8; k - self.digits.len()];
                frac.extend_from_slice(&self.digits);
                (Vec::new(), frac)
            } else {
                let split = self.digits.len() - k;
                (self.digits[..split].to_vec(), self.digits[split..].to_vec())
            }
        }
    }
}

// add one ulp to the concatenated int+frac digit string
fn increment(int_part: &mut Vec<u8>, frac_part: &mut [u8]) {
    for d in frac_part.iter_mut().rev() {
        if *d < 9 {
            *d += 1;
            return;
        }
        *d = 0;
    }
    for d in int_part.iter_mut().rev() {
        if *d < 9 {
            *d += 1;
            return;
        }
        *d = 0;
    }
    int_part.insert(0, 1);
}
