/// One magnitude step of the size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitTier {
    /// Exponent applied to the base (1000 or 1024).
    pub power: u32,
    pub decimal: &'static str,
    pub binary: &'static str,
    pub gnu: &'static str,
}

pub const DECIMAL_BASE: u64 = 1000;
pub const BINARY_BASE: u64 = 1024;

/// Tiers in ascending magnitude order; `TIERS[p].power == p`.
pub const TIERS: [UnitTier; 9] = [
    UnitTier { power: 0, decimal: "B", binary: "B", gnu: "B" },
    UnitTier { power: 1, decimal: "kB", binary: "KiB", gnu: "K" },
    UnitTier { power: 2, decimal: "MB", binary: "MiB", gnu: "M" },
    UnitTier { power: 3, decimal: "GB", binary: "GiB", gnu: "G" },
    UnitTier { power: 4, decimal: "TB", binary: "TiB", gnu: "T" },
    UnitTier { power: 5, decimal: "PB", binary: "PiB", gnu: "P" },
    UnitTier { power: 6, decimal: "EB", binary: "EiB", gnu: "E" },
    UnitTier { power: 7, decimal: "ZB", binary: "ZiB", gnu: "Z" },
    UnitTier { power: 8, decimal: "YB", binary: "YiB", gnu: "Y" },
];

/// Which suffix column to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Decimal,
    Binary,
    Gnu,
}

impl UnitTier {
    pub fn suffix(&self, scheme: Scheme) -> &'static str {
        match scheme {
            Scheme::Decimal => self.decimal,
            Scheme::Binary => self.binary,
            Scheme::Gnu => self.gnu,
        }
    }
}

/// Classification of a unit token, before any base policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixKind {
    /// "B", "bytes", or no suffix at all.
    Bytes,
    /// IEC form ("KiB".."YiB"); base is always 1024.
    Binary(u32),
    /// Letter plus "B" ("kB", "KB", "MB", ...); base comes from caller policy.
    LetterB(u32),
    /// GNU single letter ("K".."Y"); base comes from caller policy.
    Gnu(u32),
}

/// Case-insensitive suffix classification, longest form first so that
/// "KiB" is never split into "K" + "iB".
pub fn classify_suffix(token: &str) -> Option<SuffixKind> {
    if token.is_empty() || token.eq_ignore_ascii_case("b") || token.eq_ignore_ascii_case("bytes") {
        return Some(SuffixKind::Bytes);
    }

    match token.as_bytes() {
        [l, i, b'b' | b'B'] if i.eq_ignore_ascii_case(&b'i') => {
            tier_power(*l).map(SuffixKind::Binary)
        }
        [l, b'b' | b'B'] => tier_power(*l).map(SuffixKind::LetterB),
        [l] => tier_power(*l).map(SuffixKind::Gnu),
        _ => None,
    }
}

/// Resolve a classified suffix to (power, base). The ambiguous forms
/// (GNU letters and letter+"B") follow `default_binary`; IEC forms are
/// always 1024-based.
pub fn resolve_base(kind: SuffixKind, default_binary: bool) -> (u32, u64) {
    match kind {
        SuffixKind::Bytes => (0, DECIMAL_BASE),
        SuffixKind::Binary(power) => (power, BINARY_BASE),
        SuffixKind::LetterB(power) | SuffixKind::Gnu(power) => {
            let base = if default_binary { BINARY_BASE } else { DECIMAL_BASE };
            (power, base)
        }
    }
}

/// base^power as u128. The largest value produced is 1024^8 = 2^80.
pub fn base_pow(base: u64, power: u32) -> u128 {
    (base as u128).pow(power)
}

// tier letter to power, either case
fn tier_power(letter: u8) -> Option<u32> {
    match letter.to_ascii_uppercase() {
        b'K' => Some(1),
        b'M' => Some(2),
        b'G' => Some(3),
        b'T' => Some(4),
        b'P' => Some(5),
        b'E' => Some(6),
        b'Z' => Some(7),
        b'Y' => Some(8),
        _ => None,
    }
}
