//! Convert between raw byte counts and human-readable sizes.
//!
//! Formatting picks the largest fitting unit in the chosen scheme (SI
//! decimal, IEC binary or GNU single letters) and renders with printf-style
//! precision. Parsing accepts all three schemes case-insensitively and
//! converts with exact decimal arithmetic, so "1 YiB" comes back as
//! 2^80 bytes, not a float approximation.

pub mod error;
pub mod format;
pub mod logging;
pub mod parse;
pub mod units;

mod decimal;

pub use decimal::Rounding;
pub use error::{FormatError, ParseError};
pub use format::{format_size, FormatOptions, NumberFormat, SizeInput};
pub use parse::{parse_size, Locale, ParseOptions};
