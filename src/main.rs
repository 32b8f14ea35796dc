use anyhow::Result;
use clap::{Parser, Subcommand};

use sizec::{
    format_size, logging, parse_size, FormatOptions, Locale, NumberFormat, ParseOptions, Rounding,
    SizeInput,
};

#[derive(Parser, Debug)]
#[command(name = "sizec")]
#[command(version, about = "Convert between byte counts and human-readable sizes")]
struct Cli {
    /// Increase logging verbosity (use together with RUST_LOG for fine control).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a byte count as a human-readable size
    Format {
        /// Byte count, integer or float ("1536", "2.5e9", "-1000")
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Use IEC binary units (KiB, 1024-based)
        #[arg(long, default_value_t = false)]
        binary: bool,

        /// Use GNU single-letter units (1.0M), 1000-based unless --binary
        #[arg(long, default_value_t = false)]
        gnu: bool,

        /// printf-style precision for the scaled value, e.g. %.2f
        #[arg(long, default_value = "%.1f")]
        format: NumberFormat,

        /// Drop trailing zeros after the decimal point ("1 KB", not "1.0 KB")
        #[arg(long, default_value_t = false)]
        strip_trailing_zeros: bool,
    },

    /// Parse a human-readable size into a byte count
    Parse {
        /// Size text ("1.5 GiB", "2e3 KB", "-100 B")
        #[arg(allow_hyphen_values = true)]
        text: String,

        /// Resolve ambiguous units (KB, K) as 1024-based
        #[arg(long, default_value_t = false)]
        default_binary: bool,

        /// Accepted for compatibility; GNU letters always parse
        #[arg(long, default_value_t = false)]
        default_gnu: bool,

        /// Accept locale thousands separators in the number
        #[arg(long, default_value_t = false)]
        allow_thousands_separator: bool,

        /// Rounding for fractional bytes: floor, nearest or ceil
        #[arg(long, default_value = "nearest")]
        rounding: Rounding,

        /// Reject unknown unit suffixes (the default)
        #[arg(long, default_value_t = false, conflicts_with = "permissive")]
        strict: bool,

        /// Ignore unknown unit suffixes and read the number as bytes
        #[arg(long, default_value_t = false)]
        permissive: bool,

        /// Locale for the decimal point and grouping (en_US, de_DE)
        #[arg(long, default_value = "en_US")]
        locale: Locale,

        /// Accept negative sizes
        #[arg(long, default_value_t = false)]
        allow_negative: bool,

        /// Smallest accepted result in bytes (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        min_value: Option<i128>,

        /// Largest accepted result in bytes (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        max_value: Option<i128>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.cmd {
        Command::Format {
            value,
            binary,
            gnu,
            format,
            strip_trailing_zeros,
        } => {
            tracing::debug!(
                value = %value,
                binary,
                gnu,
                precision = format.precision(),
                strip_trailing_zeros,
                "formatting"
            );

            let value: SizeInput = value.parse()?;
            let opts = FormatOptions {
                binary,
                gnu,
                format,
                strip_trailing_zeros,
            };
            println!("{}", format_size(value, &opts)?);
            Ok(())
        }

        Command::Parse {
            text,
            default_binary,
            default_gnu,
            allow_thousands_separator,
            rounding,
            strict,
            permissive,
            locale,
            allow_negative,
            min_value,
            max_value,
        } => {
            let strict = effective_strict(strict, permissive);

            tracing::debug!(
                text = %text,
                default_binary,
                allow_thousands_separator,
                ?rounding,
                strict,
                ?locale,
                allow_negative,
                "parsing"
            );

            let opts = ParseOptions {
                default_binary,
                default_gnu,
                allow_thousands_separator,
                rounding,
                strict,
                locale,
                allow_negative,
                min_value,
                max_value,
            };
            println!("{}", parse_size(&text, &opts)?);
            Ok(())
        }
    }
}

// strict is the default; --permissive turns it off
fn effective_strict(strict_flag: bool, permissive: bool) -> bool {
    strict_flag || !permissive
}
