//! Numeric interpretation of textual SVD values
//!
//! The model keeps every value as text. These functions convert on demand, at the point where a
//! number is actually needed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{NumericFormatError, NumericProp};

/// Parses an integer literal that is either `0x`-prefixed hexadecimal or plain decimal
///
/// The prefix check is case-sensitive and applied to the literal text: `0X10` is not hexadecimal
/// and fails as an invalid decimal.
pub(crate) fn parse_int_literal(text: &str, prop: NumericProp) -> Result<u64, NumericFormatError> {
    let (digits, radix) = match text.strip_prefix("0x") {
        Some(hex) => (hex.trim_end(), 16),
        None => (text.trim(), 10),
    };
    // `from_str_radix` tolerates a sign, which is never valid after the hex prefix
    if radix == 16 && digits.starts_with(['+', '-']) {
        return Err(NumericFormatError::InvalidNonnegInt {
            prop,
            text: text.to_owned(),
        });
    }
    u64::from_str_radix(digits, radix).map_err(|source| NumericFormatError::ParseInt {
        prop,
        text: text.to_owned(),
        source,
    })
}

/// Like [`parse_int_literal`], but the value must also fit into 32 bits
pub(crate) fn parse_u32_literal(text: &str, prop: NumericProp) -> Result<u32, NumericFormatError> {
    parse_int_literal(text, prop)?
        .try_into()
        .map_err(|_| NumericFormatError::Overflow {
            prop,
            text: text.to_owned(),
        })
}

#[test]
fn parse_int_literal_works() {
    let test = |s| parse_int_literal(s, NumericProp::BaseAddress);

    assert_eq!(test("0x40021000"), Ok(1_073_876_992));
    assert_eq!(test("0x40020000"), Ok(1_073_872_896));
    assert_eq!(test("1073876992"), Ok(1_073_876_992));
    assert_eq!(test("0x0"), Ok(0));
    assert_eq!(test("42"), Ok(42));
    assert_eq!(test(" 42\n"), Ok(42));
    assert!(test("0X10").is_err());
    assert!(test("0x").is_err());
    assert!(test("0x-1").is_err());
    assert!(test("4002_0000").is_err());
    assert!(test("").is_err());
    assert!(test("GPIO").is_err());
}

#[test]
fn parse_u32_literal_rejects_wide_values() {
    assert_eq!(parse_u32_literal("0xFFFFFFFF", NumericProp::BitWidth), Ok(u32::MAX));
    assert!(matches!(
        parse_u32_literal("0x100000000", NumericProp::BitWidth),
        Err(NumericFormatError::Overflow { .. })
    ));
}

/// Returns the binary multiplier for a size suffix character
fn binary_size_mult_from_char(c: char) -> Result<u64, NumericFormatError> {
    match c {
        'k' | 'K' => Ok(1024),
        'm' | 'M' => Ok(1024 * 1024),
        'g' | 'G' => Ok(1024 * 1024 * 1024),
        't' | 'T' => Ok(1024 * 1024 * 1024 * 1024),
        _ => Err(NumericFormatError::InvalidSizeMultiplierSuffix(c)),
    }
}

#[test]
fn binary_size_mult_from_char_works() {
    assert_eq!(binary_size_mult_from_char('k'), Ok(1024));
    assert_eq!(binary_size_mult_from_char('M'), Ok(1024 * 1024));
    assert_eq!(binary_size_mult_from_char('g'), Ok(1024 * 1024 * 1024));
    assert_eq!(
        binary_size_mult_from_char('t'),
        Ok(1024 * 1024 * 1024 * 1024)
    );
    assert!(binary_size_mult_from_char('x').is_err());
}

/// Parses a CMSIS-SVD `scaledNonNegativeInteger` from `text`
///
/// Accepts an optional plus sign, then `0x`/`0X`-prefixed hexadecimal digits, `#`-prefixed binary
/// digits or plain decimal digits, and an optional `k`, `m`, `g` or `t` binary multiplier.
pub(crate) fn parse_nonneg_int(text: &str, prop: NumericProp) -> Result<u64, NumericFormatError> {
    // Compile Regexes only once as recommended by the documentation of the Regex crate
    lazy_static! {
        /// Regular expression to capture hexadecimal numbers, as defined in CMSIS-SVD schema
        static ref HEX_NONNEG_INT_RE: Regex = Regex::new(
            r"(?x)              # insignificant whitespace
            ^\+?                # zero or one plus sign
            (?:0x|0X)           # hexadecimal prefix
            ([[:xdigit:]]+)     # one or more hexadecimal digits (captured as #1)
            [[:space:]]?        # zero or one of whitespace
            ([kmgtKMGT])?$      # zero or one of kilo, mega, giga, tera identifier (captured as #2)
        ").unwrap();

        /// Regular expression to capture binary numbers, as defined in CMSIS-SVD schema
        static ref BIN_NONNEG_INT_RE: Regex = Regex::new(
            r"(?x)              # insignificant whitespace
            ^\+?                # zero or one plus sign
            \#                  # binary prefix
            ([01]+)             # one or more binary digits (captured as #1)
            [[:space:]]?        # zero or one of whitespace
            ([kmgtKMGT])?$      # zero or one of kilo, mega, giga, tera identifier (captured as #2)
        ").unwrap();

        /// Regular expression to capture decimal numbers, as defined in CMSIS-SVD schema
        static ref DEC_NONNEG_INT_RE: Regex = Regex::new(
            r"(?x)              # insignificant whitespace
            ^\+?                # zero or one plus sign
            ([[:digit:]]+)      # one or more decimal digits (captured as #1)
            [[:space:]]?        # zero or one of whitespace
            ([kmgtKMGT])?$      # zero or one of kilo, mega, giga, tera identifier (captured as #2)
        ").unwrap();
    }

    let trimmed = text.trim();
    let parse_err = |source| NumericFormatError::ParseInt {
        prop,
        text: text.to_owned(),
        source,
    };

    let (number, size_mult) = if let Some(captures) = HEX_NONNEG_INT_RE.captures(trimmed) {
        let number = u64::from_str_radix(&captures[1], 16).map_err(parse_err)?;
        (number, captures.get(2))
    } else if let Some(captures) = BIN_NONNEG_INT_RE.captures(trimmed) {
        let number = u64::from_str_radix(&captures[1], 2).map_err(parse_err)?;
        (number, captures.get(2))
    } else if let Some(captures) = DEC_NONNEG_INT_RE.captures(trimmed) {
        let number = captures[1].parse::<u64>().map_err(parse_err)?;
        (number, captures.get(2))
    } else {
        return Err(NumericFormatError::InvalidNonnegInt {
            prop,
            text: text.to_owned(),
        });
    };

    let size_mult = size_mult
        .and_then(|m| m.as_str().chars().next())
        .map(binary_size_mult_from_char)
        .transpose()?;

    match size_mult {
        Some(mult) => number
            .checked_mul(mult)
            .ok_or_else(|| NumericFormatError::Overflow {
                prop,
                text: text.to_owned(),
            }),
        None => Ok(number),
    }
}

#[test]
fn parse_nonneg_int_works() {
    let test = |s| parse_nonneg_int(s, NumericProp::AddressOffset).unwrap();

    assert_eq!(test("0xFFB00000"), 0xFFB0_0000);
    assert_eq!(test("+0xFFB00000"), 0xFFB0_0000);
    assert_eq!(test("0X14"), 0x14);
    assert_eq!(test("#1010"), 0b1010);
    assert_eq!(test("#1 k"), 1024);
    assert_eq!(test("42"), 42);
    assert_eq!(test("1 k"), 1024);
    assert_eq!(test("2M"), 2 * 1024 * 1024);
    assert_eq!(test("437260288"), 437_260_288);
}

#[test]
fn parse_nonneg_int_rejects_garbage() {
    let test = |s| parse_nonneg_int(s, NumericProp::ResetValue);

    assert!(test("").is_err());
    assert!(test("0x").is_err());
    assert!(test("-1").is_err());
    assert!(test("#FFB00000").is_err());
    assert!(test("#102").is_err());
    assert!(test("12 apples").is_err());
    assert!(matches!(
        test("0xFFFFFFFFFFFFFFFF k"),
        Err(NumericFormatError::Overflow { .. })
    ));
}
