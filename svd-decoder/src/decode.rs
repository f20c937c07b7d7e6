//! Decodes raw register values into their bit fields

use std::fmt::{self, Write};

use crate::{
    error::NumericFormatError,
    model::{Field, Register},
};

/// The value of one field extracted from a raw register value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValue {
    pub name: String,
    pub description: String,
    pub bit_offset: u32,
    pub bit_width: u32,
    pub value: u32,
}

impl FieldValue {
    /// Position of the most significant bit of the field
    ///
    /// One below [`Self::bit_offset`] for a zero-width field.
    pub fn high_bit(&self) -> i64 {
        i64::from(self.bit_offset) + i64::from(self.bit_width) - 1
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (bits {}-{})",
            self.name,
            self.value,
            self.bit_offset,
            self.high_bit()
        )
    }
}

/// Extract `width` bits starting at `offset` from `value`
///
/// Shifts past the width of the value yield zero and widths of 32 or more select every remaining
/// bit.
fn extract_bits(value: u32, offset: u32, width: u32) -> u32 {
    let shifted = u64::from(value).checked_shr(offset).unwrap_or(0);
    let mask = if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    // `shifted` never exceeds `u32::MAX`, so neither does the masked value
    (shifted & mask) as u32
}

#[test]
fn extract_bits_works() {
    assert_eq!(extract_bits(1, 0, 1), 1);
    assert_eq!(extract_bits(0xF0, 4, 4), 15);
    assert_eq!(extract_bits(0xF0, 0, 4), 0);
    assert_eq!(extract_bits(0xDEAD_BEEF, 0, 32), 0xDEAD_BEEF);
    assert_eq!(extract_bits(0xDEAD_BEEF, 16, 16), 0xDEAD);
    assert_eq!(extract_bits(0x8000_0000, 31, 1), 1);
}

#[test]
fn extract_bits_degenerate_inputs() {
    // Zero width selects nothing
    assert_eq!(extract_bits(u32::MAX, 0, 0), 0);
    assert_eq!(extract_bits(u32::MAX, 7, 0), 0);
    // Out of range offsets and widths do not overflow
    assert_eq!(extract_bits(u32::MAX, 32, 1), 0);
    assert_eq!(extract_bits(u32::MAX, 200, 1), 0);
    assert_eq!(extract_bits(u32::MAX, 0, 64), u32::MAX);
    assert_eq!(extract_bits(u32::MAX, 28, 100), 0xF);
}

fn decode_field(field: &Field, value: u32) -> Result<FieldValue, NumericFormatError> {
    let bit_offset = field.bit_offset_u32()?;
    let bit_width = field.bit_width_u32()?;
    Ok(FieldValue {
        name: field.name().to_owned(),
        description: field.description().to_owned(),
        bit_offset,
        bit_width,
        value: extract_bits(value, bit_offset, bit_width),
    })
}

/// Decode every field of `register` from `value`, in declaration order
///
/// # Errors
///
/// A field's `bitOffset` or `bitWidth` is not numeric. The whole decode fails rather than
/// silently leaving the field out.
pub(crate) fn decode_fields(
    register: &Register,
    value: u32,
) -> Result<Vec<FieldValue>, NumericFormatError> {
    register
        .fields()
        .iter()
        .map(|field| decode_field(field, value))
        .collect()
}

/// `0x` followed by eight uppercase hexadecimal digits
pub(crate) fn format_hex(value: u32) -> String {
    format!("{value:#010X}")
}

#[test]
fn format_hex_works() {
    assert_eq!(format_hex(171), "0x000000AB");
    assert_eq!(format_hex(0xABCD), "0x0000ABCD");
    assert_eq!(format_hex(0), "0x00000000");
    assert_eq!(format_hex(u32::MAX), "0xFFFFFFFF");
}

/// Render the hexadecimal value followed by one indented line per field
///
/// Every line, including the last one, is terminated by a newline.
pub(crate) fn format_breakdown(value: u32, fields: &[FieldValue]) -> String {
    let mut out = format_hex(value);
    out.push('\n');
    for field in fields {
        // Writing to a `String` cannot fail
        let _ = writeln!(out, "  {field}");
    }
    out
}
