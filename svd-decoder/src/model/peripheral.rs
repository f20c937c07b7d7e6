//! Peripherals, registers and fields. `Register` is the unit the decoder operates on.

use super::text_or_empty;
use crate::{
    error::{NumericFormatError, NumericProp},
    numeric::{parse_int_literal, parse_nonneg_int, parse_u32_literal},
};

/// A memory-mapped hardware unit, e.g. a timer or a UART
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Peripheral {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    /// Either `0x`-prefixed hexadecimal or decimal
    pub(crate) base_address: Option<String>,
    /// Registers in declaration order
    pub(crate) registers: Vec<Register>,
}

impl Peripheral {
    pub fn name(&self) -> &str {
        text_or_empty(&self.name)
    }

    pub fn description(&self) -> &str {
        text_or_empty(&self.description)
    }

    /// Base address exactly as written in the document
    pub fn base_address(&self) -> &str {
        text_or_empty(&self.base_address)
    }

    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Interpret the base address as a number
    ///
    /// # Errors
    ///
    /// The base address is neither `0x`-prefixed hexadecimal nor decimal.
    pub fn base_address_u64(&self) -> Result<u64, NumericFormatError> {
        parse_int_literal(self.base_address(), NumericProp::BaseAddress)
    }

    /// Find a register by exact name, first match wins
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }
}

/// An addressable block of bits at a fixed offset from its peripheral's base address
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Register {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) address_offset: Option<String>,
    pub(crate) size: Option<String>,
    /// E.g. `read-only`, `write-only` or `read-write`, not validated
    pub(crate) access: Option<String>,
    pub(crate) reset_value: Option<String>,
    /// Fields in declaration order
    pub(crate) fields: Vec<Field>,
}

impl Register {
    pub fn name(&self) -> &str {
        text_or_empty(&self.name)
    }

    pub fn description(&self) -> &str {
        text_or_empty(&self.description)
    }

    pub fn address_offset(&self) -> &str {
        text_or_empty(&self.address_offset)
    }

    pub fn size(&self) -> &str {
        text_or_empty(&self.size)
    }

    pub fn access(&self) -> &str {
        text_or_empty(&self.access)
    }

    pub fn reset_value(&self) -> &str {
        text_or_empty(&self.reset_value)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Interpret the address offset as a number
    ///
    /// # Errors
    ///
    /// The offset is missing or is not a valid `scaledNonNegativeInteger`.
    pub fn address_offset_u64(&self) -> Result<u64, NumericFormatError> {
        parse_nonneg_int(self.address_offset(), NumericProp::AddressOffset)
    }

    /// Register width in bits, `None` if the register does not declare a size
    pub fn size_bits(&self) -> Result<Option<u32>, NumericFormatError> {
        self.size
            .as_deref()
            .map(|s| {
                let bits = parse_nonneg_int(s, NumericProp::Size)?;
                u32::try_from(bits).map_err(|_| NumericFormatError::Overflow {
                    prop: NumericProp::Size,
                    text: s.to_owned(),
                })
            })
            .transpose()
    }

    /// Register value after reset, `None` if the register does not declare one
    pub fn reset_value_u64(&self) -> Result<Option<u64>, NumericFormatError> {
        self.reset_value
            .as_deref()
            .map(|s| parse_nonneg_int(s, NumericProp::ResetValue))
            .transpose()
    }
}

/// A named bit range within a register
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    /// Position of the least significant bit, counting from 0
    pub(crate) bit_offset: Option<String>,
    pub(crate) bit_width: Option<String>,
    pub(crate) access: Option<String>,
}

impl Field {
    pub fn name(&self) -> &str {
        text_or_empty(&self.name)
    }

    pub fn description(&self) -> &str {
        text_or_empty(&self.description)
    }

    pub fn bit_offset(&self) -> &str {
        text_or_empty(&self.bit_offset)
    }

    pub fn bit_width(&self) -> &str {
        text_or_empty(&self.bit_width)
    }

    pub fn access(&self) -> &str {
        text_or_empty(&self.access)
    }

    pub fn bit_offset_u32(&self) -> Result<u32, NumericFormatError> {
        parse_u32_literal(self.bit_offset(), NumericProp::BitOffset)
    }

    pub fn bit_width_u32(&self) -> Result<u32, NumericFormatError> {
        parse_u32_literal(self.bit_width(), NumericProp::BitWidth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_numeric_accessors() {
        let reg = Register {
            name: Some("MODER".to_owned()),
            address_offset: Some("0x00".to_owned()),
            size: Some("32".to_owned()),
            reset_value: Some("0xA8000000".to_owned()),
            ..Default::default()
        };
        assert_eq!(reg.address_offset_u64(), Ok(0));
        assert_eq!(reg.size_bits(), Ok(Some(32)));
        assert_eq!(reg.reset_value_u64(), Ok(Some(0xA800_0000)));

        let binary = Register {
            address_offset: Some("#10100".to_owned()),
            reset_value: Some("#1010".to_owned()),
            ..Default::default()
        };
        assert_eq!(binary.address_offset_u64(), Ok(0x14));
        assert_eq!(binary.reset_value_u64(), Ok(Some(10)));

        let bare = Register::default();
        assert_eq!(bare.size_bits(), Ok(None));
        assert_eq!(bare.reset_value_u64(), Ok(None));
        assert!(bare.address_offset_u64().is_err());
    }

    #[test]
    fn field_bits_must_be_numeric() {
        let field = Field {
            bit_offset: Some("4".to_owned()),
            bit_width: Some("four".to_owned()),
            ..Default::default()
        };
        assert_eq!(field.bit_offset_u32(), Ok(4));
        let err = field.bit_width_u32().unwrap_err();
        assert!(matches!(
            err,
            NumericFormatError::ParseInt {
                prop: NumericProp::BitWidth,
                ..
            }
        ));
    }

    #[test]
    fn register_lookup_first_match_wins() {
        let reg = |name: &str, offset: &str| Register {
            name: Some(name.to_owned()),
            address_offset: Some(offset.to_owned()),
            ..Default::default()
        };
        let periph = Peripheral {
            registers: vec![reg("CR1", "0x0"), reg("SR", "0x4"), reg("CR1", "0x8")],
            ..Default::default()
        };
        assert_eq!(periph.register("CR1").unwrap().address_offset(), "0x0");
        assert!(periph.register("cr1").is_none());
    }
}
