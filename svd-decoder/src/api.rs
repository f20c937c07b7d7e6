//! Exposes functionality supported by this crate
mod error;

use std::{path, str};

use log::debug;

use crate::{
    decode::{self, FieldValue},
    error::{LoadError, NumericFormatError, SvdParseError},
    frontend::svd_xml,
    model::{Register, SvdModel},
    util,
};

pub use error::ApiError;

/// Parse CMSIS-SVD XML `content` into a model
///
/// Missing elements never fail the parse, they read as empty.
///
/// # Errors
///
/// `content` is not well-formed XML.
pub fn parse(content: &str) -> Result<SvdModel, SvdParseError> {
    svd_xml::parse_svd(content)
}

/// Parse a CMSIS-SVD document given as raw bytes
///
/// # Errors
///
/// `bytes` are not UTF-8, or do not form well-formed XML.
pub fn parse_bytes(bytes: &[u8]) -> Result<SvdModel, SvdParseError> {
    parse(str::from_utf8(bytes)?)
}

/// Read and parse the CMSIS-SVD file at `path`
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, [`LoadError::Parse`] if it is malformed.
pub fn parse_file(path: &path::Path) -> Result<SvdModel, LoadError> {
    debug!("reading SVD from {}", path.display());
    let content = util::read_file(path)?;
    parse_bytes(&content).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Base address of the peripheral called `periph_name`
///
/// Returns `Ok(None)` if there is no such peripheral.
///
/// # Errors
///
/// The base address is neither `0x`-prefixed hexadecimal nor decimal.
pub fn peripheral_base_address(
    model: &SvdModel,
    periph_name: &str,
) -> Result<Option<u64>, NumericFormatError> {
    model
        .peripheral(periph_name)
        .map(|p| p.base_address_u64())
        .transpose()
}

/// Find register `reg_name` of peripheral `periph_name`, first match wins
pub fn find_register<'m>(
    model: &'m SvdModel,
    periph_name: &str,
    reg_name: &str,
) -> Option<&'m Register> {
    model.peripheral(periph_name)?.register(reg_name)
}

/// Absolute address of a register, i.e., peripheral base address + register address offset
///
/// Returns `Ok(None)` if the peripheral or register does not exist.
///
/// # Errors
///
/// Either component is not numeric or their sum overflows.
pub fn register_address(
    model: &SvdModel,
    periph_name: &str,
    reg_name: &str,
) -> Result<Option<u64>, NumericFormatError> {
    let Some(periph) = model.peripheral(periph_name) else {
        return Ok(None);
    };
    let Some(reg) = periph.register(reg_name) else {
        return Ok(None);
    };
    let base = periph.base_address_u64()?;
    let offset = reg.address_offset_u64()?;
    base.checked_add(offset)
        .map(Some)
        .ok_or(NumericFormatError::AddrOverflow { base, offset })
}

/// Decode `value` into the fields of the given register
///
/// Returns `Ok(None)` if the register cannot be found.
///
/// # Errors
///
/// A field's `bitOffset` or `bitWidth` is not numeric.
pub fn decode_register_value(
    model: &SvdModel,
    periph_name: &str,
    reg_name: &str,
    value: u32,
) -> Result<Option<Vec<FieldValue>>, NumericFormatError> {
    find_register(model, periph_name, reg_name)
        .map(|reg| decode::decode_fields(reg, value))
        .transpose()
}

/// Render `value` with a breakdown of the given register's fields
///
/// An unknown register renders as the bare value, e.g. `0x000000AB`. A known register renders as
/// the same line followed by one `  <name>: <value> (bits <low>-<high>)` line per field, each
/// terminated by a newline.
///
/// # Errors
///
/// A field's `bitOffset` or `bitWidth` is not numeric.
pub fn format_register_value(
    model: &SvdModel,
    periph_name: &str,
    reg_name: &str,
    value: u32,
) -> Result<String, NumericFormatError> {
    Ok(
        match decode_register_value(model, periph_name, reg_name, value)? {
            Some(fields) => decode::format_breakdown(value, &fields),
            None => decode::format_hex(value),
        },
    )
}

/// Names of all peripherals with their register counts, in document order
pub fn list_peripherals(model: &SvdModel) -> Vec<(String, usize)> {
    model
        .peripherals()
        .map(|p| (p.name().to_owned(), p.registers().len()))
        .collect()
}

/// Load the SVD file at `path` and render `value` as a breakdown of the given register
///
/// Shorthand for [`parse_file`] followed by [`format_register_value`].
///
/// # Errors
///
/// The file cannot be read, is malformed, or a field of the register is not numeric.
pub fn format_register_value_from_file(
    path: &path::Path,
    periph_name: &str,
    reg_name: &str,
    value: u32,
) -> Result<String, ApiError> {
    let model = parse_file(path)?;
    Ok(format_register_value(&model, periph_name, reg_name, value)?)
}
