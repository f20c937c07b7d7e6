//! svd-decoder --- Read CMSIS-SVD files into a device model and decode raw register values into
//! their bit fields.

// Export full API at crate root
pub use api::*;
pub use decode::FieldValue;
pub use error::{LoadError, NumericFormatError, NumericProp, SvdParseError};
pub use model::{CpuInfo, Device, Field, Peripheral, Peripherals, Register, SvdModel};

mod api;
mod decode;
mod error;
mod frontend;
mod model;
mod numeric;
mod to_json;
mod util;
