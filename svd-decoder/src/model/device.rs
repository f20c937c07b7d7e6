use super::text_or_empty;

/// Top level properties of an SVD document
///
/// Always present once parsing succeeds, even if all of its elements are missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    pub(crate) name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) description: Option<String>,
    /// How many bits one address contains
    pub(crate) address_unit_bits: Option<String>,
    /// How many bits one bus transaction contains
    pub(crate) width: Option<String>,
    pub(crate) cpu: Option<CpuInfo>,
}

impl Device {
    pub fn name(&self) -> &str {
        text_or_empty(&self.name)
    }

    pub fn version(&self) -> &str {
        text_or_empty(&self.version)
    }

    pub fn description(&self) -> &str {
        text_or_empty(&self.description)
    }

    pub fn address_unit_bits(&self) -> &str {
        text_or_empty(&self.address_unit_bits)
    }

    pub fn width(&self) -> &str {
        text_or_empty(&self.width)
    }

    /// CPU section of the device, `None` if the document has no `cpu` element
    pub fn cpu(&self) -> Option<&CpuInfo> {
        self.cpu.as_ref()
    }
}

/// Processor core description
///
/// Booleans and numbers are kept exactly as written, e.g. `"true"` or `"4"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuInfo {
    pub(crate) name: Option<String>,
    pub(crate) revision: Option<String>,
    pub(crate) endian: Option<String>,
    pub(crate) mpu_present: Option<String>,
    pub(crate) fpu_present: Option<String>,
    pub(crate) nvic_prio_bits: Option<String>,
    pub(crate) vendor_systick_config: Option<String>,
}

impl CpuInfo {
    pub fn name(&self) -> &str {
        text_or_empty(&self.name)
    }

    pub fn revision(&self) -> &str {
        text_or_empty(&self.revision)
    }

    pub fn endian(&self) -> &str {
        text_or_empty(&self.endian)
    }

    pub fn mpu_present(&self) -> &str {
        text_or_empty(&self.mpu_present)
    }

    pub fn fpu_present(&self) -> &str {
        text_or_empty(&self.fpu_present)
    }

    pub fn nvic_prio_bits(&self) -> &str {
        text_or_empty(&self.nvic_prio_bits)
    }

    pub fn vendor_systick_config(&self) -> &str {
        text_or_empty(&self.vendor_systick_config)
    }
}
