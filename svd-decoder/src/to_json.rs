//! Serialization of the model into a nested JSON document keyed by CMSIS-SVD element names

use json::JsonValue;

use crate::model::{CpuInfo, Device, Field, Peripheral, Register, SvdModel};

impl CpuInfo {
    pub fn to_json(&self) -> JsonValue {
        let mut obj = JsonValue::new_object();
        obj["name"] = self.name().into();
        obj["revision"] = self.revision().into();
        obj["endian"] = self.endian().into();
        obj["mpuPresent"] = self.mpu_present().into();
        obj["fpuPresent"] = self.fpu_present().into();
        obj["nvicPrioBits"] = self.nvic_prio_bits().into();
        obj["vendorSystickConfig"] = self.vendor_systick_config().into();
        obj
    }
}

impl Device {
    /// A device without a `cpu` element serializes `cpu` as an empty object
    pub fn to_json(&self) -> JsonValue {
        let mut obj = JsonValue::new_object();
        obj["name"] = self.name().into();
        obj["version"] = self.version().into();
        obj["description"] = self.description().into();
        obj["cpu"] = self
            .cpu()
            .map_or_else(JsonValue::new_object, CpuInfo::to_json);
        obj["addressUnitBits"] = self.address_unit_bits().into();
        obj["width"] = self.width().into();
        obj
    }
}

impl Field {
    pub fn to_json(&self) -> JsonValue {
        let mut obj = JsonValue::new_object();
        obj["name"] = self.name().into();
        obj["description"] = self.description().into();
        obj["bitOffset"] = self.bit_offset().into();
        obj["bitWidth"] = self.bit_width().into();
        obj["access"] = self.access().into();
        obj
    }
}

impl Register {
    pub fn to_json(&self) -> JsonValue {
        let mut obj = JsonValue::new_object();
        obj["name"] = self.name().into();
        obj["description"] = self.description().into();
        obj["addressOffset"] = self.address_offset().into();
        obj["size"] = self.size().into();
        obj["access"] = self.access().into();
        obj["resetValue"] = self.reset_value().into();
        obj["fields"] = JsonValue::Array(self.fields().iter().map(Field::to_json).collect());
        obj
    }
}

impl Peripheral {
    pub fn to_json(&self) -> JsonValue {
        let mut obj = JsonValue::new_object();
        obj["name"] = self.name().into();
        obj["description"] = self.description().into();
        obj["baseAddress"] = self.base_address().into();
        obj["registers"] =
            JsonValue::Array(self.registers().iter().map(Register::to_json).collect());
        obj
    }
}

impl SvdModel {
    /// Transform the model into `{ "device": {...}, "peripherals": { "<name>": {...} } }`
    pub fn to_json(&self) -> JsonValue {
        let mut peripherals = JsonValue::new_object();
        for periph in self.peripherals() {
            peripherals[periph.name()] = periph.to_json();
        }
        let mut obj = JsonValue::new_object();
        obj["device"] = self.device().to_json();
        obj["peripherals"] = peripherals;
        obj
    }

    pub fn to_json_string_pretty(&self) -> String {
        self.to_json().pretty(2)
    }
}
