//! Encodes information about a device described by a CMSIS-SVD file: its CPU, peripherals,
//! registers and bit fields.
//!
//! The model is built once per parse and never mutated afterwards. Every scalar is kept in its
//! textual form. Numbers are interpreted on demand, see [`crate::numeric`].

mod device;
mod peripheral;

// Anything that's part of the public API of the submodules is also part of the public API of model
pub use device::*;
pub use peripheral::*;

use std::{ops, slice};

use log::warn;

/// Returns the text of an optional SVD element, or the empty string if the element was absent
pub(crate) fn text_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// A complete CMSIS-SVD document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SvdModel {
    pub(crate) device: Device,
    pub(crate) peripherals: Peripherals,
}

impl SvdModel {
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Iterate peripherals in document order
    pub fn peripherals(&self) -> slice::Iter<'_, Peripheral> {
        self.peripherals.iter()
    }

    /// Find a peripheral by exact name
    pub fn peripheral(&self, name: &str) -> Option<&Peripheral> {
        self.peripherals.get(name)
    }

    pub fn peripheral_count(&self) -> usize {
        self.peripherals.len()
    }
}

/// Peripherals keyed by name (newtype)
///
/// Keeps the order in which names first appeared in the document. Inserting a peripheral whose
/// name is already taken replaces the earlier one in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Peripherals(Vec<Peripheral>);

impl Peripherals {
    /// Insert `periph`, returning the peripheral it replaced if the name was already taken
    pub(crate) fn insert(&mut self, periph: Peripheral) -> Option<Peripheral> {
        match self.0.iter_mut().find(|p| p.name == periph.name) {
            Some(existing) => {
                warn!(
                    "peripheral '{}' is defined more than once, the last definition wins",
                    periph.name()
                );
                Some(std::mem::replace(existing, periph))
            }
            None => {
                self.0.push(periph);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Peripheral> {
        self.0.iter().find(|p| p.name() == name)
    }
}

impl ops::Deref for Peripherals {
    type Target = Vec<Peripheral>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periph(name: &str, base: &str) -> Peripheral {
        Peripheral {
            name: Some(name.to_owned()),
            base_address: Some(base.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_peripheral_overwrites_in_place() {
        let mut periphs = Peripherals::default();
        assert!(periphs.insert(periph("GPIOA", "0x1")).is_none());
        assert!(periphs.insert(periph("GPIOB", "0x2")).is_none());

        let replaced = periphs.insert(periph("GPIOA", "0x3"));

        assert_eq!(replaced.unwrap().base_address(), "0x1");
        assert_eq!(periphs.len(), 2);
        assert_eq!(periphs[0].name(), "GPIOA");
        assert_eq!(periphs[0].base_address(), "0x3");
        assert_eq!(periphs.get("GPIOB").unwrap().base_address(), "0x2");
        assert!(periphs.get("GPIOC").is_none());
    }

    #[test]
    fn absent_text_reads_as_empty() {
        let p = Peripheral::default();
        assert_eq!(p.name(), "");
        assert_eq!(p.description(), "");
        assert_eq!(text_or_empty(&None), "");
    }
}
