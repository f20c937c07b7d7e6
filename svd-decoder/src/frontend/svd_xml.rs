//! Builds an [`SvdModel`] from a CMSIS-SVD XML document.
//!
//! The builder is permissive: a missing element yields an absent value, a missing container
//! (`peripherals`, `registers`, `fields`) yields an empty collection. Only markup that cannot be
//! parsed is an error.

use itertools::Itertools;
use log::{debug, info, warn};
use roxmltree::{Document, ParsingOptions};

use crate::{
    error::SvdParseError,
    model::{CpuInfo, Device, Field, Peripheral, Peripherals, Register, SvdModel},
};

struct XmlNode<'a, 'input>(pub roxmltree::Node<'a, 'input>);

trait IntoXmlNode<'a, 'input> {
    fn into_xml_node(self) -> XmlNode<'a, 'input>;
}

impl<'a, 'input> IntoXmlNode<'a, 'input> for roxmltree::Node<'a, 'input> {
    fn into_xml_node(self) -> XmlNode<'a, 'input> {
        XmlNode(self)
    }
}

impl<'a, 'input> XmlNode<'a, 'input> {
    /// Find the first immediate child element called `tag`
    fn maybe_find_child(&self, tag: &str) -> Option<XmlNode<'a, 'input>> {
        self.0
            .children()
            .find(|n| n.has_tag_name(tag))
            .map(|n| n.into_xml_node())
    }

    /// Text of the first immediate child called `tag`, verbatim
    ///
    /// A child without text content, e.g. `<description/>`, reads as the empty string. A missing
    /// child is `None`.
    fn maybe_find_text_by_tag_name(&self, tag: &str) -> Option<String> {
        self.maybe_find_child(tag)
            .map(|n| n.0.text().unwrap_or_default().to_owned())
    }

    fn children_with_tag_name(&self, tag: &str) -> Vec<XmlNode<'a, 'input>> {
        self.0
            .children()
            .filter(|n| n.has_tag_name(tag))
            .map(|n| n.into_xml_node())
            .collect_vec()
    }

    /// Immediate `item` children of the `container` child, or nothing if there is no container
    fn items_in_container(&self, container: &str, item: &str) -> Vec<XmlNode<'a, 'input>> {
        self.maybe_find_child(container)
            .map(|c| c.children_with_tag_name(item))
            .unwrap_or_default()
    }
}

fn process_field(field_node: &XmlNode) -> Field {
    Field {
        name: field_node.maybe_find_text_by_tag_name("name"),
        description: field_node.maybe_find_text_by_tag_name("description"),
        bit_offset: field_node.maybe_find_text_by_tag_name("bitOffset"),
        bit_width: field_node.maybe_find_text_by_tag_name("bitWidth"),
        access: field_node.maybe_find_text_by_tag_name("access"),
    }
}

fn process_register(register_node: &XmlNode) -> Register {
    let fields = register_node
        .items_in_container("fields", "field")
        .iter()
        .map(process_field)
        .collect_vec();
    Register {
        name: register_node.maybe_find_text_by_tag_name("name"),
        description: register_node.maybe_find_text_by_tag_name("description"),
        address_offset: register_node.maybe_find_text_by_tag_name("addressOffset"),
        size: register_node.maybe_find_text_by_tag_name("size"),
        access: register_node.maybe_find_text_by_tag_name("access"),
        reset_value: register_node.maybe_find_text_by_tag_name("resetValue"),
        fields,
    }
}

fn process_peripheral(periph_node: &XmlNode) -> Peripheral {
    let registers = periph_node
        .items_in_container("registers", "register")
        .iter()
        .map(process_register)
        .collect_vec();
    let periph = Peripheral {
        name: periph_node.maybe_find_text_by_tag_name("name"),
        description: periph_node.maybe_find_text_by_tag_name("description"),
        base_address: periph_node.maybe_find_text_by_tag_name("baseAddress"),
        registers,
    };
    debug!(
        "peripheral {} with {} registers",
        periph.name(),
        periph.registers.len()
    );
    periph
}

fn process_peripherals(device_node: &XmlNode) -> Peripherals {
    let mut peripherals = Peripherals::default();
    for periph_node in device_node.items_in_container("peripherals", "peripheral") {
        peripherals.insert(process_peripheral(&periph_node));
    }
    peripherals
}

fn process_cpu(cpu_node: &XmlNode) -> CpuInfo {
    CpuInfo {
        name: cpu_node.maybe_find_text_by_tag_name("name"),
        revision: cpu_node.maybe_find_text_by_tag_name("revision"),
        endian: cpu_node.maybe_find_text_by_tag_name("endian"),
        mpu_present: cpu_node.maybe_find_text_by_tag_name("mpuPresent"),
        fpu_present: cpu_node.maybe_find_text_by_tag_name("fpuPresent"),
        nvic_prio_bits: cpu_node.maybe_find_text_by_tag_name("nvicPrioBits"),
        vendor_systick_config: cpu_node.maybe_find_text_by_tag_name("vendorSystickConfig"),
    }
}

fn process_device(device_node: &XmlNode) -> Device {
    Device {
        name: device_node.maybe_find_text_by_tag_name("name"),
        version: device_node.maybe_find_text_by_tag_name("version"),
        description: device_node.maybe_find_text_by_tag_name("description"),
        address_unit_bits: device_node.maybe_find_text_by_tag_name("addressUnitBits"),
        width: device_node.maybe_find_text_by_tag_name("width"),
        cpu: device_node.maybe_find_child("cpu").map(|n| process_cpu(&n)),
    }
}

/// Find device properties and peripherals from an SVD XML document
fn process_root(parsed: &Document) -> SvdModel {
    let root = parsed.root_element().into_xml_node();
    let root_tag = root.0.tag_name().name();
    if root_tag != "device" {
        warn!("expected root element 'device', found '{root_tag}', reading it as the device");
    }

    let device = process_device(&root);
    let peripherals = process_peripherals(&root);
    info!(
        "Found device '{}' with {} peripherals and {} registers.",
        device.name(),
        peripherals.len(),
        peripherals.iter().map(|p| p.registers.len()).sum::<usize>()
    );
    SvdModel {
        device,
        peripherals,
    }
}

/// Parse CMSIS-SVD `content` into a model
///
/// # Errors
///
/// `content` is not well-formed XML.
pub(crate) fn parse_svd(content: &str) -> Result<SvdModel, SvdParseError> {
    // Vendor files commonly carry a DOCTYPE
    let opts = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let parsed = Document::parse_with_options(content, opts)?;
    Ok(process_root(&parsed))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const STM32F4_SUBSET: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8" standalone="no"?>
        <device schemaVersion="1.1" xmlns:xs="http://www.w3.org/2001/XMLSchema-instance">
          <name>STM32F407</name>
          <version>1.0</version>
          <description>STM32F407</description>
          <cpu>
            <name>CM4</name>
            <revision>r0p1</revision>
            <endian>little</endian>
            <mpuPresent>true</mpuPresent>
            <fpuPresent>true</fpuPresent>
            <nvicPrioBits>4</nvicPrioBits>
            <vendorSystickConfig>false</vendorSystickConfig>
          </cpu>
          <addressUnitBits>8</addressUnitBits>
          <width>32</width>
          <peripherals>
            <peripheral>
              <name>GPIOA</name>
              <description>General-purpose I/Os</description>
              <baseAddress>0x40020000</baseAddress>
              <registers>
                <register>
                  <name>MODER</name>
                  <description>GPIO port mode register</description>
                  <addressOffset>0x0</addressOffset>
                  <size>0x20</size>
                  <access>read-write</access>
                  <resetValue>0xA8000000</resetValue>
                  <fields>
                    <field>
                      <name>MODER1</name>
                      <description>Port x configuration bits (y = 0..15)</description>
                      <bitOffset>2</bitOffset>
                      <bitWidth>2</bitWidth>
                    </field>
                    <field>
                      <name>MODER0</name>
                      <description>Port x configuration bits (y = 0..15)</description>
                      <bitOffset>0</bitOffset>
                      <bitWidth>2</bitWidth>
                    </field>
                  </fields>
                </register>
                <register>
                  <name>IDR</name>
                  <addressOffset>0x10</addressOffset>
                  <access>read-only</access>
                </register>
              </registers>
            </peripheral>
            <peripheral>
              <name>TIM2</name>
              <baseAddress>1073741824</baseAddress>
            </peripheral>
          </peripherals>
        </device>
    "#};

    #[test]
    fn parses_device_and_cpu() {
        let model = parse_svd(STM32F4_SUBSET).unwrap();
        let dev = model.device();
        assert_eq!(dev.name(), "STM32F407");
        assert_eq!(dev.version(), "1.0");
        assert_eq!(dev.address_unit_bits(), "8");
        assert_eq!(dev.width(), "32");

        let cpu = dev.cpu().unwrap();
        assert_eq!(cpu.name(), "CM4");
        assert_eq!(cpu.revision(), "r0p1");
        assert_eq!(cpu.endian(), "little");
        assert_eq!(cpu.mpu_present(), "true");
        assert_eq!(cpu.fpu_present(), "true");
        assert_eq!(cpu.nvic_prio_bits(), "4");
        assert_eq!(cpu.vendor_systick_config(), "false");
    }

    #[test]
    fn parses_peripherals_registers_fields_in_order() {
        let model = parse_svd(STM32F4_SUBSET).unwrap();
        let names = model.peripherals().map(|p| p.name()).collect_vec();
        assert_eq!(names, ["GPIOA", "TIM2"]);

        let gpioa = model.peripheral("GPIOA").unwrap();
        assert_eq!(gpioa.base_address(), "0x40020000");
        assert_eq!(gpioa.registers().len(), 2);

        let moder = &gpioa.registers()[0];
        assert_eq!(moder.name(), "MODER");
        assert_eq!(moder.size(), "0x20");
        assert_eq!(moder.reset_value(), "0xA8000000");
        let fields = moder.fields().iter().map(|f| f.name()).collect_vec();
        assert_eq!(fields, ["MODER1", "MODER0"]);
        assert_eq!(moder.fields()[0].bit_offset(), "2");
        assert_eq!(moder.fields()[0].access(), "");

        let idr = &gpioa.registers()[1];
        assert_eq!(idr.description(), "");
        assert!(idr.fields().is_empty());

        let tim2 = model.peripheral("TIM2").unwrap();
        assert_eq!(tim2.description(), "");
        assert!(tim2.registers().is_empty());
    }

    #[test]
    fn parse_is_deterministic() {
        assert_eq!(
            parse_svd(STM32F4_SUBSET).unwrap(),
            parse_svd(STM32F4_SUBSET).unwrap()
        );
    }

    #[test]
    fn missing_elements_are_not_errors() {
        let model = parse_svd("<device><cpu/></device>").unwrap();
        assert_eq!(model.device().name(), "");
        assert_eq!(model.device().description(), "");
        assert_eq!(model.device().cpu().unwrap().endian(), "");
        assert_eq!(model.peripheral_count(), 0);

        let model = parse_svd("<device><name>X</name></device>").unwrap();
        assert!(model.device().cpu().is_none());
    }

    #[test]
    fn empty_peripherals_container() {
        let model = parse_svd("<device><peripherals/></device>").unwrap();
        assert_eq!(model.peripheral_count(), 0);
    }

    #[test]
    fn text_is_verbatim() {
        let model = parse_svd(indoc! {"
            <device>
              <description>  padded
            text </description>
              <version></version>
            </device>
        "})
        .unwrap();
        assert_eq!(model.device().description(), "  padded\ntext ");
        assert_eq!(model.device().version(), "");
    }

    #[test]
    fn only_immediate_children_are_read() {
        // `name` of the nested peripheral must not leak into the device
        let model = parse_svd(indoc! {"
            <device>
              <peripherals>
                <peripheral><name>UART4</name></peripheral>
              </peripherals>
            </device>
        "})
        .unwrap();
        assert_eq!(model.device().name(), "");
        assert!(model.peripheral("UART4").is_some());
    }

    #[test]
    fn duplicate_peripheral_last_write_wins() {
        let model = parse_svd(indoc! {"
            <device>
              <peripherals>
                <peripheral><name>USART1</name><baseAddress>0x1</baseAddress></peripheral>
                <peripheral><name>USART2</name><baseAddress>0x2</baseAddress></peripheral>
                <peripheral><name>USART1</name><baseAddress>0x3</baseAddress></peripheral>
              </peripherals>
            </device>
        "})
        .unwrap();
        assert_eq!(model.peripheral_count(), 2);
        assert_eq!(model.peripheral("USART1").unwrap().base_address(), "0x3");
    }

    #[test]
    fn doctype_is_accepted() {
        let model = parse_svd(indoc! {r#"
            <?xml version="1.0"?>
            <!DOCTYPE device>
            <device><name>X</name></device>
        "#})
        .unwrap();
        assert_eq!(model.device().name(), "X");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            parse_svd("<device><name>STM32</device>"),
            Err(SvdParseError::MalformedDocument(_))
        ));
        assert!(parse_svd("").is_err());
    }
}
