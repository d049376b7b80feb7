//! `{Product}_{CTR}.xml` rendering

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{write_document, RenderError};
use crate::codelist::Codelist;
use crate::country::CountryTable;
use crate::subregion::SubRegionKey;
use crate::variant::{VariantDescriptor, PLATFORM, VARIANT_VERSION};

/// Everything needed to render one market's variant document.
pub struct VariantDoc<'a> {
    pub variant: &'a VariantDescriptor,
    pub product_name: &'a str,
    /// Display form of the type designator, e.g. `RM-1057`
    pub type_designator: &'a str,
    pub codelist: &'a Codelist,
    pub countries: &'a CountryTable,
}

impl VariantDoc<'_> {
    /// Output file name for this document.
    pub fn file_name(&self) -> String {
        format!("{}_{}.xml", self.product_name, self.variant.market_code)
    }
}

/// Render the document to bytes.
pub fn render_variant(doc: &VariantDoc<'_>) -> Result<Vec<u8>, RenderError> {
    let variant = doc.variant;
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("Variant");
    root.push_attribute(("package", variant.package_name.as_str()));
    root.push_attribute(("ctr", variant.market_code.as_str()));
    root.push_attribute(("name", variant.display_name.as_str()));
    root.push_attribute(("index", variant.index.as_str()));
    root.push_attribute(("version", VARIANT_VERSION));
    root.push_attribute(("platform", PLATFORM));
    root.push_attribute(("product", doc.product_name));
    root.push_attribute(("typeDesignator", doc.type_designator));
    root.push_attribute(("countrySet", variant.country_set_label.as_str()));
    root.push_attribute(("hasSdCard", if variant.has_sdcard { "True" } else { "False" }));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("ConfigSets")))?;
    for (position, key) in doc
        .codelist
        .subregions_of(&variant.market_code)
        .iter()
        .enumerate()
    {
        let mut config_set = BytesStart::new("config-set");
        config_set.push_attribute(("name", key.as_str()));
        let data_file = format!("{key}-config-data.xml");
        config_set.push_attribute(("config-data-file", data_file.as_str()));
        if position == 0 {
            config_set.push_attribute(("default", "True"));
        }
        writer.write_event(Event::Empty(config_set))?;

        network_table(&mut writer, key, doc)?;
    }
    writer.write_event(Event::End(BytesEnd::new("ConfigSets")))?;

    writer.write_event(Event::End(BytesEnd::new("Variant")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Render and write the document into the variants directory, returning the
/// written path.
pub fn write_variant(doc: &VariantDoc<'_>, variants_dir: &Path) -> Result<PathBuf, RenderError> {
    let path = variants_dir.join(doc.file_name());
    write_document(&path, &render_variant(doc)?)?;
    Ok(path)
}

/// `Multivariant` block: one `MNCMCCPair` per covered mcc. COMMON keys expand
/// through the region's aggregate list, everything else one pair per country
/// short code; the pair name is the sub-region's numeric id.
fn network_table<W: std::io::Write>(
    writer: &mut Writer<W>,
    key: &SubRegionKey,
    doc: &VariantDoc<'_>,
) -> Result<(), RenderError> {
    let id = doc
        .codelist
        .subregion_id(key)
        .ok_or_else(|| RenderError::UnknownSubRegion(key.clone()))?;

    writer.write_event(Event::Start(BytesStart::new("Multivariant")))?;
    for mcc in key.mcc_codes(doc.countries)? {
        writer.write_event(Event::Start(BytesStart::new("MNCMCCPair")))?;

        writer.write_event(Event::Start(BytesStart::new("Name")))?;
        writer.write_event(Event::Text(BytesText::new(id)))?;
        writer.write_event(Event::End(BytesEnd::new("Name")))?;

        writer.write_event(Event::Start(BytesStart::new("Mcc")))?;
        writer.write_event(Event::Text(BytesText::new(&mcc)))?;
        writer.write_event(Event::End(BytesEnd::new("Mcc")))?;

        writer.write_event(Event::Empty(BytesStart::new("Mnc")))?;
        writer.write_event(Event::Empty(BytesStart::new("SPN")))?;

        writer.write_event(Event::End(BytesEnd::new("MNCMCCPair")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Multivariant")))?;
    Ok(())
}
