//! Test fixtures for end-to-end generation runs
//!
//! Builds a complete tool tree under a temp directory: descriptors, country
//! table, settings layers, media storage, and the generated application
//! registry, laid out the way the pipeline discovers them.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use variantgen::pipeline::PipelineConfig;

pub const PRODUCT: &str = "athena";
pub const TYPE_DESIGNATOR: &str = "rm1057";

pub const COUNTRY_TABLE: &str = "\
GREECE:GR:202
CYPRUS:CY:280
FRANCE:FR:208
ITALY:IT:222
SPAIN:ES:214
INDIA:IN:404
EURO COMMON:E_C:216,226,228
";

pub const CODELIST: &str = "\
# athena codelist
MV 1302 059W210 9G-EURO RM-1057 NDT EURO|NO_SD|2300
MV 1303 059W2Z0 IN-India RM-1057 NDT INDIA IN|HAS_SD|2310

SV 2300 059W210 RM-1057 NDT EURO COMMON
SV 2301 059W210 RM-1057 NDT EURO GREECE,CYPRUS
SV 2310 059W2Z0 RM-1057 NDT INDIA INDIA
";

pub const CONTENT: &str = "\
$ athena content
#Videos-PRODUCT-intro.mp4
#Music-MV>EURO-anthem.mp3
#PreloadedApps-SV>EURO:COMMON-AppA
#PreloadedApps-SV>EURO:GREECE,CYPRUS-AppA/AppB
#PreloadedApps-SV>INDIA:INDIA-AppA
#Menu-SV>EURO:GREECE,CYPRUS-AppA(#FF0000)/AppB
#Home-SV>EURO:GREECE,CYPRUS-AppA(main,1,2,2,1)
";

pub const REGISTRY: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<ConfigBase>
  <VariantApplications>
    <VariantApplication appName="AppA" BGColor="#AAAAAA" />
    <VariantApplication appName="AppB" BGColor="#00FF00" />
  </VariantApplications>
</ConfigBase>
"##;

/// A complete tool tree for one product, rooted in a temp directory.
pub struct ToolTree {
    dir: TempDir,
}

impl ToolTree {
    /// Build the default tree: two markets, three sub-regions, two settings
    /// layers, and the media the default content descriptor references.
    pub fn new() -> Self {
        let tree = Self::empty();
        tree.write_codelist(CODELIST);
        tree.write_content(CONTENT);
        tree.write_settings_layer(
            "PRODUCT",
            r#"<VariantSetting packageId="p1" settingId="volume" value="5" />
<VariantSetting packageId="p1" settingId="timezone" value="utc" />"#,
        );
        tree.write_settings_layer(
            "SV_EURO_CY_GR",
            r#"<VariantSetting packageId="p2" settingId="volume" value="9" />"#,
        );
        tree.add_media("videos", "intro.mp4");
        tree.add_media("audio", "anthem.mp3");
        tree
    }

    /// Build the directory skeleton without descriptors.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();

        fs::create_dir_all(root.join("descriptors")).unwrap();
        fs::create_dir_all(root.join("cfg/Settings")).unwrap();
        for kind in ["videos", "audio", "images"] {
            fs::create_dir_all(root.join("storage/common").join(kind)).unwrap();
        }
        fs::create_dir_all(root.join("out").join(PRODUCT).join("cached-config-base")).unwrap();

        fs::write(
            root.join("variantgen.toml"),
            "[paths]\noutput = \"out\"\nstorage = \"storage\"\n",
        )
        .unwrap();
        fs::write(root.join("cfg/country_mcc.txt"), COUNTRY_TABLE).unwrap();
        fs::write(
            root.join("out")
                .join(PRODUCT)
                .join("cached-config-base/generated.xml"),
            REGISTRY,
        )
        .unwrap();

        ToolTree { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Product output tree the documents land in.
    pub fn product_output(&self) -> PathBuf {
        self.root().join("out").join(PRODUCT)
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            tool_root: self.root().to_path_buf(),
            type_designator: TYPE_DESIGNATOR.to_string(),
            output_override: None,
        }
    }

    pub fn write_codelist(&self, contents: &str) {
        fs::write(
            self.root()
                .join("descriptors")
                .join(format!("{TYPE_DESIGNATOR}_{PRODUCT}_ds_codelist.txt")),
            contents,
        )
        .unwrap();
    }

    pub fn write_content(&self, contents: &str) {
        fs::write(
            self.root().join("descriptors").join(format!(
                "{TYPE_DESIGNATOR}_{PRODUCT}_ds_content_configure_data.txt"
            )),
            contents,
        )
        .unwrap();
    }

    pub fn write_settings_layer(&self, layer: &str, contents: &str) {
        fs::write(
            self.root()
                .join("cfg/Settings")
                .join(format!("Settings_{layer}.xml")),
            contents,
        )
        .unwrap();
    }

    pub fn add_media(&self, kind: &str, name: &str) {
        fs::write(self.root().join("storage/common").join(kind).join(name), b"").unwrap();
    }

    /// Read a rendered config-data document.
    pub fn config_data(&self, key: &str) -> String {
        let path = self
            .product_output()
            .join("config-sets")
            .join(format!("{key}-config-data.xml"));
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }

    /// Read a rendered variant document.
    pub fn variant_doc(&self, market_code: &str) -> String {
        let path = self
            .product_output()
            .join("variants")
            .join(format!("{PRODUCT}_{market_code}.xml"));
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }
}
