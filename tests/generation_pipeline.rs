//! End-to-end generation runs over a fixture tool tree
//!
//! Each test builds a complete tool tree under a temp directory, runs the
//! pipeline, and asserts on the rendered documents and the run summary.

mod fixtures;

use fixtures::ToolTree;
use variantgen::pipeline;

#[test]
fn test_full_run_writes_all_documents() {
    let tree = ToolTree::new();
    let summary = pipeline::run(&tree.config()).unwrap();

    assert_eq!(summary.variants_written, 2);
    assert_eq!(summary.config_sets_written, 3);
    assert_eq!(summary.product_name, "athena");
    assert_eq!(summary.type_designator, "rm1057");

    for key in ["EURO_COMMON", "EURO_CY_GR", "INDIA_IN"] {
        tree.config_data(key);
    }
    tree.variant_doc("059W210");
    tree.variant_doc("059W2Z0");

    let summary_path = tree.product_output().join("generation_summary.json");
    let raw = std::fs::read_to_string(summary_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["schema_version"], 1);
    assert_eq!(parsed["variants_written"], 2);
}

#[test]
fn test_variant_documents_are_indexed_in_codelist_order() {
    let tree = ToolTree::new();
    pipeline::run(&tree.config()).unwrap();

    let euro = tree.variant_doc("059W210");
    assert!(euro.contains(r#"index="0001""#));
    assert!(euro.contains(r#"name="NDT EURO variant""#));
    assert!(euro.contains(r#"package="059W210 RM-1057 NDT EURO variant""#));
    assert!(euro.contains(r#"hasSdCard="False""#));
    assert!(euro.contains(r#"countrySet="9G-EURO""#));

    let india = tree.variant_doc("059W2Z0");
    assert!(india.contains(r#"index="0002""#));
    assert!(india.contains(r#"name="NDT INDIA IN variant""#));
    assert!(india.contains(r#"hasSdCard="True""#));
}

#[test]
fn test_first_subregion_is_the_default_config_set() {
    let tree = ToolTree::new();
    pipeline::run(&tree.config()).unwrap();

    let euro = tree.variant_doc("059W210");
    assert!(euro.contains(
        r#"<config-set name="EURO_COMMON" config-data-file="EURO_COMMON-config-data.xml" default="True"/>"#
    ));
    assert!(euro.contains(
        r#"<config-set name="EURO_CY_GR" config-data-file="EURO_CY_GR-config-data.xml"/>"#
    ));
}

#[test]
fn test_common_key_expands_aggregate_network_table() {
    let tree = ToolTree::new();
    pipeline::run(&tree.config()).unwrap();

    let euro = tree.variant_doc("059W210");
    // EURO_COMMON covers the three aggregate codes, EURO_CY_GR one per country.
    assert_eq!(euro.matches("<MNCMCCPair>").count(), 5);
    assert_eq!(euro.matches("<Name>2300</Name>").count(), 3);
    for mcc in ["216", "226", "228", "280", "202"] {
        assert!(euro.contains(&format!("<Mcc>{mcc}</Mcc>")));
    }
}

#[test]
fn test_content_cascade_feeds_config_data() {
    let tree = ToolTree::new();
    pipeline::run(&tree.config()).unwrap();

    // PRODUCT video everywhere; the MV>EURO music entry only where the EURO
    // tag is part of the key.
    let euro = tree.config_data("EURO_CY_GR");
    assert!(euro.contains(r#"<Video Name="intro.mp4""#));
    assert!(euro.contains(r#"<Music Name="anthem.mp3""#));

    let india = tree.config_data("INDIA_IN");
    assert!(india.contains(r#"<Video Name="intro.mp4""#));
    assert!(!india.contains("anthem.mp3"));
}

#[test]
fn test_menu_colors_explicit_and_registry_default() {
    let tree = ToolTree::new();
    pipeline::run(&tree.config()).unwrap();

    let euro = tree.config_data("EURO_CY_GR");
    assert!(euro.contains(r##"<VariantApplication appName="AppA" BGColor="#FF0000"/>"##));
    assert!(euro.contains(r##"<VariantApplication appName="AppB" BGColor="#00FF00"/>"##));
    assert!(euro.contains(
        r#"<VariantApplication appName="AppA" Collection="main" Row="1" Column="2" Width="2" Height="1"/>"#
    ));
}

#[test]
fn test_settings_cascade_last_layer_wins_in_rendered_output() {
    let tree = ToolTree::new();
    pipeline::run(&tree.config()).unwrap();

    // The SV layer replaces the product-wide volume record for EURO_CY_GR
    // only; EURO_COMMON keeps the product value.
    let euro = tree.config_data("EURO_CY_GR");
    assert!(euro.contains(r#"<VariantSetting packageId="p2" settingId="volume" value="9"/>"#));
    assert!(euro.contains(r#"settingId="timezone" value="utc""#));
    assert!(!euro.contains(r#"value="5""#));

    let common = tree.config_data("EURO_COMMON");
    assert!(common.contains(r#"<VariantSetting packageId="p1" settingId="volume" value="5"/>"#));
}

#[test]
fn test_subregions_without_preloaded_apps_are_not_emitted() {
    let tree = ToolTree::new();
    tree.write_content(
        "#Videos-PRODUCT-intro.mp4\n\
         #Music-SV>EURO:GREECE,CYPRUS-anthem.mp3\n\
         #PreloadedApps-SV>INDIA:INDIA-AppA\n",
    );
    let summary = pipeline::run(&tree.config()).unwrap();

    assert_eq!(summary.config_sets_written, 1);
    let config_sets = tree.product_output().join("config-sets");
    assert!(config_sets.join("INDIA_IN-config-data.xml").is_file());
    assert!(!config_sets.join("EURO_CY_GR-config-data.xml").exists());
}
