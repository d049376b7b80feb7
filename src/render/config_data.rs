//! `{SubRegion}-config-data.xml` rendering

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{write_document, RenderError};
use crate::content::cascade::{HomePlacement, MenuEntry};
use crate::settings::SettingsRecord;
use crate::subregion::SubRegionKey;

const CONFIG_TYPE: &str = "Area Configuration";
const CONFIG_INDEX: &str = "C-0002";

/// Fully resolved content of one sub-region document.
#[derive(Debug, Default)]
pub struct ConfigDataDoc {
    pub key: SubRegionKey,
    pub videos: Vec<String>,
    pub music: Vec<String>,
    pub wallpapers: Vec<String>,
    pub ringtones: Vec<String>,
    pub preloaded_apps: Vec<String>,
    pub menu: Vec<MenuEntry>,
    pub home: Vec<HomePlacement>,
    pub settings: Vec<SettingsRecord>,
}

impl ConfigDataDoc {
    /// Output file name for this document.
    pub fn file_name(&self) -> String {
        format!("{}-config-data.xml", self.key)
    }
}

/// Render the document to bytes.
pub fn render_config_data(doc: &ConfigDataDoc) -> Result<Vec<u8>, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let configuration_name = format!("{} Configuration", doc.key.display_words());
    let mut root = BytesStart::new("Configuration");
    root.push_attribute(("id", doc.key.as_str()));
    root.push_attribute(("type", CONFIG_TYPE));
    root.push_attribute(("name", configuration_name.as_str()));
    root.push_attribute(("index", CONFIG_INDEX));
    writer.write_event(Event::Start(root))?;

    media_list(&mut writer, "VideoList", "Video", &doc.videos, "common/videos")?;
    media_list(&mut writer, "MusicList", "Music", &doc.music, "common/audio")?;
    media_list(
        &mut writer,
        "WallpaperList",
        "Wallpaper",
        &doc.wallpapers,
        "common/images",
    )?;
    media_list(
        &mut writer,
        "RingtoneList",
        "Ringtone",
        &doc.ringtones,
        "common/audio/ringtones",
    )?;

    writer.write_event(Event::Start(BytesStart::new("VariantPreloadApplications")))?;
    for app in &doc.preloaded_apps {
        let mut elem = BytesStart::new("VariantApplication");
        elem.push_attribute(("appName", app.as_str()));
        elem.push_attribute(("installMethod", "preset"));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("VariantPreloadApplications")))?;

    writer.write_event(Event::Start(BytesStart::new("VariantMenuApplications")))?;
    for entry in &doc.menu {
        let mut elem = BytesStart::new("VariantApplication");
        elem.push_attribute(("appName", entry.app_name.as_str()));
        elem.push_attribute(("BGColor", entry.bg_color.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("VariantMenuApplications")))?;

    writer.write_event(Event::Start(BytesStart::new("VariantHomeScreen")))?;
    for placement in &doc.home {
        let mut elem = BytesStart::new("VariantApplication");
        elem.push_attribute(("appName", placement.app_name.as_str()));
        elem.push_attribute(("Collection", placement.collection.as_str()));
        elem.push_attribute(("Row", placement.row.as_str()));
        elem.push_attribute(("Column", placement.column.as_str()));
        elem.push_attribute(("Width", placement.width.as_str()));
        elem.push_attribute(("Height", placement.height.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("VariantHomeScreen")))?;

    writer.write_event(Event::Start(BytesStart::new("VariantSettings")))?;
    for record in &doc.settings {
        let mut elem = BytesStart::new("VariantSetting");
        elem.push_attribute(("packageId", record.package_id.as_str()));
        elem.push_attribute(("settingId", record.setting_id.as_str()));
        elem.push_attribute(("value", record.value.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("VariantSettings")))?;

    writer.write_event(Event::End(BytesEnd::new("Configuration")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Render and write the document into the config-sets directory, returning
/// the written path.
pub fn write_config_data(doc: &ConfigDataDoc, config_sets_dir: &Path) -> Result<PathBuf, RenderError> {
    let path = config_sets_dir.join(doc.file_name());
    write_document(&path, &render_config_data(doc)?)?;
    Ok(path)
}

fn media_list<W: std::io::Write>(
    writer: &mut Writer<W>,
    list_name: &str,
    item_name: &str,
    items: &[String],
    local_path: &str,
) -> Result<(), RenderError> {
    writer.write_event(Event::Start(BytesStart::new(list_name)))?;
    for item in items {
        let mut elem = BytesStart::new(item_name);
        elem.push_attribute(("Name", item.as_str()));
        elem.push_attribute(("targetpath", ""));
        elem.push_attribute(("localpath", local_path));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new(list_name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_resolved_lists() {
        let doc = ConfigDataDoc {
            key: SubRegionKey::from_canonical("EURO_CY_GR"),
            videos: vec!["intro.mp4".to_string()],
            music: vec!["anthem.mp3".to_string()],
            preloaded_apps: vec!["AppA".to_string()],
            menu: vec![MenuEntry {
                app_name: "AppA".to_string(),
                bg_color: "#FF0000".to_string(),
            }],
            settings: vec![SettingsRecord {
                package_id: "p".to_string(),
                setting_id: "volume".to_string(),
                value: "7".to_string(),
            }],
            ..ConfigDataDoc::default()
        };

        let rendered = String::from_utf8(render_config_data(&doc).unwrap()).unwrap();
        assert!(rendered.starts_with("<?xml"));
        assert!(rendered.contains(r#"<Configuration id="EURO_CY_GR" type="Area Configuration" name="EURO CY GR Configuration" index="C-0002">"#));
        assert!(rendered.contains(r#"<Video Name="intro.mp4" targetpath="" localpath="common/videos"/>"#));
        assert!(rendered.contains(r#"<Music Name="anthem.mp3" targetpath="" localpath="common/audio"/>"#));
        assert!(rendered.contains(r#"<VariantApplication appName="AppA" installMethod="preset"/>"#));
        assert!(rendered.contains(r##"<VariantApplication appName="AppA" BGColor="#FF0000"/>"##));
        assert!(rendered.contains(r#"<VariantSetting packageId="p" settingId="volume" value="7"/>"#));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let doc = ConfigDataDoc {
            key: SubRegionKey::from_canonical("INDIA_IN"),
            ..ConfigDataDoc::default()
        };
        let path = write_config_data(&doc, &dir.path().join("config-sets")).unwrap();
        assert!(path.ends_with("config-sets/INDIA_IN-config-data.xml"));
        assert!(path.is_file());
    }
}
