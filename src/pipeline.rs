//! Pipeline orchestration
//!
//! Drives a full generation run:
//! - Discover the descriptors for the type designator
//! - Parse the country table, codelist, and content descriptor
//! - Load the generated application registry and scan media storage
//! - Render one config-data document per registered sub-region
//! - Render one variant document per market
//! - Emit the generation summary
//!
//! All parsing completes before any merge step begins; all merging completes
//! before any rendering begins. The first fatal error aborts the run: no
//! partial document is emitted for the failing item and no further items are
//! attempted. Library code never terminates the process; the binary converts
//! [`PipelineError`] into a diagnostic and exit code.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};
use thiserror::Error;

use crate::codelist::{Codelist, CodelistError};
use crate::content::cascade::{CascadeError, ContentCascade};
use crate::content::{ContentCategory, ContentDescriptor, ContentError};
use crate::country::{CountryError, CountryTable};
use crate::discovery::{discover, DiscoveryError};
use crate::layout::{LayoutError, ToolLayout};
use crate::registry::{AppRegistry, RegistryError};
use crate::render::{write_config_data, write_variant, ConfigDataDoc, RenderError, VariantDoc};
use crate::settings::{SettingsCascade, SettingsError};
use crate::storage::FsMediaStore;
use crate::subregion::SubRegionResolver;
use crate::summary::GenerationSummary;
use crate::variant::{display_type_designator, index_markets, VariantError};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("country table error: {0}")]
    Country(#[from] CountryError),

    #[error("codelist error: {0}")]
    Codelist(#[from] CodelistError),

    #[error("content descriptor error: {0}")]
    Content(#[from] ContentError),

    #[error("application registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("storage scan error: {0}")]
    Storage(#[source] io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("content cascade error: {0}")]
    Cascade(#[from] CascadeError),

    #[error("variant error: {0}")]
    Variant(#[from] VariantError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Layout(_) => 1,
            PipelineError::Io(_) => 1,
            PipelineError::Discovery(_) => 2,
            PipelineError::Country(_) => 3,
            PipelineError::Codelist(_) => 4,
            PipelineError::Content(_) => 5,
            PipelineError::Registry(_) => 6,
            PipelineError::Storage(_) => 7,
            PipelineError::Settings(_) => 8,
            PipelineError::Cascade(_) => 9,
            PipelineError::Variant(_) => 10,
            PipelineError::Render(_) => 11,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root the descriptor walk and layout resolution start from
    pub tool_root: PathBuf,

    /// Type designator selecting the product, e.g. `rm1057`
    pub type_designator: String,

    /// Output root override from the CLI (`-o`)
    pub output_override: Option<PathBuf>,
}

/// Run a full generation pass.
pub fn run(config: &PipelineConfig) -> PipelineResult<GenerationSummary> {
    let started = Instant::now();

    let mut layout = ToolLayout::load(&config.tool_root)?;
    if let Some(output) = &config.output_override {
        layout.output = output.clone();
    }

    let identity = discover(&config.tool_root, &config.type_designator)?;
    let product_output = layout.output.join(&identity.product_name);

    let countries = CountryTable::load(&layout.country_table)?;
    let resolver = SubRegionResolver::new(&countries);

    let codelist = Codelist::load(&identity.codelist_path, &resolver)?;
    let descriptor = ContentDescriptor::load(&identity.content_path, &resolver)?;
    info!(
        "parsed {} markets, {} emitted sub-regions",
        codelist.markets.len(),
        descriptor.emitted_subregions().len()
    );

    let registry = AppRegistry::load(&product_output.join("cached-config-base"))?;
    let store = FsMediaStore::scan(&layout.storage, &identity.product_name)
        .map_err(PipelineError::Storage)?;

    let cascade = ContentCascade::new(&descriptor, &store, &registry);
    let settings = SettingsCascade::new(
        &layout.settings,
        &identity.product_name,
        &identity.product_nick_name,
    );

    // Resolve everything before writing anything: a fatal error in a later
    // sub-region must not leave earlier documents behind.
    let mut config_docs = Vec::new();
    for key in descriptor.emitted_subregions() {
        let resolved = settings.resolve(key)?;
        for source in &resolved.sources {
            debug!("{key}: settings layer {} sha256 {}", source.name, source.digest);
        }
        config_docs.push(ConfigDataDoc {
            key: key.clone(),
            videos: cascade.media_items(ContentCategory::Videos, key),
            music: cascade.media_items(ContentCategory::Music, key),
            wallpapers: cascade.media_items(ContentCategory::LockscreenWallpaper, key),
            ringtones: cascade.media_items(ContentCategory::RingingTones, key),
            preloaded_apps: cascade.preloaded_apps(key)?,
            menu: cascade.menu_entries(key)?,
            home: cascade.home_placements(key)?,
            settings: resolved.records,
        });
    }

    let variants = index_markets(&codelist.markets, &config.type_designator)?;
    let designator_display = display_type_designator(&config.type_designator)?;

    let config_sets_dir = product_output.join("config-sets");
    for doc in &config_docs {
        let path = write_config_data(doc, &config_sets_dir)?;
        info!("wrote {}", path.display());
    }

    let variants_dir = product_output.join("variants");
    for variant in &variants {
        let doc = VariantDoc {
            variant,
            product_name: &identity.product_name,
            type_designator: &designator_display,
            codelist: &codelist,
            countries: &countries,
        };
        let path = write_variant(&doc, &variants_dir)?;
        info!("wrote {}", path.display());
    }

    let summary = GenerationSummary::new(
        identity.product_name.clone(),
        config.type_designator.clone(),
        variants.len(),
        config_docs.len(),
        started.elapsed().as_millis() as u64,
    );
    fs::create_dir_all(&product_output)?;
    summary.write_json(&product_output.join("generation_summary.json"))?;

    Ok(summary)
}
