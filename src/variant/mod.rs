//! Variant indexing
//!
//! Turns parsed market records into the per-market descriptors the renderers
//! consume: a deterministic four-digit sequence number (codelist file order),
//! the derived display and package names, and the validated sd-card flag.

use crate::codelist::MarketRecord;

/// Error types for variant indexing
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("market {market}: unrecognized sd-card literal {value:?}")]
    InvalidSdCardFlag { market: String, value: String },

    #[error("type designator {0:?} has no recognized rm/mm prefix")]
    InvalidTypeDesignator(String),
}

/// Fixed variant document version.
pub const VARIANT_VERSION: &str = "001";
/// Fixed platform identifier.
pub const PLATFORM: &str = "AOL";

/// Final per-market record consumed by the document renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub market_code: String,
    /// 1-based position in codelist order, zero-padded to four digits
    pub index: String,
    /// Space-joined region tags plus the `variant` suffix
    pub display_name: String,
    /// `{market_code} {TYPE-DESIGNATOR} {display_name}`
    pub package_name: String,
    pub country_set_label: String,
    pub has_sdcard: bool,
}

/// Uppercase a type designator for display: `rm1057` -> `RM-1057`.
pub fn display_type_designator(type_designator: &str) -> Result<String, VariantError> {
    if let Some(rest) = type_designator.strip_prefix("rm") {
        return Ok(format!("RM-{rest}"));
    }
    if let Some(rest) = type_designator.strip_prefix("mm") {
        return Ok(format!("MM-{rest}"));
    }
    Err(VariantError::InvalidTypeDesignator(
        type_designator.to_string(),
    ))
}

/// Build descriptors for every market, in codelist order.
pub fn index_markets(
    markets: &[MarketRecord],
    type_designator: &str,
) -> Result<Vec<VariantDescriptor>, VariantError> {
    let designator = display_type_designator(type_designator)?;

    markets
        .iter()
        .enumerate()
        .map(|(position, market)| {
            let display_name = display_name(&market.region_tags);
            let has_sdcard = match market.sd_card.as_str() {
                "NO_SD" => false,
                "HAS_SD" => true,
                other => {
                    return Err(VariantError::InvalidSdCardFlag {
                        market: market.market_code.clone(),
                        value: other.to_string(),
                    })
                }
            };

            Ok(VariantDescriptor {
                package_name: format!("{} {designator} {display_name}", market.market_code),
                market_code: market.market_code.clone(),
                index: format!("{:04}", position + 1),
                display_name,
                country_set_label: market.country_set_label.clone(),
                has_sdcard,
            })
        })
        .collect()
}

/// Space-joined region tags plus `variant`. Markets in the `ID` region carry
/// a trailing operator tag that is stripped from the display name.
fn display_name(region_tags: &[String]) -> String {
    let tags = if region_tags.iter().any(|tag| tag == "ID") {
        &region_tags[..region_tags.len() - 1]
    } else {
        region_tags
    };
    format!("{} variant", tags.join(" "))
}
