//! Sub-region key canonicalization
//!
//! A sub-region key is the join key of the whole resolution engine: the
//! codelist parser and the content descriptor parser must both canonicalize a
//! raw country list into the byte-identical `REGIONTAG[_SHORTCODE]*` string,
//! or the later cascade joins fall apart. Sorting the mapped short codes is
//! the normalization step that makes the key a function of the country *set*
//! rather than the authoring order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::country::{CountryError, CountryTable};

/// Canonical sub-region identifier, e.g. `EURO_CY_ES_FR_GR_IT` or
/// `EURO_COMMON`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubRegionKey(String);

impl SubRegionKey {
    /// Wrap an already-canonical key string.
    pub fn from_canonical(key: impl Into<String>) -> Self {
        SubRegionKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Region tag prefix, e.g. `EURO` for `EURO_CY_GR`.
    pub fn region_tag(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Country short codes after the region tag (empty for COMMON keys).
    pub fn short_codes(&self) -> impl Iterator<Item = &str> {
        self.0.split('_').skip(1).filter(|part| *part != "COMMON")
    }

    pub fn is_common(&self) -> bool {
        self.0.ends_with("_COMMON")
    }

    /// Key with underscores replaced by spaces, for display contexts.
    pub fn display_words(&self) -> String {
        self.0.replace('_', " ")
    }

    /// Expand the key into the mcc codes it covers.
    ///
    /// COMMON keys resolve through the region's aggregate record; everything
    /// else resolves one mcc per country short code, in key order.
    pub fn mcc_codes(&self, countries: &CountryTable) -> Result<Vec<String>, CountryError> {
        if self.is_common() {
            return countries.aggregate_mccs(self.region_tag());
        }
        self.short_codes()
            .map(|code| countries.mcc_of(code).map(str::to_string))
            .collect()
    }
}

impl fmt::Display for SubRegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalizes raw country lists into [`SubRegionKey`]s.
pub struct SubRegionResolver<'a> {
    countries: &'a CountryTable,
}

impl<'a> SubRegionResolver<'a> {
    pub fn new(countries: &'a CountryTable) -> Self {
        SubRegionResolver { countries }
    }

    /// Build the canonical key for a region tag and a comma-separated country
    /// list (long names, short codes, or the literal `COMMON`).
    ///
    /// Unknown countries are fatal: the run has no meaningful output if a key
    /// cannot be canonicalized.
    pub fn resolve(&self, region_tag: &str, country_list: &str) -> Result<SubRegionKey, CountryError> {
        let mut short_codes = Vec::new();
        for name in country_list.split(',') {
            short_codes.push(self.countries.short_code_of(name.trim())?);
        }

        if short_codes.iter().any(|code| *code == "COMMON") {
            return Ok(SubRegionKey(format!("{region_tag}_COMMON")));
        }

        short_codes.sort_unstable();

        let mut key = String::from(region_tag);
        for code in short_codes {
            key.push('_');
            key.push_str(code);
        }
        Ok(SubRegionKey(key))
    }
}
