//! Codelist descriptor parser
//!
//! The codelist file describes every market of a product, one `MV` line per
//! market plus `SV` lines attaching sub-regions to markets:
//!
//! ```text
//! MV 1302 059W210 9G-EURO RM-1056 NDT EURO|NO_SD|2300
//! SV 2300 059W210 RM-1056 NDT EURO COMMON
//! SV 2301 059W210 RM-1056 NDT EURO GREECE,CYPRUS,FRANCE,ITALY,SPAIN
//! ```
//!
//! Fields are whitespace-separated with a trailing `|`-separated annex on
//! `MV` lines. Markets are kept in file order; that order is the canonical
//! iteration and numbering order downstream. The market -> sub-regions
//! association is established only after all `MV` records are known.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::country::CountryError;
use crate::subregion::{SubRegionKey, SubRegionResolver};

/// Error types for codelist parsing
#[derive(Debug, thiserror::Error)]
pub enum CodelistError {
    #[error("failed to read codelist: {0}")]
    Io(#[from] io::Error),

    #[error("codelist line {line} does not start with MV or SV: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error(transparent)]
    Country(#[from] CountryError),
}

/// One market of the product line, from a single `MV` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRecord {
    /// Market ("ctr") code, e.g. `059W210`
    pub market_code: String,
    /// Region tags in authoring order, e.g. `["NDT", "EURO"]`
    pub region_tags: Vec<String>,
    /// Country-set label, e.g. `9G-EURO`
    pub country_set_label: String,
    /// Raw sd-card literal from the annex (`NO_SD` / `HAS_SD`); validated
    /// when the variant descriptor is built
    pub sd_card: String,
}

/// A buffered `SV` line, held until all markets are known.
#[derive(Debug)]
struct SvLine {
    market_ref: String,
    id: String,
    region_tag: String,
    country_list: String,
}

/// Parsed codelist: markets in file order plus the sub-region association.
#[derive(Debug, Default)]
pub struct Codelist {
    /// Markets in `MV` file order
    pub markets: Vec<MarketRecord>,
    market_subregions: HashMap<String, Vec<SubRegionKey>>,
    subregion_ids: HashMap<SubRegionKey, String>,
}

impl Codelist {
    /// Load and parse a codelist file.
    pub fn load(path: &Path, resolver: &SubRegionResolver<'_>) -> Result<Self, CodelistError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents, resolver)
    }

    /// Parse codelist contents.
    ///
    /// Single pass with `SV` buffering: sub-regions attach to markets only
    /// after every `MV` record has been collected, so an `SV` line may appear
    /// before its market's `MV` line.
    pub fn parse(contents: &str, resolver: &SubRegionResolver<'_>) -> Result<Self, CodelistError> {
        let mut codelist = Codelist::default();
        let mut sv_lines = Vec::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || CodelistError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            };

            let mut annex = line.split('|');
            let head: Vec<&str> = annex
                .next()
                .unwrap_or_default()
                .split_whitespace()
                .collect();

            match head.first().copied() {
                Some("MV") => {
                    if head.len() < 6 {
                        return Err(malformed());
                    }
                    let sd_card = annex.next().ok_or_else(malformed)?;
                    codelist.markets.push(MarketRecord {
                        market_code: head[2].to_string(),
                        region_tags: head[5..].iter().map(|tag| tag.to_string()).collect(),
                        country_set_label: head[3].to_string(),
                        sd_card: sd_card.trim().to_string(),
                    });
                }
                Some("SV") => {
                    if head.len() < 5 {
                        return Err(malformed());
                    }
                    sv_lines.push(SvLine {
                        market_ref: head[2].to_string(),
                        id: head[1].to_string(),
                        region_tag: head[head.len() - 2].to_string(),
                        country_list: head[head.len() - 1].to_string(),
                    });
                }
                _ => return Err(malformed()),
            }
        }

        codelist.attach_subregions(sv_lines, resolver)?;
        Ok(codelist)
    }

    /// Attach buffered `SV` lines: market -> [sub-regions], in per-market
    /// `SV` file order.
    fn attach_subregions(
        &mut self,
        sv_lines: Vec<SvLine>,
        resolver: &SubRegionResolver<'_>,
    ) -> Result<(), CodelistError> {
        for market in &self.markets {
            self.market_subregions
                .insert(market.market_code.clone(), Vec::new());
        }

        for sv in sv_lines {
            let Some(keys) = self.market_subregions.get_mut(&sv.market_ref) else {
                warn!(
                    "SV line references market {} with no MV record; skipped",
                    sv.market_ref
                );
                continue;
            };
            let key = resolver.resolve(&sv.region_tag, &sv.country_list)?;
            debug!("market {} += sub-region {} (id {})", sv.market_ref, key, sv.id);
            keys.push(key.clone());
            self.subregion_ids.insert(key, sv.id);
        }

        Ok(())
    }

    /// Sub-regions attached to a market, in codelist order. The first entry
    /// is the market's default sub-region.
    pub fn subregions_of(&self, market_code: &str) -> &[SubRegionKey] {
        self.market_subregions
            .get(market_code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Numeric sub-variant id from the `SV` line (rendered as the pair name
    /// in network tables).
    pub fn subregion_id(&self, key: &SubRegionKey) -> Option<&str> {
        self.subregion_ids.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::CountryTable;

    fn table() -> CountryTable {
        CountryTable::parse(
            "GREECE:GR:202\n\
             CYPRUS:CY:280\n\
             INDIA:IN:404\n\
             EURO COMMON:E_C:216,226,228\n",
        )
        .unwrap()
    }

    const CODELIST: &str = "\
# product codelist
MV 1302 059W210 9G-EURO RM-1056 NDT EURO|NO_SD|2300
MV 1303 059W2Z0 IN-India RM-1056 NDT INDIA IN|NO_SD|2310

SV 2300 059W210 RM-1056 NDT EURO COMMON
SV 2301 059W210 RM-1056 NDT EURO GREECE,CYPRUS
SV 2310 059W2Z0 RM-1056 NDT INDIA INDIA
";

    #[test]
    fn test_markets_in_file_order() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let codelist = Codelist::parse(CODELIST, &resolver).unwrap();

        assert_eq!(codelist.markets.len(), 2);
        assert_eq!(codelist.markets[0].market_code, "059W210");
        assert_eq!(codelist.markets[0].country_set_label, "9G-EURO");
        assert_eq!(codelist.markets[0].region_tags, vec!["NDT", "EURO"]);
        assert_eq!(codelist.markets[0].sd_card, "NO_SD");
        assert_eq!(codelist.markets[1].market_code, "059W2Z0");
        assert_eq!(codelist.markets[1].region_tags, vec!["NDT", "INDIA", "IN"]);
    }

    #[test]
    fn test_subregions_attach_in_sv_order() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let codelist = Codelist::parse(CODELIST, &resolver).unwrap();

        let keys: Vec<&str> = codelist
            .subregions_of("059W210")
            .iter()
            .map(SubRegionKey::as_str)
            .collect();
        assert_eq!(keys, vec!["EURO_COMMON", "EURO_CY_GR"]);

        let keys: Vec<&str> = codelist
            .subregions_of("059W2Z0")
            .iter()
            .map(SubRegionKey::as_str)
            .collect();
        assert_eq!(keys, vec!["INDIA_IN"]);
    }

    #[test]
    fn test_subregion_ids() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let codelist = Codelist::parse(CODELIST, &resolver).unwrap();

        let key = SubRegionKey::from_canonical("EURO_CY_GR");
        assert_eq!(codelist.subregion_id(&key), Some("2301"));
    }

    #[test]
    fn test_sv_before_mv_still_attaches() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let contents = "\
SV 2310 059W2Z0 RM-1056 NDT INDIA INDIA
MV 1303 059W2Z0 IN-India RM-1056 NDT INDIA IN|NO_SD|2310
";
        let codelist = Codelist::parse(contents, &resolver).unwrap();
        assert_eq!(codelist.subregions_of("059W2Z0").len(), 1);
    }

    #[test]
    fn test_sv_for_unknown_market_is_skipped() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let contents = "SV 2310 0000000 RM-1056 NDT INDIA INDIA\n";
        let codelist = Codelist::parse(contents, &resolver).unwrap();
        assert!(codelist.markets.is_empty());
        assert_eq!(codelist.subregion_id(&SubRegionKey::from_canonical("INDIA_IN")), None);
    }

    #[test]
    fn test_unrecognized_record_marker_is_fatal() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let err = Codelist::parse("XX 1 2 3 4 5\n", &resolver).unwrap_err();
        assert!(matches!(err, CodelistError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_mv_without_annex_is_fatal() {
        let table = table();
        let resolver = SubRegionResolver::new(&table);
        let err =
            Codelist::parse("MV 1302 059W210 9G-EURO RM-1056 NDT EURO\n", &resolver).unwrap_err();
        assert!(matches!(err, CodelistError::MalformedLine { .. }));
    }
}
