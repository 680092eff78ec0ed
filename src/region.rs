//! Region identifiers and the region configuration source
//!
//! A [`RegionKey`] can only be constructed through [`RegionKey::parse`], so
//! every key held by the inventory names a real AWS region. The region list
//! itself comes from a plain text file of comma-separated names.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

/// AWS regions accepted by this tool
const KNOWN_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];

/// A validated AWS region identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey(String);

impl RegionKey {
    /// Parse a region name, accepting surrounding whitespace.
    ///
    /// Fails for names not in the known region table, before any network
    /// call is attempted with them.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if KNOWN_REGIONS.contains(&name) {
            Ok(Self(name.to_string()))
        } else {
            anyhow::bail!("Unknown region: '{name}'")
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-separated region list, trimming whitespace around entries.
///
/// Empty fragments (e.g. a trailing comma) are dropped; an empty result is
/// an error because a collection pass over zero regions does nothing.
pub fn parse_region_list(raw: &str) -> Result<Vec<RegionKey>> {
    let regions = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RegionKey::parse)
        .collect::<Result<Vec<_>>>()?;

    if regions.is_empty() {
        anyhow::bail!("Region list is empty");
    }

    Ok(regions)
}

/// Load the configured regions from a plain text file.
pub fn load_regions(path: &Path) -> Result<Vec<RegionKey>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read region file {}", path.display()))?;
    parse_region_list(&raw).with_context(|| format!("Invalid region file {}", path.display()))
}
