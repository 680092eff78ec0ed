//! Configuration for inventory runs

use crate::region::RegionKey;
use anyhow::Result;

/// Default path of the region list file
pub const DEFAULT_REGIONS_FILE: &str = "regions.txt";

/// Default per-region artifact path template
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "<region>.json";

/// Scope of a query-triggered refresh after a cache miss.
///
/// The default refreshes every configured region whenever any one region
/// misses; `MissedRegion` narrows the pass to the queried region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshScope {
    /// Refresh every configured region
    #[default]
    AllRegions,
    /// Refresh only the region whose lookup missed
    MissedRegion,
}

/// Configuration for the inventory service
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Regions to collect, in configuration order
    pub regions: Vec<RegionKey>,
    /// Artifact path template; `<region>` is replaced by the region name
    pub output_template: String,
    /// Scope of a query-triggered refresh
    pub refresh_scope: RefreshScope,
}

/// Check that the required credential environment variables are present.
///
/// The SDK's default credential chain does the actual resolution; this check
/// exists so a misconfigured environment fails before any collection starts.
pub fn validate_credentials() -> Result<()> {
    check_credential_values(
        std::env::var("AWS_ACCESS_KEY_ID").ok(),
        std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
    )
}

fn check_credential_values(
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
) -> Result<()> {
    let mut missing = Vec::new();
    if access_key_id.as_deref().unwrap_or("").is_empty() {
        missing.push("AWS_ACCESS_KEY_ID");
    }
    if secret_access_key.as_deref().unwrap_or("").is_empty() {
        missing.push("AWS_SECRET_ACCESS_KEY");
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing AWS credentials: set {} (AWS_SESSION_TOKEN is optional)",
            missing.join(" and ")
        );
    }

    Ok(())
}
