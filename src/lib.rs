//! instance-inventory - EC2 instance inventory across regions
//!
//! This crate collects every EC2 instance visible in a set of configured
//! regions, orders each region's instances by launch time, caches the sorted
//! lists in memory, and persists them as per-region JSON artifacts.
//!
//! ## Modules
//!
//! - [`aws`]: AWS SDK client wrappers and error classification
//! - [`collector`]: paginated DescribeInstances collection
//! - [`config`]: run configuration and credential validation
//! - [`inventory`]: region cache, query logic, and collection passes
//! - [`region`]: validated region identifiers and the region list source
//! - [`snapshot`]: launch-time ordering and artifact persistence

pub mod aws;
pub mod collector;
pub mod config;
pub mod inventory;
pub mod region;
pub mod snapshot;
