//! Region cache, query logic, and collection passes
//!
//! The inventory holds one sorted instance list per region behind an async
//! RwLock. Collection passes replace entries wholesale; a failed region
//! keeps whatever entry it had. Cache misses trigger a refresh pass whose
//! scope is configurable, and concurrent misses coalesce into a single pass
//! through the refresh guard.

use crate::collector::{collect_instances, DescribeInstances, InstanceRecord};
use crate::config::{InventoryConfig, RefreshScope};
use crate::region::RegionKey;
use crate::snapshot::{artifact_path, sort_by_launch_time, write_snapshot};
use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

/// Builds a DescribeInstances client for a region.
///
/// The factory is a seam between orchestration and the AWS SDK; tests plug
/// in scripted factories, production uses [`AwsClientFactory`].
pub trait ClientFactory: Send + Sync {
    type Client: DescribeInstances;

    fn client_for(&self, region: &RegionKey) -> impl Future<Output = Result<Self::Client>> + Send;
}

impl<F: ClientFactory> ClientFactory for Arc<F> {
    type Client = F::Client;

    fn client_for(&self, region: &RegionKey) -> impl Future<Output = Result<Self::Client>> + Send {
        (**self).client_for(region)
    }
}

/// Factory producing real SDK-backed clients
#[derive(Debug, Default)]
pub struct AwsClientFactory;

impl ClientFactory for AwsClientFactory {
    type Client = crate::aws::Ec2Client;

    async fn client_for(&self, region: &RegionKey) -> Result<Self::Client> {
        crate::aws::Ec2Client::new(region.as_str()).await
    }
}

/// Outcome of one collection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Regions whose entry was replaced
    pub collected: usize,
    /// Regions whose collection failed; their previous entry is retained
    pub failed: usize,
}

/// In-memory inventory of instances across configured regions
pub struct Inventory<F: ClientFactory> {
    config: InventoryConfig,
    factory: F,
    cache: RwLock<HashMap<RegionKey, Arc<[InstanceRecord]>>>,
    refresh_guard: Mutex<()>,
}

impl<F: ClientFactory> Inventory<F> {
    pub fn new(config: InventoryConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            cache: RwLock::new(HashMap::new()),
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Run one collection pass at startup.
    pub async fn bootstrap(&self) -> PassSummary {
        self.collect_all().await
    }

    /// Collect every configured region.
    pub async fn collect_all(&self) -> PassSummary {
        self.collect_regions(&self.config.regions).await
    }

    /// Collect the given regions concurrently.
    ///
    /// Each region is independent: one region failing neither stops the
    /// others nor touches its own previous cache entry.
    pub async fn collect_regions(&self, regions: &[RegionKey]) -> PassSummary {
        let passes = regions.iter().map(|region| self.collect_region(region));
        let results = futures::future::join_all(passes).await;

        let mut summary = PassSummary::default();
        for (region, result) in regions.iter().zip(results) {
            match result {
                Ok(_) => summary.collected += 1,
                Err(e) => {
                    let chain = format!("{e:#}");
                    error!(%region, error = %chain, "Region collection failed");
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    async fn collect_region(&self, region: &RegionKey) -> Result<usize> {
        info!(%region, "Collecting instances");
        let client = self.factory.client_for(region).await?;

        let mut records = collect_instances(&client).await?;
        sort_by_launch_time(&mut records);
        let count = records.len();
        let records: Arc<[InstanceRecord]> = records.into();

        // Cache first: the in-memory entry must reflect this pass even if
        // the artifact cannot be written.
        self.cache
            .write()
            .await
            .insert(region.clone(), Arc::clone(&records));
        info!(%region, count, "Region inventory updated");

        let path = artifact_path(&self.config.output_template, region.as_str());
        if let Err(e) = write_snapshot(&path, &records) {
            let chain = format!("{e:#}");
            warn!(%region, error = %chain, "Failed to persist snapshot; cache entry retained");
        }

        Ok(count)
    }

    /// The sorted instances for a region, refreshing on a cache miss.
    ///
    /// A miss runs a collection pass scoped per the configuration, then the
    /// cache is consulted again; `None` means the region has no entry even
    /// after the refresh. Concurrent misses share one pass: whoever acquires
    /// the refresh guard first collects, later waiters find the entry on
    /// their second look.
    pub async fn sorted_instances(&self, region: &RegionKey) -> Option<Arc<[InstanceRecord]>> {
        if let Some(records) = self.cache.read().await.get(region) {
            return Some(Arc::clone(records));
        }

        let _guard = self.refresh_guard.lock().await;
        if let Some(records) = self.cache.read().await.get(region) {
            return Some(Arc::clone(records));
        }

        match self.config.refresh_scope {
            RefreshScope::AllRegions => {
                self.collect_regions(&self.config.regions).await;
            }
            RefreshScope::MissedRegion => {
                if self.config.regions.contains(region) {
                    self.collect_regions(std::slice::from_ref(region)).await;
                } else {
                    warn!(%region, "Region is not configured; skipping refresh");
                }
            }
        }

        self.cache.read().await.get(region).map(Arc::clone)
    }

    /// The cached entry for a region, without triggering a refresh.
    pub async fn cached_instances(&self, region: &RegionKey) -> Option<Arc<[InstanceRecord]>> {
        self.cache.read().await.get(region).map(Arc::clone)
    }
}
