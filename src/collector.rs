//! Paginated instance collection
//!
//! Drives a DescribeInstances-shaped API to pagination exhaustion for one
//! region and accumulates every instance record. The API surface is a trait
//! so orchestration and tests can run against scripted pages instead of AWS.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::info;

/// A single instance as reported by DescribeInstances.
///
/// Immutable once built. Fields beyond the core identification set
/// (availability zone, addresses, tags) are pass-through provider data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecord {
    pub instance_id: String,
    pub image_id: String,
    pub instance_type: String,
    pub state: String,
    pub monitoring_state: String,
    pub launch_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// One reservation from a DescribeInstances response
#[derive(Debug, Clone, Default)]
pub struct Reservation {
    pub instances: Vec<InstanceRecord>,
}

/// One page of a DescribeInstances response.
///
/// `next_token` is an opaque continuation cursor; its absence means this was
/// the last page. The token is never persisted anywhere.
#[derive(Debug, Clone, Default)]
pub struct InstancePage {
    pub reservations: Vec<Reservation>,
    pub next_token: Option<String>,
}

/// Trait for paged DescribeInstances access.
///
/// Abstracts the EC2 client so collection logic can be unit tested against
/// scripted pages without hitting real AWS.
pub trait DescribeInstances: Send + Sync {
    /// Fetch one page, carrying the cursor from the previous response.
    fn describe_page(
        &self,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<InstancePage>> + Send;
}

/// Collect every instance visible in the client's region.
///
/// Issues requests until a response carries no continuation cursor. A page
/// with zero instances but a cursor continues the loop; there is no internal
/// page cap, so an API that never terminates its cursor chain is the
/// caller's problem. Any API error propagates immediately and the records
/// accumulated so far are discarded with it.
pub async fn collect_instances<C: DescribeInstances>(client: &C) -> Result<Vec<InstanceRecord>> {
    let mut records = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = client.describe_page(next_token).await?;

        for reservation in page.reservations {
            for instance in reservation.instances {
                let age_days = (Utc::now() - instance.launch_time).num_days();
                info!(
                    instance_id = %instance.instance_id,
                    image_id = %instance.image_id,
                    instance_type = %instance.instance_type,
                    state = %instance.state,
                    monitoring = %instance.monitoring_state,
                    launch_time = %instance.launch_time,
                    age_days,
                    "Found instance"
                );
                records.push(instance);
            }
        }

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    Ok(records)
}
