//! EC2 client and response conversion
//!
//! Wraps the SDK client behind the [`DescribeInstances`] trait and converts
//! SDK instance shapes into [`InstanceRecord`]s. Instances the API returns
//! without an id or launch time are logged and dropped.

use crate::aws::context::AwsContext;
use crate::aws::error::classify_aws_error;
use crate::collector::{DescribeInstances, InstancePage, InstanceRecord, Reservation};
use anyhow::{Context, Result};
use aws_sdk_ec2::error::ProvideErrorMetadata;
use aws_sdk_ec2::{types, Client};
use chrono::DateTime;
use std::collections::BTreeMap;
use tracing::warn;

/// EC2 client scoped to one region
pub struct Ec2Client {
    client: Client,
    region: String,
}

impl Ec2Client {
    /// Create a new EC2 client (loads AWS config from environment)
    pub async fn new(region: &str) -> Result<Self> {
        let ctx = AwsContext::new(region).await;
        Ok(Self::from_context(&ctx))
    }

    /// Create an EC2 client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
            region: ctx.region().to_string(),
        }
    }
}

impl DescribeInstances for Ec2Client {
    async fn describe_page(&self, next_token: Option<String>) -> Result<InstancePage> {
        let response = self
            .client
            .describe_instances()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                let classified =
                    classify_aws_error(e.code(), e.message().unwrap_or("no error message"));
                anyhow::Error::from(e).context(classified)
            })
            .with_context(|| format!("Failed to describe instances in {}", self.region))?;

        let reservations = response
            .reservations()
            .iter()
            .map(|r| Reservation {
                instances: r.instances().iter().filter_map(convert_instance).collect(),
            })
            .collect();

        Ok(InstancePage {
            reservations,
            next_token: response.next_token().map(str::to_string),
        })
    }
}

/// Convert an SDK instance into an [`InstanceRecord`].
///
/// Returns `None` for instances missing an id or launch time; the record
/// model requires both and partial records would corrupt the sort.
fn convert_instance(instance: &types::Instance) -> Option<InstanceRecord> {
    let Some(instance_id) = instance.instance_id() else {
        warn!("Skipping instance without an instance id");
        return None;
    };

    let Some(launch_time) = instance.launch_time() else {
        warn!(instance_id, "Skipping instance without a launch time");
        return None;
    };
    let Some(launch_time) = DateTime::from_timestamp(launch_time.secs(), launch_time.subsec_nanos())
    else {
        warn!(instance_id, "Skipping instance with an out-of-range launch time");
        return None;
    };

    Some(InstanceRecord {
        instance_id: instance_id.to_string(),
        image_id: instance.image_id().unwrap_or_default().to_string(),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string())
            .unwrap_or_default(),
        monitoring_state: instance
            .monitoring()
            .and_then(|m| m.state())
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        launch_time,
        availability_zone: instance
            .placement()
            .and_then(|p| p.availability_zone())
            .map(str::to_string),
        private_ip: instance.private_ip_address().map(str::to_string),
        public_ip: instance.public_ip_address().map(str::to_string),
        tags: extract_tags(instance.tags()),
    })
}

fn extract_tags(tags: &[types::Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|t| Some((t.key()?.to_string(), t.value().unwrap_or_default().to_string())))
        .collect()
}
