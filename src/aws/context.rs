//! Shared AWS configuration context
//!
//! Loads the SDK configuration once per region and hands out service clients
//! built from it, so every client in a region shares the same credential
//! resolution and endpoint setup.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::fmt;
use std::sync::Arc;

/// Pre-loaded AWS configuration for one region
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
    region: String,
}

impl AwsContext {
    /// Load AWS configuration for a region from the default credential chain.
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            config: Arc::new(config),
            region: region.to_string(),
        }
    }

    /// The loaded SDK configuration
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// The region this context was loaded for
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Build an EC2 client from this context.
    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(&self.config)
    }
}

impl fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
