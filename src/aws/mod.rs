//! AWS SDK integration

pub mod context;
pub mod ec2;
pub mod error;

pub use context::AwsContext;
pub use ec2::Ec2Client;
pub use error::{classify_aws_error, AwsError};
