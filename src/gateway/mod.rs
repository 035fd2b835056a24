/// Instance gateway: the capability set the commands are written against.
pub mod ec2;
pub mod errors;
pub mod instance;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

pub use ec2::{Ec2Gateway, ProviderConfig};
pub use errors::InstanceError;
pub use instance::{
    DEFAULT_INSTANCE_TYPE, InstanceListing, InstanceRecord, InstanceState, LaunchSpec,
    OperationOutcome,
};

/// Lifecycle operations over a cloud compute provider.
///
/// Implementations issue exactly one provider request per call (pagination
/// aside) and never retry. Failures are already classified on return.
#[async_trait]
pub trait InstanceGateway: Send + Sync {
    /// Create `spec.count` instances and return their ids.
    async fn launch(&self, spec: &LaunchSpec) -> Result<Vec<String>, InstanceError>;

    /// Start an existing instance.
    async fn resume(&self, instance_id: &str) -> Result<OperationOutcome, InstanceError>;

    /// Stop a running instance.
    async fn suspend(&self, instance_id: &str) -> Result<OperationOutcome, InstanceError>;

    /// Every instance visible to the caller, flattened across reservations.
    async fn list_all(&self) -> Result<InstanceListing, InstanceError>;
}
