/// In-memory gateway for tests.
///
/// Mirrors the provider's behaviour closely enough to exercise the command
/// layer: failures are raised as EC2 error codes and pass through the same
/// [`classify`] the EC2 gateway uses.
use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::{InstanceError, ProviderSignal, classify};
use super::instance::{
    InstanceListing, InstanceRecord, InstanceState, LaunchSpec, OperationOutcome,
    StateTransition,
};
use super::InstanceGateway;

#[derive(Default)]
struct Inner {
    instances: BTreeMap<String, InstanceRecord>,
    next_id: u64,
    launch_requests: Vec<LaunchSpec>,
    calls: usize,
    /// Number of upcoming `list_all` calls that still see the old snapshot.
    stale_reads: usize,
    snapshot: Vec<InstanceRecord>,
}

#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
    images: Vec<String>,
    missing_key_pairs: Vec<String>,
    missing_security_groups: Vec<String>,
    missing_subnets: Vec<String>,
    unreachable: bool,
}

impl MemoryGateway {
    /// Gateway that accepts launches from the given image ids.
    pub fn with_images(images: &[&str]) -> Self {
        Self {
            images: images.iter().map(|s| (*s).to_owned()).collect(),
            ..Self::default()
        }
    }

    /// Reject launches that name this key pair.
    pub fn without_key_pair(mut self, key_name: &str) -> Self {
        self.missing_key_pairs.push(key_name.to_owned());
        self
    }

    /// Reject launches that name this security group.
    pub fn without_security_group(mut self, group_id: &str) -> Self {
        self.missing_security_groups.push(group_id.to_owned());
        self
    }

    /// Reject launches into this subnet.
    pub fn without_subnet(mut self, subnet_id: &str) -> Self {
        self.missing_subnets.push(subnet_id.to_owned());
        self
    }

    /// Gateway whose every call fails as if the endpoint were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Seed an instance in the given state.
    pub fn insert(&self, instance_id: &str, state: InstanceState) {
        let mut inner = self.inner.lock().unwrap();
        inner.instances.insert(
            instance_id.to_owned(),
            InstanceRecord {
                instance_id: instance_id.to_owned(),
                state,
                instance_type: "t2.micro".to_owned(),
                launch_time: Some(Utc::now()),
            },
        );
    }

    /// Make the next `reads` list calls return the inventory as it is now.
    pub fn lag_reads(&self, reads: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot = inner.instances.values().cloned().collect();
        inner.stale_reads = reads;
    }

    pub fn launch_requests(&self) -> Vec<LaunchSpec> {
        self.inner.lock().unwrap().launch_requests.clone()
    }

    /// Total gateway calls made, successful or not.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    fn check_reachable(&self) -> Result<(), InstanceError> {
        if self.unreachable {
            return Err(classify(
                ProviderSignal::Unreachable("connection refused".to_owned()),
                None,
            ));
        }
        Ok(())
    }

    /// First launch parameter the provider would refuse, as an EC2 error.
    fn rejected_launch(&self, spec: &LaunchSpec) -> Option<ProviderSignal> {
        if !self.images.contains(&spec.image_id) {
            return Some(ProviderSignal::service(
                "InvalidAMIID.NotFound",
                &format!("The image id '[{}]' does not exist", spec.image_id),
            ));
        }
        if self.missing_key_pairs.contains(&spec.key_name) {
            return Some(ProviderSignal::service(
                "InvalidKeyPair.NotFound",
                &format!("The key pair '{}' does not exist", spec.key_name),
            ));
        }
        if self.missing_security_groups.contains(&spec.security_group_id) {
            return Some(ProviderSignal::service(
                "InvalidGroup.NotFound",
                &format!("The security group '{}' does not exist", spec.security_group_id),
            ));
        }
        if self.missing_subnets.contains(&spec.subnet_id) {
            return Some(ProviderSignal::service(
                "InvalidSubnetID.NotFound",
                &format!("The subnet ID '{}' does not exist", spec.subnet_id),
            ));
        }
        None
    }

    fn transition(
        &self,
        instance_id: &str,
        allowed_from: &[InstanceState],
        target: InstanceState,
    ) -> Result<OperationOutcome, InstanceError> {
        self.inner.lock().unwrap().calls += 1;
        self.check_reachable()?;

        if !instance_id.starts_with("i-") {
            return Err(classify(
                ProviderSignal::service(
                    "InvalidInstanceID.Malformed",
                    &format!("Invalid id: \"{instance_id}\""),
                ),
                Some(instance_id),
            ));
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.instances.get_mut(instance_id) else {
            return Err(classify(
                ProviderSignal::service(
                    "InvalidInstanceID.NotFound",
                    &format!("The instance ID '{instance_id}' does not exist"),
                ),
                Some(instance_id),
            ));
        };

        let previous = record.state;
        if previous != target && !allowed_from.contains(&previous) {
            return Err(classify(
                ProviderSignal::service(
                    "IncorrectInstanceState",
                    &format!("The instance '{instance_id}' is not in a state from which it can be moved to {target}"),
                ),
                Some(instance_id),
            ));
        }
        record.state = target;

        Ok(OperationOutcome {
            status_code: 200,
            instance_ids: vec![instance_id.to_owned()],
            transitions: vec![StateTransition {
                instance_id: instance_id.to_owned(),
                previous,
                current: target,
            }],
        })
    }
}

#[async_trait]
impl InstanceGateway for MemoryGateway {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Vec<String>, InstanceError> {
        self.inner.lock().unwrap().calls += 1;
        self.check_reachable()?;

        if let Some(signal) = self.rejected_launch(spec) {
            return Err(classify(signal, None));
        }

        let mut inner = self.inner.lock().unwrap();
        inner.launch_requests.push(spec.clone());
        let mut ids = Vec::with_capacity(usize::from(spec.count));
        for _ in 0..spec.count {
            inner.next_id += 1;
            let id = format!("i-{:017x}", inner.next_id);
            inner.instances.insert(
                id.clone(),
                InstanceRecord {
                    instance_id: id.clone(),
                    state: InstanceState::Pending,
                    instance_type: spec.instance_type.clone(),
                    launch_time: Some(Utc::now()),
                },
            );
            ids.push(id);
        }
        Ok(ids)
    }

    async fn resume(&self, instance_id: &str) -> Result<OperationOutcome, InstanceError> {
        self.transition(
            instance_id,
            &[InstanceState::Stopped, InstanceState::Pending],
            InstanceState::Running,
        )
    }

    async fn suspend(&self, instance_id: &str) -> Result<OperationOutcome, InstanceError> {
        self.transition(
            instance_id,
            &[InstanceState::Running, InstanceState::Pending, InstanceState::Stopping],
            InstanceState::Stopped,
        )
    }

    async fn list_all(&self) -> Result<InstanceListing, InstanceError> {
        self.inner.lock().unwrap().calls += 1;
        self.check_reachable()?;

        let mut inner = self.inner.lock().unwrap();
        if inner.stale_reads > 0 {
            inner.stale_reads -= 1;
            return Ok(inner.snapshot.clone().into_iter());
        }
        Ok(inner.instances.values().cloned().collect::<Vec<_>>().into_iter())
    }
}
