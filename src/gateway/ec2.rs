/// EC2-backed gateway built on the AWS SDK.
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, ConfigLoader};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::config::{Credentials, Region};
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::primitives::DateTime as SdkDateTime;
use aws_sdk_ec2::types::{Instance, InstanceStateChange, InstanceType};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::errors::{InstanceError, ProviderSignal, classify};
use super::instance::{
    InstanceListing, InstanceRecord, InstanceState, LaunchSpec, OperationOutcome,
    StateTransition,
};
use super::InstanceGateway;

/// Status reported for a call the SDK returned as successful.
const HTTP_OK: u16 = 200;

/// Name attached to credentials supplied on the command line or environment.
const STATIC_CREDENTIALS_SOURCE: &str = "ec2ctl";

/// Explicit key pair that overrides the SDK's default credential chain.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Everything needed to reach the provider. Built once per invocation.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub credentials: Option<StaticCredentials>,
    pub endpoint_url: Option<String>,
}

/// Gateway over the EC2 API.
pub struct Ec2Gateway {
    client: Client,
}

impl Ec2Gateway {
    /// Resolve SDK configuration and build a client.
    ///
    /// Missing or invalid credentials are not detected here; they surface as a
    /// classified error on the first request.
    pub async fn connect(config: &ProviderConfig) -> Self {
        let sdk_config = loader(config).load().await;
        debug!(
            region = ?sdk_config.region().map(ToString::to_string),
            profile = ?config.profile,
            static_credentials = config.credentials.is_some(),
            "provider configuration resolved"
        );

        Self {
            client: Client::new(&sdk_config),
        }
    }

    #[cfg(test)]
    fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// SDK config loader for one invocation. Retries are disabled: a repeated
/// `run_instances` without a client token can provision twice.
fn loader(config: &ProviderConfig) -> ConfigLoader {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(creds) = &config.credentials {
        loader = loader.credentials_provider(Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            creds.session_token.clone(),
            None,
            STATIC_CREDENTIALS_SOURCE,
        ));
    }
    if let Some(url) = &config.endpoint_url {
        loader = loader.endpoint_url(url);
    }
    loader
}

#[async_trait]
impl InstanceGateway for Ec2Gateway {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Vec<String>, InstanceError> {
        let count = i32::from(spec.count);
        debug!(image_id = %spec.image_id, count, "run_instances");

        let output = self
            .client
            .run_instances()
            .image_id(&spec.image_id)
            .instance_type(InstanceType::from(spec.instance_type.as_str()))
            .key_name(&spec.key_name)
            .security_group_ids(&spec.security_group_id)
            .subnet_id(&spec.subnet_id)
            .min_count(count)
            .max_count(count)
            .send()
            .await
            .map_err(|e| fail(&e, None))?;

        Ok(output
            .instances()
            .iter()
            .filter_map(Instance::instance_id)
            .map(str::to_owned)
            .collect())
    }

    async fn resume(&self, instance_id: &str) -> Result<OperationOutcome, InstanceError> {
        debug!(instance_id, "start_instances");

        let output = self
            .client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| fail(&e, Some(instance_id)))?;

        Ok(outcome(instance_id, output.starting_instances()))
    }

    async fn suspend(&self, instance_id: &str) -> Result<OperationOutcome, InstanceError> {
        debug!(instance_id, "stop_instances");

        let output = self
            .client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| fail(&e, Some(instance_id)))?;

        Ok(outcome(instance_id, output.stopping_instances()))
    }

    async fn list_all(&self) -> Result<InstanceListing, InstanceError> {
        debug!("describe_instances");

        let mut pages = self.client.describe_instances().into_paginator().send();
        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| fail(&e, None))?;
            for reservation in page.reservations() {
                records.extend(reservation.instances().iter().map(record_of));
            }
        }

        debug!(count = records.len(), "instances listed");
        Ok(records.into_iter())
    }
}

/// Reduce an SDK error to the signal the classifier understands.
fn signal_of<E, R>(err: &SdkError<E, R>) -> ProviderSignal
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::TimeoutError(_) => ProviderSignal::TimedOut(DisplayErrorContext(err).to_string()),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            ProviderSignal::TimedOut(DisplayErrorContext(err).to_string())
        }
        SdkError::DispatchFailure(failure) if failure.is_io() => {
            ProviderSignal::Unreachable(DisplayErrorContext(err).to_string())
        }
        SdkError::ServiceError(context) => {
            let service = context.err();
            ProviderSignal::Service {
                code: service.code().map(str::to_owned),
                message: service.message().unwrap_or("no message").to_owned(),
            }
        }
        _ => ProviderSignal::Other(DisplayErrorContext(err).to_string()),
    }
}

fn fail<E, R>(err: &SdkError<E, R>, instance_id: Option<&str>) -> InstanceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let error = classify(signal_of(err), instance_id);
    debug!(code = error.code(), instance_id = ?instance_id, "provider call failed: {error}");
    error
}

fn outcome(instance_id: &str, changes: &[InstanceStateChange]) -> OperationOutcome {
    let transitions: Vec<StateTransition> = changes
        .iter()
        .map(|c| StateTransition {
            instance_id: c.instance_id().unwrap_or(instance_id).to_owned(),
            previous: state_of(c.previous_state()),
            current: state_of(c.current_state()),
        })
        .collect();

    OperationOutcome {
        status_code: HTTP_OK,
        instance_ids: vec![instance_id.to_owned()],
        transitions,
    }
}

fn state_of(state: Option<&aws_sdk_ec2::types::InstanceState>) -> InstanceState {
    state
        .and_then(|s| s.name())
        .map_or(InstanceState::Unknown, |n| InstanceState::from_name(n.as_str()))
}

fn record_of(instance: &Instance) -> InstanceRecord {
    InstanceRecord {
        instance_id: instance.instance_id().unwrap_or_default().to_owned(),
        state: state_of(instance.state()),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_owned())
            .unwrap_or_default(),
        launch_time: instance.launch_time().and_then(to_utc),
    }
}

fn to_utc(time: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
