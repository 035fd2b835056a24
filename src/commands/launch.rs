/// `launch` command: create new instances from an image.
use tracing::info;

use super::CommandOutput;
use crate::cli::args::LaunchArgs;
use crate::gateway::{InstanceError, InstanceGateway};
use crate::types::LaunchedOutput;

/// Run `ec2ctl launch`.
///
/// Never retried: a second attempt after an ambiguous failure could create
/// duplicate instances.
///
/// # Errors
///
/// Returns `InstanceError::ProviderRequest` for an unknown image, key pair,
/// security group or subnet, and the transport classes when the provider
/// cannot be reached.
pub async fn run(
    args: &LaunchArgs,
    gateway: &dyn InstanceGateway,
) -> Result<CommandOutput, InstanceError> {
    let spec = args.to_spec();
    let ids = gateway.launch(&spec).await?;
    info!(count = ids.len(), image_id = %spec.image_id, "instances launched");

    Ok(CommandOutput::Launched(
        ids.into_iter()
            .map(|instance_id| LaunchedOutput { instance_id })
            .collect(),
    ))
}
