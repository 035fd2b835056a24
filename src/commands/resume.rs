/// `resume` command: start an existing instance.
use tracing::info;

use super::CommandOutput;
use crate::cli::args::InstanceArgs;
use crate::gateway::{InstanceError, InstanceGateway};
use crate::types::{Action, TransitionOutput};

/// Run `ec2ctl resume`.
///
/// # Errors
///
/// Returns `InstanceError::InstanceNotFound` for an unknown id,
/// `InstanceError::InvalidStateTransition` when the instance cannot be
/// started from its current state, and the transport classes otherwise.
pub async fn run(
    args: &InstanceArgs,
    gateway: &dyn InstanceGateway,
) -> Result<CommandOutput, InstanceError> {
    let outcome = gateway.resume(&args.instance_id).await?;
    info!(instance_id = %args.instance_id, status = outcome.status_code, "instance starting");

    Ok(CommandOutput::Transitioned(TransitionOutput::from_outcome(
        &outcome,
        Action::Resume,
    )))
}
