/// `suspend` command: stop a running instance.
use tracing::info;

use super::CommandOutput;
use crate::cli::args::InstanceArgs;
use crate::gateway::{InstanceError, InstanceGateway};
use crate::types::{Action, TransitionOutput};

/// Run `ec2ctl suspend`.
///
/// # Errors
///
/// Same classes as `resume`.
pub async fn run(
    args: &InstanceArgs,
    gateway: &dyn InstanceGateway,
) -> Result<CommandOutput, InstanceError> {
    let outcome = gateway.suspend(&args.instance_id).await?;
    info!(instance_id = %args.instance_id, status = outcome.status_code, "instance stopping");

    Ok(CommandOutput::Transitioned(TransitionOutput::from_outcome(
        &outcome,
        Action::Suspend,
    )))
}
