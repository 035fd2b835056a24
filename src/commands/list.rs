/// `list` command: list every instance visible to the caller.
use super::CommandOutput;
use crate::gateway::{InstanceError, InstanceGateway};
use crate::types::InstanceOutput;

/// Run `ec2ctl list`.
///
/// An account with no instances yields an empty list, not an error.
///
/// # Errors
///
/// Returns `InstanceError` when the listing cannot be fetched.
pub async fn run(gateway: &dyn InstanceGateway) -> Result<CommandOutput, InstanceError> {
    let listing = gateway.list_all().await?;
    Ok(CommandOutput::Listed(
        listing.map(InstanceOutput::from).collect(),
    ))
}
