/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod launch;
pub mod list;
pub mod resume;
pub mod suspend;

use crate::cli::args::Command;
use crate::gateway::{InstanceError, InstanceGateway};
use crate::types::{InstanceOutput, LaunchedOutput, TransitionOutput};

/// What a command produced, ready for the output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Launched(Vec<LaunchedOutput>),
    Transitioned(Vec<TransitionOutput>),
    Listed(Vec<InstanceOutput>),
}

/// Dispatch a parsed `Command` to its handler.
///
/// Each command issues exactly one gateway operation.
///
/// # Errors
///
/// Returns the gateway's classified `InstanceError` unchanged.
pub async fn dispatch(
    command: &Command,
    gateway: &dyn InstanceGateway,
) -> Result<CommandOutput, InstanceError> {
    match command {
        Command::Launch(args) => launch::run(args, gateway).await,
        Command::Resume(args) => resume::run(args, gateway).await,
        Command::Suspend(args) => suspend::run(args, gateway).await,
        Command::List => list::run(gateway).await,
    }
}
