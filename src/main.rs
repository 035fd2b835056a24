#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! ec2ctl: launch, start, stop and list AWS EC2 instances.

mod cli;
mod commands;
mod gateway;
mod types;

use clap::Parser;

use cli::{Cli, OutputCtx, write_error, write_output};
use gateway::Ec2Gateway;
use types::ErrorOutput;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    cli::logging::init(cli.debug);

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header);
    let gateway = Ec2Gateway::connect(&cli.provider.to_config()).await;

    match commands::dispatch(&cli.command, &gateway).await {
        Ok(output) => {
            if let Err(e) = write_output(&output, &ctx) {
                eprintln!("Error [output]: Failed to write output: {e}");
                std::process::exit(1);
            }
        }
        Err(err) => {
            let error_output = ErrorOutput::from_instance_error(&err);
            write_error(&error_output, cli.output, cli.json);
            std::process::exit(err.exit_code());
        }
    }
}
