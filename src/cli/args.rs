/// CLI argument definitions via clap derive.
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::gateway::ec2::StaticCredentials;
use crate::gateway::{DEFAULT_INSTANCE_TYPE, LaunchSpec, ProviderConfig};

/// ec2ctl: launch, start, stop and list AWS EC2 instances.
#[derive(Debug, Parser)]
#[command(
    name = "ec2ctl",
    about = "Launch, start, stop and list AWS EC2 instances from the CLI",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Log provider calls to stderr. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Provider connection and credential settings.
#[derive(Debug, Args)]
pub struct ProviderArgs {
    /// AWS region. Defaults to the SDK's region chain.
    #[arg(long, global = true, env = "AWS_REGION", value_name = "REGION")]
    pub region: Option<String>,

    /// Named profile from the shared AWS config files.
    #[arg(long, global = true, env = "AWS_PROFILE", value_name = "NAME")]
    pub profile: Option<String>,

    /// Access key id. Overrides the profile and default chain.
    #[arg(
        long,
        global = true,
        env = "AWS_ACCESS_KEY_ID",
        hide_env_values = true,
        requires = "secret_access_key",
        value_name = "KEY_ID"
    )]
    pub access_key_id: Option<String>,

    /// Secret access key paired with --access-key-id.
    #[arg(
        long,
        global = true,
        env = "AWS_SECRET_ACCESS_KEY",
        hide_env_values = true,
        requires = "access_key_id",
        value_name = "SECRET"
    )]
    pub secret_access_key: Option<String>,

    /// Session token for temporary credentials.
    #[arg(
        long,
        global = true,
        env = "AWS_SESSION_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub session_token: Option<String>,

    /// Custom EC2 endpoint, e.g. a local emulator.
    #[arg(long, global = true, env = "EC2CTL_ENDPOINT_URL", value_name = "URL")]
    pub endpoint_url: Option<String>,
}

impl ProviderArgs {
    /// Collect the flags into a provider configuration.
    #[must_use]
    pub fn to_config(&self) -> ProviderConfig {
        let credentials = match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                session_token: self.session_token.clone(),
            }),
            _ => None,
        };
        ProviderConfig {
            region: self.region.clone(),
            profile: self.profile.clone(),
            credentials,
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Line-oriented human-readable text.
    #[default]
    Text,
    /// Aligned table with headers.
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch new instances from an image.
    #[command(alias = "start-instances")]
    Launch(LaunchArgs),
    /// Start an existing, stopped instance.
    #[command(visible_alias = "start", alias = "start-existing-instance")]
    Resume(InstanceArgs),
    /// Stop a running instance.
    #[command(visible_alias = "stop", alias = "stop-instances")]
    Suspend(InstanceArgs),
    /// List all instances visible to the current credentials.
    #[command(visible_alias = "ls", alias = "list-instances")]
    List,
}

/// Arguments for `ec2ctl launch`.
#[derive(Debug, Parser)]
pub struct LaunchArgs {
    /// AMI image id.
    #[arg(long, value_name = "AMI_ID")]
    pub image_id: String,

    /// Instance type.
    #[arg(long, value_name = "TYPE", default_value = DEFAULT_INSTANCE_TYPE)]
    pub instance_type: String,

    /// Key pair name.
    #[arg(long, value_name = "NAME")]
    pub key_name: String,

    /// Security group id.
    #[arg(long, value_name = "SG_ID")]
    pub security_group: String,

    /// Subnet id.
    #[arg(long, value_name = "SUBNET_ID")]
    pub subnet_id: String,

    /// Number of instances to launch.
    #[arg(long, value_name = "N", default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub count: u16,
}

impl LaunchArgs {
    #[must_use]
    pub fn to_spec(&self) -> LaunchSpec {
        LaunchSpec {
            image_id: self.image_id.clone(),
            instance_type: self.instance_type.clone(),
            key_name: self.key_name.clone(),
            security_group_id: self.security_group.clone(),
            subnet_id: self.subnet_id.clone(),
            count: self.count,
        }
    }
}

/// Arguments for commands that target one instance.
#[derive(Debug, Parser)]
pub struct InstanceArgs {
    /// EC2 instance id.
    #[arg(long, value_name = "INSTANCE_ID")]
    pub instance_id: String,
}
