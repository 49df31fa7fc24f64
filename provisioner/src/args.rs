use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "provisioner")]
#[command(author, version, about = "Cluster profile helper for the Vagrant kubeadm machines", long_about = None)]
pub struct Cli {
    /// Verbose logging
    #[arg(long, short, action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check the profile and the locally built Kubernetes artifacts
    Check,
    /// List machines in provisioning order
    Ls,
    /// Print the template context of a machine
    Context(ContextArgs),
    /// Print the Kubernetes version of the local checkout
    Version(VersionArgs),
}

#[derive(Debug, Args)]
pub struct ContextArgs {
    /// Machine name as written in the profile
    pub machine: String,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Arguments of the surrounding vagrant invocation
    #[arg(last = true)]
    pub vagrant_args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Print the full git version instead of the release
    #[arg(long, action = ArgAction::SetTrue)]
    pub full: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}
