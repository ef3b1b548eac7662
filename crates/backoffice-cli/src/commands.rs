use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum LifecycleCommand {
    /// Describe one status of an entity kind.
    Meta {
        #[command(flatten)]
        target: Target,
    },
    /// Every action of the kind with its permission and status verdict.
    Actions {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        grants: Grants,
    },
    /// Advisory check of a single transition.
    Can {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        action: String,
    },
    /// Rebuild the status timeline from an event history file.
    Timeline {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        events: PathBuf,
    },
    /// Validate the compiled tables against the backend transition rules.
    Check {
        #[arg(long)]
        authoritative: Option<PathBuf>,
    },
}

#[derive(Args)]
pub(crate) struct Target {
    #[arg(long)]
    pub(crate) kind: String,
    #[arg(long)]
    pub(crate) status: String,
}

#[derive(Args, Default)]
pub(crate) struct Grants {
    #[arg(long = "permission")]
    pub(crate) permissions: Vec<String>,
    #[arg(long = "role")]
    pub(crate) roles: Vec<String>,
}
