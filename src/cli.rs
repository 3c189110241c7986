//! Command-line surface. Parsing only; business logic lives in
//! [`crate::service`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::error::{Result, VeilError};
use crate::provider::EntityKind;
use crate::resolver::Resolve;

#[derive(Debug, Parser)]
#[command(name = "veil", version, about = "Disguise-identity resolution and application engine")]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Take on a name, with the matching skin resolved upstream
    Username {
        /// Requested display name (also the skin lookup key)
        name: String,

        /// Entity to disguise (defaults to [provider].default_target)
        #[arg(long)]
        target: Option<String>,

        /// Rename only; skip skin resolution
        #[arg(long)]
        no_resolve: bool,
    },

    /// Keep the current name, take the skin of another name or identifier
    Skinname {
        /// Skin lookup key (name, hyphenated identifier, or 32-hex)
        name: String,

        /// Entity to disguise (defaults to [provider].default_target)
        #[arg(long)]
        target: Option<String>,
    },

    /// Take on a non-player entity form
    Entity {
        /// Entity kind, e.g. "zombie"
        kind: String,

        /// Entity to disguise (defaults to [provider].default_target)
        #[arg(long)]
        target: Option<String>,
    },

    /// Clear any active disguise
    Clear {
        /// Entity to clear (defaults to [provider].default_target)
        #[arg(long)]
        target: Option<String>,
    },

    /// Resolve a skin record without applying it
    Resolve {
        /// Lookup key (name, hyphenated identifier, or 32-hex)
        input: String,
    },
}

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Username {
            name,
            target,
            no_resolve,
        } => {
            let target = ctx.target(target.as_deref())?;
            ctx.service
                .apply(&target, name, Some(name.as_str()), !no_resolve);
            ctx.scheduler.run_until_idle();
        }
        Commands::Skinname { name, target } => {
            let target = ctx.target(target.as_deref())?;
            let current_name = target.name.clone();
            ctx.service
                .apply(&target, &current_name, Some(name.as_str()), true);
            ctx.scheduler.run_until_idle();
        }
        Commands::Entity { kind, target } => {
            let kind = EntityKind::parse(kind)
                .ok_or_else(|| VeilError::InvalidEntityKind(kind.clone()))?;
            let target = ctx.target(target.as_deref())?;
            ctx.service.apply_entity(&target, &kind);
        }
        Commands::Clear { target } => {
            let target = ctx.target(target.as_deref())?;
            ctx.service.reset(&target);
        }
        Commands::Resolve { input } => match ctx.resolver.resolve(input) {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("no record found for {input}"),
        },
    }
    Ok(())
}
