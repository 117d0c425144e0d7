use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Track curated (explicitly kept) pacman packages",
    arg_required_else_help = true,
    group(
        ArgGroup::new("target")
            .required(true)
            .args(["package", "curated", "regular", "missing"])
    ),
    group(ArgGroup::new("origin").args(["native", "foreign"]))
)]
pub struct Args {
    /// Package to show, or to modify with --set / --unset
    #[arg(value_name = "PACKAGE_NAME")]
    pub package: Option<String>,

    /// Mark the package as curated
    #[arg(short, long, requires = "package", conflicts_with = "unset")]
    pub set: bool,

    /// Demote the package back to a regular one
    #[arg(short, long, requires = "package")]
    pub unset: bool,

    /// Tag to store with --set
    #[arg(short, long, requires = "set")]
    pub tag: Option<String>,

    /// Description to store with --set
    #[arg(short, long = "desc", visible_alias = "description", requires = "set")]
    pub description: Option<String>,

    /// List curated packages
    #[arg(short, long)]
    pub curated: bool,

    /// List regular (non-curated) packages
    #[arg(short, long, visible_alias = "normal", short_alias = 'n')]
    pub regular: bool,

    /// List curated packages that are no longer installed
    #[arg(short, long)]
    pub missing: bool,

    /// Only native packages
    #[arg(short = 'a', long, conflicts_with = "missing")]
    pub native: bool,

    /// Only foreign packages
    #[arg(short, long, conflicts_with = "missing")]
    pub foreign: bool,

    /// Show status, origin, tag and description
    #[arg(short, long)]
    pub verbose: bool,

    /// Output in JSON
    #[arg(long)]
    pub json: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Log verbosity: -D for debug, -DD for trace
    #[arg(short = 'D', long, action = ArgAction::Count)]
    pub debug: u8,

    /// Disable colored log prefixes
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file to use
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// `Some(true)` for native only, `Some(false)` for foreign only.
    pub fn native_filter(&self) -> Option<bool> {
        if self.native {
            Some(true)
        } else if self.foreign {
            Some(false)
        } else {
            None
        }
    }
}
