use std::process::ExitCode;

use clap::Parser;
use cli::Args;
use list::{list_packages, select_package};
use logging::setup_logging;
use pcurate_config::config::Config;
use pcurate_core::{
    curate::{Curator, ListKind, Selection},
    view::ViewMode,
    PcurateResult,
};
use tracing::debug;

mod cli;
mod list;
mod logging;
mod utils;

#[cfg(test)]
mod test_utils;

fn selection(args: &Args) -> Selection {
    if args.set {
        Selection::Set {
            tag: args.tag.clone(),
            description: args.description.clone(),
        }
    } else if args.unset {
        Selection::Unset
    } else {
        Selection::Show
    }
}

fn list_kind(args: &Args) -> Option<ListKind> {
    if args.curated {
        Some(ListKind::Curated)
    } else if args.regular {
        Some(ListKind::Regular)
    } else if args.missing {
        Some(ListKind::Missing)
    } else {
        None
    }
}

fn handle_cli() -> PcurateResult<()> {
    let args = Args::parse();

    setup_logging(&args);
    if args.no_color {
        utils::set_color(false);
    }

    let config = Config::load(args.config.as_deref())?;
    let curator = Curator::from_config(&config)?;
    debug!(db = %curator.db_path().display(), "using annotation store");

    let mode = if args.verbose {
        ViewMode::Verbose
    } else {
        ViewMode::Compact
    };

    match (&args.package, list_kind(&args)) {
        (Some(name), _) => select_package(&curator, name, &selection(&args), args.json),
        (None, Some(kind)) => {
            list_packages(&curator, kind, args.native_filter(), mode, args.json)
        }
        (None, None) => Ok(()),
    }
}

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match handle_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::FAILURE
        }
    }
}
