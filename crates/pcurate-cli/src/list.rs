use nu_ansi_term::Color::Yellow;
use pcurate_core::{
    curate::{Curator, ListKind, Selection},
    source::PackageSource,
    view::{render, DisplayRow, Lookup, ViewMode},
    PcurateResult,
};
use tracing::info;

use crate::utils::Colored;

/// Target of events carrying command output. Kept at INFO even with `--quiet`.
pub const OUTPUT_TARGET: &str = "pcurate::output";

fn print_json(row: &DisplayRow<'_>) {
    info!(
        target: OUTPUT_TARGET,
        name = %row.record.name,
        status = %row.status,
        origin = %row.origin,
        tag = %row.record.tag,
        description = %row.record.description,
        "{}",
        row.record.name
    );
}

fn lookup_line(lookup: &Lookup) -> String {
    match lookup {
        Lookup::Found(record) => DisplayRow::from(record).verbose_line(),
        Lookup::NoMatch(name) => {
            format!("package not explicitly installed ({})", Colored(Yellow, name))
        }
    }
}

pub fn list_packages<S: PackageSource>(
    curator: &Curator<S>,
    kind: ListKind,
    native: Option<bool>,
    mode: ViewMode,
    json: bool,
) -> PcurateResult<()> {
    let records = curator.list(kind, native)?;

    if json {
        for record in &records {
            print_json(&DisplayRow::from(record));
        }
        return Ok(());
    }

    for line in render(&records, mode) {
        info!(target: OUTPUT_TARGET, "{line}");
    }
    Ok(())
}

pub fn select_package<S: PackageSource>(
    curator: &Curator<S>,
    name: &str,
    selection: &Selection,
    json: bool,
) -> PcurateResult<()> {
    let lookup = curator.select(name, selection)?;
    match &lookup {
        Lookup::Found(record) if json => print_json(&DisplayRow::from(record)),
        _ => info!(target: OUTPUT_TARGET, "{}", lookup_line(&lookup)),
    }
    Ok(())
}
