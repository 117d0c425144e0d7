//! Rebuilds the non-curated part of the store from the package manager.

use tracing::{debug, trace};

use crate::{
    record::{PackagePatch, PackageRecord},
    source::PackageSource,
    store::Store,
    PcurateResult,
};

/// Counters describing one repopulation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepopulateReport {
    /// Non-curated rows deleted before rebuilding.
    pub purged: usize,
    /// Installed packages inserted as regular rows.
    pub inserted: usize,
    /// Existing rows whose native flag was refreshed.
    pub refreshed: usize,
}

/// Reconciles `store` with the packages currently installed.
///
/// All non-curated rows are dropped and rebuilt from the listing. Curated rows
/// stay; only their `native` flag follows the package manager, tag and
/// description are left alone. Curated packages that are no longer installed
/// are kept as well.
///
/// Both listings are fetched before the store is touched and the rebuild runs
/// in a single transaction, so a listing failure leaves the store unchanged.
pub fn repopulate<S>(store: &mut Store, source: &S) -> PcurateResult<RepopulateReport>
where
    S: PackageSource + ?Sized,
{
    let installed = source.list_installed()?;
    let native_names = source.list_native_names()?;
    debug!(
        installed = installed.len(),
        native = native_names.len(),
        "repopulating annotation store"
    );

    let report = store.transaction(|store| {
        let mut report = RepopulateReport {
            purged: store.delete_uncurated()?,
            ..Default::default()
        };

        for pkg in &installed {
            let native = native_names.contains(&pkg.name);
            let record = PackageRecord::regular(pkg.name.as_str(), pkg.description.as_str(), native);

            if store.upsert_if_absent(&record)? {
                report.inserted += 1;
            } else if store.patch(&pkg.name, &PackagePatch::default().native(native))? {
                trace!(name = %pkg.name, native, "refreshed existing package");
                report.refreshed += 1;
            }
        }

        Ok(report)
    })?;

    debug!(
        purged = report.purged,
        inserted = report.inserted,
        refreshed = report.refreshed,
        "repopulation finished"
    );
    Ok(report)
}
