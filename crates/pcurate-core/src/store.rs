//! Annotation store: the persisted table of [`PackageRecord`]s.

use std::path::Path;

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use pcurate_db::{
    connection::DbConnection,
    repository::{PackageFilter, PackageRepository},
};
use tracing::{debug, warn};

use crate::{
    error::PcurateError,
    record::{PackagePatch, PackageRecord},
    PcurateResult,
};

/// Row selection for [`Store::query`]. `None` matches everything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PackageQuery<'a> {
    pub name: Option<&'a str>,
    pub curated: Option<bool>,
    pub native: Option<bool>,
}

impl<'a> PackageQuery<'a> {
    /// The row named `name`, whatever its state.
    pub fn named(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Default::default()
        }
    }

    pub fn curated(curated: bool) -> Self {
        Self {
            curated: Some(curated),
            ..Default::default()
        }
    }

    pub fn with_native(mut self, native: Option<bool>) -> Self {
        self.native = native;
        self
    }
}

/// Single connection to the annotation store.
///
/// The store is meant for one process at a time; two invocations running a
/// repopulation concurrently race on the delete and re-insert window.
pub struct Store {
    db: DbConnection,
}

impl Store {
    /// Opens (creating if needed) and migrates the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> PcurateResult<Self> {
        let path = path.as_ref();
        let db = DbConnection::open(path).map_err(|source| {
            PcurateError::StorageUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> PcurateResult<Self> {
        let db = DbConnection::open_in_memory().map_err(|source| {
            PcurateError::StorageUnavailable {
                path: ":memory:".into(),
                source,
            }
        })?;
        Ok(Self { db })
    }

    /// Opens the store at `path`, runs `f` in one transaction and closes it.
    ///
    /// Writes are committed when `f` succeeds and rolled back when it fails.
    /// The connection is released on both paths.
    pub fn session<P, T, F>(path: P, f: F) -> PcurateResult<T>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut Store) -> PcurateResult<T>,
    {
        let mut store = Self::open(path)?;
        store.transaction(f)
    }

    /// Runs `f` inside a transaction (a savepoint when already nested).
    pub fn transaction<T, F>(&mut self, f: F) -> PcurateResult<T>
    where
        F: FnOnce(&mut Store) -> PcurateResult<T>,
    {
        AnsiTransactionManager::begin_transaction(self.db.conn())?;

        match f(self) {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(self.db.conn())?;
                Ok(value)
            }
            Err(err) => {
                debug!("rolling back store changes");
                if let Err(rollback_err) = AnsiTransactionManager::rollback_transaction(self.db.conn())
                {
                    warn!("failed to roll back store changes: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    /// Inserts `record` unless its name is already stored.
    ///
    /// Returns `true` when a row was inserted.
    pub fn upsert_if_absent(&mut self, record: &PackageRecord) -> PcurateResult<bool> {
        let inserted = PackageRepository::insert_if_absent(self.db.conn(), &record.as_new())?;
        Ok(inserted > 0)
    }

    /// Updates the supplied fields of the row named `name`.
    ///
    /// Returns `true` when a row matched. Missing names are not an error.
    pub fn patch(&mut self, name: &str, patch: &PackagePatch) -> PcurateResult<bool> {
        let updated = PackageRepository::patch(self.db.conn(), name, &patch.changeset())?;
        Ok(updated > 0)
    }

    /// Rows matching `query`, ordered by name.
    pub fn query(&mut self, query: PackageQuery<'_>) -> PcurateResult<Vec<PackageRecord>> {
        let filter = PackageFilter {
            name: query.name,
            curated: query.curated,
            native: query.native,
        };
        let rows = PackageRepository::list_filtered(self.db.conn(), filter)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub fn find(&mut self, name: &str) -> PcurateResult<Option<PackageRecord>> {
        Ok(self.query(PackageQuery::named(name))?.into_iter().next())
    }

    pub fn delete_uncurated(&mut self) -> PcurateResult<usize> {
        Ok(PackageRepository::delete_uncurated(self.db.conn())?)
    }

    pub fn delete_uncurated_named(&mut self, names: &[&str]) -> PcurateResult<usize> {
        Ok(PackageRepository::delete_uncurated_named(
            self.db.conn(),
            names,
        )?)
    }
}
