//! End-to-end pipelines run by one invocation: repopulate, then filter and
//! list, or select a single package.

use std::path::{Path, PathBuf};

use pcurate_config::config::Config;
use tracing::debug;

use crate::{
    filter::{apply_filter, read_filter_file},
    record::{PackagePatch, PackageRecord},
    repopulate::repopulate,
    source::{PackageSource, Pacman},
    store::Store,
    view::{self, Lookup},
    PcurateResult,
};

/// What to do with a single named package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Show the record without changing it.
    #[default]
    Show,
    /// Mark the package curated, optionally replacing tag and description.
    Set {
        tag: Option<String>,
        description: Option<String>,
    },
    /// Demote the package back to a regular one.
    Unset,
}

impl Selection {
    fn patch(&self) -> Option<PackagePatch> {
        match self {
            Selection::Show => None,
            Selection::Set { tag, description } => Some(PackagePatch {
                curated: Some(true),
                tag: tag.clone(),
                description: description.clone(),
                native: None,
            }),
            Selection::Unset => Some(PackagePatch::default().curated(false)),
        }
    }
}

/// Which rows a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Curated,
    Regular,
    /// Curated packages that are no longer installed.
    Missing,
}

pub struct Curator<S> {
    db_path: PathBuf,
    filter_path: PathBuf,
    source: S,
}

impl Curator<Pacman> {
    /// Builds a curator backed by pacman from `config`, creating the store
    /// directory when needed.
    pub fn from_config(config: &Config) -> PcurateResult<Self> {
        config.ensure_dirs()?;
        Ok(Self::new(
            config.get_db_path()?,
            config.get_filter_path()?,
            Pacman::new(config.pacman()),
        ))
    }
}

impl<S: PackageSource> Curator<S> {
    pub fn new(db_path: impl Into<PathBuf>, filter_path: impl Into<PathBuf>, source: S) -> Self {
        Self {
            db_path: db_path.into(),
            filter_path: filter_path.into(),
            source,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Repopulates and filters the store, then lists rows of `kind`.
    ///
    /// `native` narrows curated and regular listings to native (`Some(true)`)
    /// or foreign (`Some(false)`) packages. Missing listings ignore it.
    pub fn list(&self, kind: ListKind, native: Option<bool>) -> PcurateResult<Vec<PackageRecord>> {
        let tokens = self.filter_tokens()?;

        Store::session(&self.db_path, |store| {
            self.refresh(store, &tokens)?;
            match kind {
                ListKind::Curated => view::list(store, true, native),
                ListKind::Regular => view::list(store, false, native),
                ListKind::Missing => view::missing(store, &self.source),
            }
        })
    }

    /// Repopulates the store, applies `selection` to `name` and returns the
    /// resulting record.
    ///
    /// The filter file only narrows listings; filtered packages stay selectable.
    pub fn select(&self, name: &str, selection: &Selection) -> PcurateResult<Lookup> {
        Store::session(&self.db_path, |store| {
            repopulate(store, &self.source)?;
            if let Some(patch) = selection.patch() {
                let matched = store.patch(name, &patch)?;
                debug!(name, matched, ?selection, "applied selection");
            }
            view::lookup(store, name)
        })
    }

    fn filter_tokens(&self) -> PcurateResult<Vec<String>> {
        let tokens = read_filter_file(&self.filter_path)?;
        if tokens.is_none() {
            debug!(path = %self.filter_path.display(), "no filter file");
        }
        Ok(tokens.unwrap_or_default())
    }

    fn refresh(&self, store: &mut Store, tokens: &[String]) -> PcurateResult<()> {
        repopulate(store, &self.source)?;
        apply_filter(store, &self.source, tokens)?;
        Ok(())
    }
}
