//! Read-only projections of the store and their text rendering.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::{
    record::{Origin, PackageRecord, Status},
    source::PackageSource,
    store::{PackageQuery, Store},
    PcurateResult,
};

pub const VERBOSE_HEADER: &str = "name, status, origin, tag, description";

/// Outcome of looking up a single package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(PackageRecord),
    /// No row with this name, usually because it is not explicitly installed.
    NoMatch(String),
}

/// Curated or regular rows, optionally narrowed to native or foreign ones.
pub fn list(
    store: &mut Store,
    curated: bool,
    native: Option<bool>,
) -> PcurateResult<Vec<PackageRecord>> {
    store.query(PackageQuery::curated(curated).with_native(native))
}

/// Curated rows whose package is not installed anymore.
///
/// Compares against a fresh listing from `source`, not against stored rows.
pub fn missing<S>(store: &mut Store, source: &S) -> PcurateResult<Vec<PackageRecord>>
where
    S: PackageSource + ?Sized,
{
    let installed: HashSet<String> = source
        .list_installed()?
        .into_iter()
        .map(|pkg| pkg.name)
        .collect();

    let missing: Vec<PackageRecord> = store
        .query(PackageQuery::curated(true))?
        .into_iter()
        .filter(|record| !installed.contains(&record.name))
        .collect();
    debug!(count = missing.len(), "found missing curated packages");

    Ok(missing)
}

pub fn lookup(store: &mut Store, name: &str) -> PcurateResult<Lookup> {
    Ok(match store.find(name)? {
        Some(record) => Lookup::Found(record),
        None => Lookup::NoMatch(name.to_string()),
    })
}

/// A record with its human readable labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow<'a> {
    #[serde(flatten)]
    pub record: &'a PackageRecord,
    pub status: Status,
    pub origin: Origin,
}

impl<'a> From<&'a PackageRecord> for DisplayRow<'a> {
    fn from(record: &'a PackageRecord) -> Self {
        Self {
            record,
            status: record.status(),
            origin: record.origin(),
        }
    }
}

impl DisplayRow<'_> {
    /// `name,status,origin,tag,"description"`
    pub fn verbose_line(&self) -> String {
        format!(
            "{},{},{},{},\"{}\"",
            self.record.name,
            self.status,
            self.origin,
            self.record.tag,
            self.record.description.replace('"', "\"\"")
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Package names only.
    #[default]
    Compact,
    /// Header plus one labelled line per package.
    Verbose,
}

/// Renders `records` as output lines.
pub fn render(records: &[PackageRecord], mode: ViewMode) -> Vec<String> {
    match mode {
        ViewMode::Compact => records.iter().map(|r| r.name.clone()).collect(),
        ViewMode::Verbose => std::iter::once(VERBOSE_HEADER.to_string())
            .chain(records.iter().map(|r| DisplayRow::from(r).verbose_line()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::PackagePatch,
        test_utils::{curated, FakeSource},
    };

    fn names(records: &[PackageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn seeded_store() -> Store {
        let mut store = Store::open_in_memory().unwrap();
        store.upsert_if_absent(&curated("vim", "editor", "Vi", true)).unwrap();
        store.upsert_if_absent(&curated("yay", "aur", "helper", false)).unwrap();
        store.upsert_if_absent(&curated("atom", "old", "gone", true)).unwrap();
        store
            .upsert_if_absent(&PackageRecord::regular("bash", "shell", true))
            .unwrap();
        store
            .upsert_if_absent(&PackageRecord::regular("spotify", "music", false))
            .unwrap();
        store
    }

    #[test]
    fn test_list_curated_and_regular() {
        let mut store = seeded_store();

        assert_eq!(names(&list(&mut store, true, None).unwrap()), vec!["atom", "vim", "yay"]);
        assert_eq!(names(&list(&mut store, true, Some(false)).unwrap()), vec!["yay"]);
        assert_eq!(names(&list(&mut store, false, None).unwrap()), vec!["bash", "spotify"]);
        assert_eq!(names(&list(&mut store, false, Some(true)).unwrap()), vec!["bash"]);
    }

    #[test]
    fn test_missing_uses_live_listing() {
        let mut store = seeded_store();
        let source = FakeSource::new(&[("vim", ""), ("yay", ""), ("bash", "")], &["vim"]);

        assert_eq!(names(&missing(&mut store, &source).unwrap()), vec!["atom"]);
    }

    #[test]
    fn test_lookup_reflects_patches() {
        let mut store = Store::open_in_memory().unwrap();
        store.upsert_if_absent(&curated("foo", "tagA", "descA", true)).unwrap();

        let Lookup::Found(before) = lookup(&mut store, "foo").unwrap() else {
            panic!("foo should exist");
        };
        assert_eq!(DisplayRow::from(&before).verbose_line(), "foo,curated,native,tagA,\"descA\"");

        store.patch("foo", &PackagePatch::default().curated(false)).unwrap();
        let Lookup::Found(after) = lookup(&mut store, "foo").unwrap() else {
            panic!("foo should still exist");
        };
        assert_eq!(DisplayRow::from(&after).verbose_line(), "foo,regular,native,tagA,\"descA\"");

        assert_eq!(
            lookup(&mut store, "bar").unwrap(),
            Lookup::NoMatch("bar".to_string())
        );
    }

    #[test]
    fn test_render_modes() {
        let records = vec![
            curated("yay", "aur", "say \"hi\"", false),
            PackageRecord::regular("bash", "shell", true),
        ];

        assert_eq!(render(&records, ViewMode::Compact), vec!["yay", "bash"]);
        assert_eq!(
            render(&records, ViewMode::Verbose),
            vec![
                VERBOSE_HEADER.to_string(),
                "yay,curated,foreign,aur,\"say \"\"hi\"\"\"".to_string(),
                "bash,regular,native,,\"shell\"".to_string(),
            ]
        );
        assert_eq!(render(&[], ViewMode::Verbose), vec![VERBOSE_HEADER.to_string()]);
    }
}
