//! Hides uninteresting regular packages named in the filter file.

use std::{collections::BTreeSet, fs, io::ErrorKind, path::Path};

use tracing::{debug, warn};

use crate::{error::ErrorContext, source::PackageSource, store::Store, PcurateResult};

/// Counters describing one filter pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub tokens: usize,
    pub removed: usize,
}

/// Splits filter text into package or group names.
///
/// Any whitespace separates tokens; blank lines are ignored.
pub fn parse_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(String::from).collect()
}

/// Reads filter tokens from `path`. A missing file means no filter.
pub fn read_filter_file(path: &Path) -> PcurateResult<Option<Vec<String>>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_tokens(&text))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("reading filter file {}", path.display())),
    }
}

/// Removes every non-curated row named by a token or by a member of a group
/// named by a token.
///
/// Curated rows are never removed. A failing group expansion only loses that
/// token's group members.
pub fn apply_filter<S>(store: &mut Store, source: &S, tokens: &[String]) -> PcurateResult<FilterReport>
where
    S: PackageSource + ?Sized,
{
    if tokens.is_empty() {
        return Ok(FilterReport::default());
    }

    let mut names: BTreeSet<String> = BTreeSet::new();
    for token in tokens {
        match source.expand_group(token) {
            Ok(members) => names.extend(members),
            Err(err) => warn!("ignoring group expansion of '{token}': {err}"),
        }
        names.insert(token.clone());
    }

    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let removed = store.delete_uncurated_named(&names)?;
    debug!(tokens = tokens.len(), names = names.len(), removed, "applied package filter");

    Ok(FilterReport {
        tokens: tokens.len(),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::PackageRecord,
        test_utils::{curated, FakeSource},
    };

    fn seed(store: &mut Store, names: &[&str]) {
        for name in names {
            store
                .upsert_if_absent(&PackageRecord::regular(*name, "", true))
                .unwrap();
        }
    }

    #[test]
    fn test_parse_tokens_tolerates_whitespace() {
        assert_eq!(
            parse_tokens("base\n\n  filter_one \t linux\n"),
            vec!["base", "filter_one", "linux"]
        );
        assert!(parse_tokens(" \n\n").is_empty());
    }

    #[test]
    fn test_filter_removes_names_and_group_members() {
        let mut store = Store::open_in_memory().unwrap();
        seed(&mut store, &["base", "base-devel", "filter_one", "firefox", "git"]);
        let source = FakeSource::default().with_group("base", &["base-devel"]);

        let report = apply_filter(&mut store, &source, &parse_tokens("base\nfilter_one")).unwrap();
        assert_eq!(report.removed, 3);

        let remaining: Vec<String> = store
            .query(Default::default())
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(remaining, vec!["firefox", "git"]);
    }

    #[test]
    fn test_filter_never_removes_curated_rows() {
        let mut store = Store::open_in_memory().unwrap();
        seed(&mut store, &["gcc"]);
        store.upsert_if_absent(&curated("make", "dev", "", true)).unwrap();
        let source = FakeSource::default().with_group("base-devel", &["gcc", "make"]);

        apply_filter(&mut store, &source, &["base-devel".to_string()]).unwrap();

        assert!(store.find("gcc").unwrap().is_none());
        assert!(store.find("make").unwrap().unwrap().curated);
    }

    #[test]
    fn test_group_failure_degrades_to_literal_names() {
        let mut store = Store::open_in_memory().unwrap();
        seed(&mut store, &["base", "base-devel"]);
        let source = FakeSource {
            groups_fail: true,
            ..FakeSource::default().with_group("base", &["base-devel"])
        };

        let report = apply_filter(&mut store, &source, &["base".to_string()]).unwrap();
        assert_eq!(report.removed, 1);
        assert!(store.find("base-devel").unwrap().is_some());
    }

    #[test]
    fn test_unmatched_tokens_are_ignored() {
        let mut store = Store::open_in_memory().unwrap();
        seed(&mut store, &["git"]);

        let report =
            apply_filter(&mut store, &FakeSource::default(), &["nothing".to_string()]).unwrap();
        assert_eq!(report, FilterReport { tokens: 1, removed: 0 });
        assert_eq!(
            apply_filter(&mut store, &FakeSource::default(), &[]).unwrap(),
            FilterReport::default()
        );
    }

    #[test]
    fn test_read_filter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.txt");
        assert_eq!(read_filter_file(&path).unwrap(), None);

        fs::write(&path, "base\nlinux-firmware\n").unwrap();
        assert_eq!(
            read_filter_file(&path).unwrap(),
            Some(vec!["base".to_string(), "linux-firmware".to_string()])
        );
    }
}
