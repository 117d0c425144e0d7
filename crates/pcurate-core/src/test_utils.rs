use std::{
    cell::Cell,
    collections::{HashMap, HashSet},
};

use crate::{
    error::PcurateError,
    record::PackageRecord,
    source::{InstalledPackage, PackageSource},
    PcurateResult,
};

pub fn curated(name: &str, tag: &str, description: &str, native: bool) -> PackageRecord {
    PackageRecord {
        name: name.into(),
        curated: true,
        tag: tag.into(),
        description: description.into(),
        native,
    }
}

/// In-memory [`PackageSource`] with switchable failures.
#[derive(Default)]
pub struct FakeSource {
    pub installed: Vec<InstalledPackage>,
    pub native: HashSet<String>,
    pub groups: HashMap<String, Vec<String>>,
    pub listing_fails: Cell<bool>,
    pub groups_fail: bool,
}

impl FakeSource {
    pub fn new(installed: &[(&str, &str)], native: &[&str]) -> Self {
        Self {
            installed: installed
                .iter()
                .map(|(name, desc)| InstalledPackage::new(*name, *desc))
                .collect(),
            native: native.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: &str, members: &[&str]) -> Self {
        self.groups.insert(
            group.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }
}

impl PackageSource for FakeSource {
    fn list_installed(&self) -> PcurateResult<Vec<InstalledPackage>> {
        if self.listing_fails.get() {
            return Err(PcurateError::ListingUnavailable("pacman -Qei failed".into()));
        }
        Ok(self.installed.clone())
    }

    fn list_native_names(&self) -> PcurateResult<HashSet<String>> {
        if self.listing_fails.get() {
            return Err(PcurateError::ListingUnavailable("pacman -Qqn failed".into()));
        }
        Ok(self.native.clone())
    }

    fn expand_group(&self, group: &str) -> PcurateResult<Vec<String>> {
        if self.groups_fail {
            return Err(PcurateError::ListingUnavailable("pacman -Sgq failed".into()));
        }
        Ok(self.groups.get(group).cloned().unwrap_or_default())
    }
}
