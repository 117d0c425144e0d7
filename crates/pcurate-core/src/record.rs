//! Curation state of a single package.

use std::fmt::Display;

use pcurate_db::models::{NewPackage, Package, PackageChangeset};
use serde::Serialize;

/// One package as seen by the annotation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub curated: bool,
    pub tag: String,
    pub description: String,
    pub native: bool,
}

impl PackageRecord {
    /// A non-curated record as produced by repopulation.
    pub fn regular(name: impl Into<String>, description: impl Into<String>, native: bool) -> Self {
        Self {
            name: name.into(),
            curated: false,
            tag: String::new(),
            description: description.into(),
            native,
        }
    }

    pub fn status(&self) -> Status {
        if self.curated {
            Status::Curated
        } else {
            Status::Regular
        }
    }

    pub fn origin(&self) -> Origin {
        if self.native {
            Origin::Native
        } else {
            Origin::Foreign
        }
    }

    pub(crate) fn as_new(&self) -> NewPackage<'_> {
        NewPackage {
            name: &self.name,
            curated: self.curated,
            tag: Some(&self.tag),
            description: Some(&self.description),
            native: self.native,
        }
    }
}

impl From<Package> for PackageRecord {
    fn from(pkg: Package) -> Self {
        Self {
            name: pkg.name,
            curated: pkg.curated,
            tag: pkg.tag.unwrap_or_default(),
            description: pkg.description.unwrap_or_default(),
            native: pkg.native,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Curated,
    Regular,
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Curated => write!(f, "curated"),
            Status::Regular => write!(f, "regular"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Native,
    Foreign,
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Native => write!(f, "native"),
            Origin::Foreign => write!(f, "foreign"),
        }
    }
}

/// Partial update of a [`PackageRecord`].
///
/// `None` leaves the stored field unchanged; there is no way to clear a field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackagePatch {
    pub curated: Option<bool>,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub native: Option<bool>,
}

impl PackagePatch {
    pub fn curated(mut self, curated: bool) -> Self {
        self.curated = Some(curated);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn native(mut self, native: bool) -> Self {
        self.native = Some(native);
        self
    }

    pub(crate) fn changeset(&self) -> PackageChangeset<'_> {
        PackageChangeset {
            curated: self.curated,
            tag: self.tag.as_deref(),
            description: self.description.as_deref(),
            native: self.native,
        }
    }
}
