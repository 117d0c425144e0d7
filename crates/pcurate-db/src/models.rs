use diesel::prelude::*;
use serde::Serialize;

use crate::schema::packages;

/// A row of the `packages` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = packages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Package {
    pub name: String,
    pub curated: bool,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub native: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = packages)]
pub struct NewPackage<'a> {
    pub name: &'a str,
    pub curated: bool,
    pub tag: Option<&'a str>,
    pub description: Option<&'a str>,
    pub native: bool,
}

/// Partial update of a package row.
///
/// Fields left as `None` are skipped by the generated `UPDATE`, so the stored
/// value is kept as is.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = packages)]
pub struct PackageChangeset<'a> {
    pub curated: Option<bool>,
    pub tag: Option<&'a str>,
    pub description: Option<&'a str>,
    pub native: Option<bool>,
}

impl PackageChangeset<'_> {
    /// Returns `true` when no column would be touched.
    pub fn is_empty(&self) -> bool {
        self.curated.is_none()
            && self.tag.is_none()
            && self.description.is_none()
            && self.native.is_none()
    }
}
