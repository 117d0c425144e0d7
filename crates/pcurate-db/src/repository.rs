//! Repository for the `packages` table.

use diesel::prelude::*;

use crate::{
    models::{NewPackage, Package, PackageChangeset},
    schema::packages,
};

/// Row selection used by [`PackageRepository::list_filtered`].
///
/// Every `None` field matches all rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PackageFilter<'a> {
    pub name: Option<&'a str>,
    pub curated: Option<bool>,
    pub native: Option<bool>,
}

/// Repository for package annotation operations.
pub struct PackageRepository;

impl PackageRepository {
    /// Lists packages matching `filter`, ordered by name ascending.
    pub fn list_filtered(
        conn: &mut SqliteConnection,
        filter: PackageFilter<'_>,
    ) -> QueryResult<Vec<Package>> {
        let mut query = packages::table.into_boxed();

        if let Some(name) = filter.name {
            query = query.filter(packages::name.eq(name));
        }
        if let Some(curated) = filter.curated {
            query = query.filter(packages::curated.eq(curated));
        }
        if let Some(native) = filter.native {
            query = query.filter(packages::native.eq(native));
        }

        query
            .order(packages::name.asc())
            .select(Package::as_select())
            .load(conn)
    }

    /// Inserts a package unless a row with the same name exists.
    ///
    /// Returns the number of inserted rows, `0` when the name was taken.
    pub fn insert_if_absent(
        conn: &mut SqliteConnection,
        package: &NewPackage,
    ) -> QueryResult<usize> {
        diesel::insert_or_ignore_into(packages::table)
            .values(package)
            .execute(conn)
    }

    /// Applies `changes` to the row named `name`.
    ///
    /// Returns the number of updated rows. An empty changeset is a no-op.
    pub fn patch(
        conn: &mut SqliteConnection,
        name: &str,
        changes: &PackageChangeset,
    ) -> QueryResult<usize> {
        if changes.is_empty() {
            return Ok(0);
        }

        diesel::update(packages::table.filter(packages::name.eq(name)))
            .set(changes)
            .execute(conn)
    }

    /// Deletes every package that is not curated.
    pub fn delete_uncurated(conn: &mut SqliteConnection) -> QueryResult<usize> {
        diesel::delete(packages::table.filter(packages::curated.eq(false))).execute(conn)
    }

    /// Deletes the non-curated packages whose name is in `names`.
    pub fn delete_uncurated_named(
        conn: &mut SqliteConnection,
        names: &[&str],
    ) -> QueryResult<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        let mut deleted = 0;
        // Stay well below SQLITE_MAX_VARIABLE_NUMBER.
        for chunk in names.chunks(500) {
            deleted += diesel::delete(
                packages::table
                    .filter(packages::curated.eq(false))
                    .filter(packages::name.eq_any(chunk.iter().copied())),
            )
            .execute(conn)?;
        }
        Ok(deleted)
    }
}
