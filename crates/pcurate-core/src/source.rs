//! Package manager queries consumed by the curation engine.

use std::{
    collections::HashSet,
    process::{Command, Output},
};

use tracing::{debug, trace};

use crate::{error::PcurateError, PcurateResult};

/// An explicitly installed package as reported by the package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub description: String,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Source of truth for what is installed on the system.
pub trait PackageSource {
    /// Lists explicitly installed packages in package manager order.
    fn list_installed(&self) -> PcurateResult<Vec<InstalledPackage>>;

    /// Names of installed packages coming from the native repositories.
    fn list_native_names(&self) -> PcurateResult<HashSet<String>>;

    /// Expands a group name to its member packages.
    ///
    /// An unknown group yields an empty list.
    fn expand_group(&self, group: &str) -> PcurateResult<Vec<String>>;

    fn is_installed(&self, name: &str) -> PcurateResult<bool> {
        Ok(self.list_installed()?.iter().any(|pkg| pkg.name == name))
    }
}

/// [`PackageSource`] backed by the `pacman` command line.
#[derive(Debug, Clone)]
pub struct Pacman {
    program: String,
}

impl Default for Pacman {
    fn default() -> Self {
        Self::new(pcurate_config::config::DEFAULT_PACMAN)
    }
}

impl Pacman {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> PcurateResult<Output> {
        trace!(program = %self.program, ?args, "running package manager");
        // Field labels of `-Qi` are translated, keep them parseable.
        Command::new(&self.program)
            .args(args)
            .env("LC_ALL", "C")
            .output()
            .map_err(|err| {
                PcurateError::ListingUnavailable(format!(
                    "failed to execute {} {}: {err}",
                    self.program,
                    args.join(" ")
                ))
            })
    }

    fn query(&self, args: &[&str]) -> PcurateResult<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PcurateError::ListingUnavailable(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PackageSource for Pacman {
    fn list_installed(&self) -> PcurateResult<Vec<InstalledPackage>> {
        let output = self.query(&["-Qei"])?;
        let packages = parse_package_info(&output);
        debug!(count = packages.len(), "listed explicitly installed packages");
        Ok(packages)
    }

    fn list_native_names(&self) -> PcurateResult<HashSet<String>> {
        let output = self.query(&["-Qqn"])?;
        Ok(parse_name_list(&output).collect())
    }

    fn expand_group(&self, group: &str) -> PcurateResult<Vec<String>> {
        let output = self.run(&["-Sgq", group])?;
        if output.status.success() {
            return Ok(parse_name_list(&String::from_utf8_lossy(&output.stdout)).collect());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not found") {
            trace!(group, "not a package group");
            return Ok(Vec::new());
        }

        Err(PcurateError::ListingUnavailable(format!(
            "{} -Sgq {group} exited with {}: {}",
            self.program,
            output.status,
            stderr.trim()
        )))
    }
}

/// Parses `pacman -Qi` output into name and description pairs.
///
/// Records are separated by `Name` fields; a record without a `Description`
/// gets an empty one.
pub fn parse_package_info(output: &str) -> Vec<InstalledPackage> {
    let mut packages = Vec::new();
    let mut current: Option<InstalledPackage> = None;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        match key.trim_end() {
            "Name" => {
                if let Some(pkg) = current.take() {
                    packages.push(pkg);
                }
                current = Some(InstalledPackage::new(value.trim(), ""));
            }
            "Description" => {
                if let Some(pkg) = current.as_mut() {
                    pkg.description = value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    packages.extend(current);
    packages
}

/// Splits whitespace separated package names.
pub fn parse_name_list(output: &str) -> impl Iterator<Item = String> + '_ {
    output.split_whitespace().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QEI_OUTPUT: &str = "\
Name            : base
Version         : 3-2
Description     : Minimal package set to define a basic Arch Linux installation
Architecture    : any
URL             : https://www.archlinux.org
Licenses        : GPL
Depends On      : filesystem  gcc-libs  glibc  bash
Validated By    : Signature

Name            : yay
Version         : 12.3.5-1
Description     : Yet another yogurt. Pacman wrapper and AUR helper written in go.
Architecture    : x86_64
URL             : https://github.com/Jguer/yay
Build Date      : Sat 16 Mar 2024 10:00:00 AM UTC
Install Reason  : Explicitly installed

";

    #[test]
    fn test_parse_package_info() {
        let packages = parse_package_info(QEI_OUTPUT);
        assert_eq!(
            packages,
            vec![
                InstalledPackage::new(
                    "base",
                    "Minimal package set to define a basic Arch Linux installation"
                ),
                InstalledPackage::new(
                    "yay",
                    "Yet another yogurt. Pacman wrapper and AUR helper written in go."
                ),
            ]
        );
    }

    #[test]
    fn test_parse_package_info_keeps_colons_in_description() {
        let packages = parse_package_info("Name : foo\nDescription : a: b : c\n");
        assert_eq!(packages, vec![InstalledPackage::new("foo", "a: b : c")]);
    }

    #[test]
    fn test_parse_package_info_without_description() {
        let packages = parse_package_info("Name : foo\nName : bar\nDescription : Bar\n");
        assert_eq!(
            packages,
            vec![
                InstalledPackage::new("foo", ""),
                InstalledPackage::new("bar", "Bar"),
            ]
        );
        assert!(parse_package_info("").is_empty());
    }

    #[test]
    fn test_parse_name_list() {
        let names: Vec<String> = parse_name_list("base-devel\n  gcc\n\nmake\n").collect();
        assert_eq!(names, vec!["base-devel", "gcc", "make"]);
    }

    #[test]
    fn test_missing_program_is_listing_unavailable() {
        let pacman = Pacman::new("pcurate-definitely-not-a-real-binary");
        assert!(matches!(
            pacman.list_installed(),
            Err(PcurateError::ListingUnavailable(_))
        ));
        assert!(pacman.expand_group("base").is_err());
    }

    #[test]
    fn test_is_installed_uses_listing() {
        let source = crate::test_utils::FakeSource::new(&[("vim", "Vi Improved")], &["vim"]);
        assert!(source.is_installed("vim").unwrap());
        assert!(!source.is_installed("emacs").unwrap());
    }
}
