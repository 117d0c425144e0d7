use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("Path is empty")]
    #[diagnostic(code(pcurate_config::path::empty))]
    Empty,

    #[error("Failed to get current directory: {source}")]
    #[diagnostic(code(pcurate_config::path::current_dir))]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(pcurate_config::path::missing_env_var),
        help("Set the variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{input}`")]
    #[diagnostic(code(pcurate_config::path::unclosed_variable))]
    UnclosedVariable { input: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(pcurate_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to read config file `{}`: {source}", path.display())]
    #[diagnostic(code(pcurate_config::read))]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory `{}`: {source}", path.display())]
    #[diagnostic(
        code(pcurate_config::create_dir),
        help("Check permissions of the parent directory")
    )]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Package manager command must not be empty")]
    #[diagnostic(
        code(pcurate_config::empty_pacman),
        help("Remove the `pacman` key or set it to an executable name")
    )]
    EmptyPacmanCommand,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

pub type PathResult<T> = std::result::Result<T, PathError>;

pub type Result<T> = std::result::Result<T, ConfigError>;
