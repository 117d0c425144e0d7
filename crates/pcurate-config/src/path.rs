use std::{env, path::PathBuf};

use crate::error::{PathError, PathResult};

/// Returns the user's home directory from `HOME`.
pub fn home_dir() -> PathResult<PathBuf> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| PathError::MissingEnvVar {
            var: "HOME".into(),
            input: "~".into(),
        })
}

/// Returns the user's config directory following the XDG Base Directory
/// Specification.
///
/// `XDG_CONFIG_HOME` wins when set and non-empty, otherwise `$HOME/.config`.
pub fn xdg_config_home() -> PathResult<PathBuf> {
    match env::var("XDG_CONFIG_HOME") {
        Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(home_dir()?.join(".config")),
    }
}

/// Resolves a path string that may contain environment variables.
///
/// Expands `$VAR` and `${VAR}`, resolves a leading `~` to the home directory
/// and makes relative paths absolute against the current working directory.
///
/// # Errors
///
/// * [`PathError::Empty`] if the path is empty
/// * [`PathError::CurrentDir`] if the current directory cannot be determined
/// * [`PathError::MissingEnvVar`] if a referenced variable is undefined
/// * [`PathError::UnclosedVariable`] for a `${` without closing brace
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();

    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let resolved = PathBuf::from(expand_variables(path)?);

    if resolved.is_absolute() {
        Ok(resolved)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(resolved))
            .map_err(|err| PathError::CurrentDir { source: err })
    }
}

fn expand_variables(path: &str) -> PathResult<String> {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let var_name = consume_until(&mut chars, '}')?;
                    expand_env_var(&var_name, &mut result, path)?;
                } else {
                    let var_name = consume_var_name(&mut chars);
                    if var_name.is_empty() {
                        result.push('$');
                    } else {
                        expand_env_var(&var_name, &mut result, path)?;
                    }
                }
            }
            '~' if result.is_empty() => result.push_str(&home_dir()?.to_string_lossy()),
            _ => result.push(c),
        }
    }

    Ok(result)
}

fn consume_until(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    delimiter: char,
) -> PathResult<String> {
    let mut var_name = String::new();

    for c in chars.by_ref() {
        if c == delimiter {
            return Ok(var_name);
        }
        var_name.push(c);
    }

    Err(PathError::UnclosedVariable {
        input: format!("${{{var_name}"),
    })
}

fn consume_var_name(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut var_name = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            var_name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    var_name
}

fn expand_env_var(var_name: &str, result: &mut String, original: &str) -> PathResult<()> {
    match var_name {
        "XDG_CONFIG_HOME" => result.push_str(&xdg_config_home()?.to_string_lossy()),
        _ => {
            let value = env::var(var_name).map_err(|_| PathError::MissingEnvVar {
                input: original.into(),
                var: var_name.into(),
            })?;
            result.push_str(&value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    #[serial]
    fn test_expand_variables_simple_and_braces() {
        with_env(vec![("PCURATE_TEST_VAR", "test_value")], || {
            assert_eq!(
                expand_variables("$PCURATE_TEST_VAR/path").unwrap(),
                "test_value/path"
            );
            assert_eq!(
                expand_variables("${PCURATE_TEST_VAR}/path").unwrap(),
                "test_value/path"
            );
        });
    }

    #[test]
    #[serial]
    fn test_expand_variables_errors() {
        assert!(matches!(
            expand_variables("${PCURATE_TEST_VAR"),
            Err(PathError::UnclosedVariable { .. })
        ));
        assert!(matches!(
            expand_variables("$THIS_VAR_DOESNT_EXIST"),
            Err(PathError::MissingEnvVar { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_resolve_path_tilde_and_relative() {
        with_env(vec![("HOME", "/tmp/home")], || {
            assert_eq!(
                resolve_path("~/pcurate.db").unwrap(),
                PathBuf::from("/tmp/home/pcurate.db")
            );
        });

        let relative = resolve_path("store.db").unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("store.db"));

        assert!(matches!(resolve_path("  "), Err(PathError::Empty)));
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        with_env(
            vec![("HOME", "/tmp/home"), ("XDG_CONFIG_HOME", "/tmp/config")],
            || {
                assert_eq!(xdg_config_home().unwrap(), PathBuf::from("/tmp/config"));
            },
        );

        with_env(vec![("HOME", "/tmp/home"), ("XDG_CONFIG_HOME", "")], || {
            assert_eq!(
                xdg_config_home().unwrap(),
                PathBuf::from("/tmp/home/.config")
            );
        });
    }
}
