/// Restores the captured variables when dropped, also on panic.
struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old_value) in self.saved.drain(..) {
            match old_value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Runs `f` with `vars` set. Callers must be `#[serial]`.
pub fn with_env<F>(vars: Vec<(&str, &str)>, f: F)
where
    F: FnOnce(),
{
    let _guard = EnvGuard {
        saved: vars
            .iter()
            .map(|(k, _)| (k.to_string(), std::env::var(k).ok()))
            .collect(),
    };

    for (key, value) in &vars {
        std::env::set_var(key, value);
    }

    f();
}
