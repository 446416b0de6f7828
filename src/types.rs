// src/types.rs

//! Small shared types used across config, watch and engine.

/// Canonical watch rule title type (the `title` of a `[[watch]]` table).
pub type RuleTitle = String;

/// Hostname used when the OS refuses to tell us its own.
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// Resolve the local hostname once at startup.
///
/// Used for notification bodies and the default `smtp_from` address.
pub fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => {
            let name = name.to_string_lossy().trim().to_string();
            if name.is_empty() {
                FALLBACK_HOSTNAME.to_string()
            } else {
                name
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not resolve hostname; using {FALLBACK_HOSTNAME}");
            FALLBACK_HOSTNAME.to_string()
        }
    }
}
