//! Environment variable fallback for flags.
//!
//! Precedence, highest first: the command line, the bound environment
//! variable, the flag's default.

use super::Flag;
use crate::error::Error;

/// Binds `env_var` to `flag`. A `None` flag is ignored.
pub fn bind_env(flag: Option<&mut Flag>, env_var: impl Into<String>) {
    if let Some(flag) = flag {
        flag.env_var = Some(env_var.into());
    }
}

/// Applies bound environment variables to every flag not set on the command
/// line. Empty variables are treated as unset.
///
/// Values taken from the environment do not mark a flag as changed.
pub(crate) fn apply_env_bindings(flags: &[&Flag]) -> Result<(), Error> {
    for flag in flags {
        let Some(env_var) = flag.env_var.as_deref() else {
            continue;
        };
        if flag.changed {
            continue;
        }
        let Ok(value) = std::env::var(env_var) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        flag.value
            .borrow_mut()
            .set(&value)
            .map_err(|cause| Error::InvalidEnv {
                flag: flag.name.clone(),
                env_var: env_var.to_string(),
                cause: Box::new(cause),
            })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flag::{FlagSet, Scalar, shared};
    use serial_test::serial;

    #[test]
    fn test_bind_env_none_is_noop() {
        bind_env(None, "HELPKIT_TEST_UNUSED");
    }

    #[test]
    #[serial]
    fn test_env_fills_unset_flag() {
        let key = shared(Scalar::new(String::new()));
        let mut flags = FlagSet::new();
        flags.add(Flag::new("key", &key));
        bind_env(flags.lookup_mut("key"), "HELPKIT_TEST_KEY");
        assert_eq!(flags.lookup("key").unwrap().env_var(), Some("HELPKIT_TEST_KEY"));

        unsafe { std::env::set_var("HELPKIT_TEST_KEY", "from-env") };
        let result = apply_env_bindings(&flags.visit());
        unsafe { std::env::remove_var("HELPKIT_TEST_KEY") };

        result.unwrap();
        assert_eq!(key.borrow().get(), "from-env");
        assert!(!flags.lookup("key").unwrap().is_changed());
    }

    #[test]
    #[serial]
    fn test_command_line_wins_over_env() {
        let key = shared(Scalar::new(String::new()));
        let mut flags = FlagSet::new();
        flags.add(Flag::new("key", &key).env("HELPKIT_TEST_KEY"));
        flags.lookup_mut("key").unwrap().set("from-cli").unwrap();

        unsafe { std::env::set_var("HELPKIT_TEST_KEY", "from-env") };
        let result = apply_env_bindings(&flags.visit());
        unsafe { std::env::remove_var("HELPKIT_TEST_KEY") };

        result.unwrap();
        assert_eq!(key.borrow().get(), "from-cli");
    }

    #[test]
    #[serial]
    fn test_empty_env_is_ignored() {
        let retries = shared(Scalar::new(3_u32));
        let mut flags = FlagSet::new();
        flags.add(Flag::new("retries", &retries).env("HELPKIT_TEST_RETRIES"));

        unsafe { std::env::set_var("HELPKIT_TEST_RETRIES", "") };
        let result = apply_env_bindings(&flags.visit());
        unsafe { std::env::remove_var("HELPKIT_TEST_RETRIES") };

        result.unwrap();
        assert_eq!(retries.borrow().get(), 3);
    }

    #[test]
    #[serial]
    fn test_malformed_env_names_flag_and_variable() {
        let retries = shared(Scalar::new(3_u32));
        let mut flags = FlagSet::new();
        flags.add(Flag::new("retries", &retries).env("HELPKIT_TEST_RETRIES"));

        unsafe { std::env::set_var("HELPKIT_TEST_RETRIES", "lots") };
        let result = apply_env_bindings(&flags.visit());
        unsafe { std::env::remove_var("HELPKIT_TEST_RETRIES") };

        let msg = result.unwrap_err().to_string();
        assert!(msg.starts_with(
            "invalid value for --retries from environment variable HELPKIT_TEST_RETRIES:"
        ));
        assert_eq!(retries.borrow().get(), 3);
    }
}
