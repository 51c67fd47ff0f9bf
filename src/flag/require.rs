//! One-way dependencies between flags.

use super::Flag;
use crate::error::Error;

/// Records that whenever `flag` is set, every flag in `names` must be set
/// too. Repeated calls append. A `None` flag is ignored.
pub fn mark_flag_requires(flag: Option<&mut Flag>, names: &[&str]) {
    if let Some(flag) = flag {
        flag.requires
            .extend(names.iter().map(|name| (*name).to_string()));
    }
}

/// Checks the requirements of every flag given on the command line.
///
/// Flags are checked in the order given; the first violation is reported
/// with all of its missing requirements.
pub(crate) fn validate_requirements(flags: &[&Flag]) -> Result<(), Error> {
    for flag in flags.iter().filter(|f| f.changed && !f.requires.is_empty()) {
        let missing: Vec<String> = flag
            .requires
            .iter()
            .filter(|name| {
                !flags
                    .iter()
                    .any(|other| other.name == name.as_str() && other.changed)
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(Error::MissingRequirements {
                flag: flag.name.clone(),
                missing,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flag::{FlagSet, Scalar, shared};

    fn workspace_flags() -> FlagSet {
        let value = shared(Scalar::new(false));
        let mut flags = FlagSet::new();
        for name in ["check", "verbose", "workspace"] {
            flags.add(Flag::new(name, &value));
        }
        mark_flag_requires(flags.lookup_mut("workspace"), &["check"]);
        mark_flag_requires(flags.lookup_mut("workspace"), &["verbose"]);
        flags
    }

    #[test]
    fn test_mark_flag_requires_none_is_noop() {
        mark_flag_requires(None, &["x"]);
    }

    #[test]
    fn test_requirements_accumulate() {
        let flags = workspace_flags();
        assert_eq!(
            flags.lookup("workspace").unwrap().requires(),
            ["check", "verbose"]
        );
    }

    #[test]
    fn test_unset_flag_is_not_checked() {
        let flags = workspace_flags();
        assert!(validate_requirements(&flags.visit()).is_ok());
    }

    #[test]
    fn test_all_missing_requirements_listed() {
        let mut flags = workspace_flags();
        flags.lookup_mut("workspace").unwrap().set("true").unwrap();

        let err = validate_requirements(&flags.visit()).unwrap_err();
        assert_eq!(err.to_string(), "flag --workspace requires --check, --verbose");
    }

    #[test]
    fn test_only_unset_requirements_listed() {
        let mut flags = workspace_flags();
        flags.lookup_mut("workspace").unwrap().set("true").unwrap();
        flags.lookup_mut("verbose").unwrap().set("true").unwrap();

        let err = validate_requirements(&flags.visit()).unwrap_err();
        assert_eq!(err.to_string(), "flag --workspace requires --check");
    }

    #[test]
    fn test_satisfied_requirements() {
        let mut flags = workspace_flags();
        for name in ["workspace", "check", "verbose"] {
            flags.lookup_mut(name).unwrap().set("true").unwrap();
        }
        assert!(validate_requirements(&flags.visit()).is_ok());
    }

    #[test]
    fn test_unknown_requirement_is_missing() {
        let value = shared(Scalar::new(String::new()));
        let mut flags = FlagSet::new();
        flags.add(Flag::new("format", &value));
        mark_flag_requires(flags.lookup_mut("format"), &["output"]);
        flags.lookup_mut("format").unwrap().set("json").unwrap();

        let err = validate_requirements(&flags.visit()).unwrap_err();
        assert_eq!(err.to_string(), "flag --format requires --output");
    }
}
