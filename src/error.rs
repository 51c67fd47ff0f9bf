//! Errors reported while setting and validating flags.

/// Flag-level errors, detected before a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An enumerated flag was given a name outside its allowed set.
    InvalidChoice { allowed: Vec<String> },
    /// A value could not be parsed as the flag's underlying type.
    InvalidValue { value: String, reason: String },
    /// A value taken from an environment variable was rejected.
    InvalidEnv {
        flag: String,
        env_var: String,
        cause: Box<Self>,
    },
    /// A flag was set without the flags it requires.
    MissingRequirements { flag: String, missing: Vec<String> },
    /// The completion command was asked for a shell it does not support.
    UnsupportedShell(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidChoice { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            Self::InvalidValue { value, reason } => {
                write!(f, "invalid value \"{value}\": {reason}")
            }
            Self::InvalidEnv {
                flag,
                env_var,
                cause,
            } => {
                write!(
                    f,
                    "invalid value for --{flag} from environment variable {env_var}: {cause}"
                )
            }
            Self::MissingRequirements { flag, missing } => {
                let missing: Vec<String> = missing.iter().map(|name| format!("--{name}")).collect();
                write!(f, "flag --{flag} requires {}", missing.join(", "))
            }
            Self::UnsupportedShell(shell) => write!(f, "unsupported shell: {shell}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEnv { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
