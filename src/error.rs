use thiserror::Error;

/// Errors raised while building or running a form.
///
/// Validation failures are not errors: they are shown in-session and the
/// user gets another try. Aborting is reported through
/// [`FormOutcome::Aborted`](crate::FormOutcome::Aborted).
#[derive(Error, Debug)]
pub enum FormError {
    /// A spec mapping mixes directive keys with plain keys, or is not a mapping at all.
    #[error("malformed form spec at '{path}': {reason}")]
    MalformedSpec { path: String, reason: String },

    /// A `^callback` directive names a callback that was never registered.
    #[error("field '{path}' refers to unknown callback '{name}'")]
    UnknownCallback { path: String, name: String },

    /// An external field's callback failed while the session was running.
    #[error("callback for field '{path}' failed")]
    Callback {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML document")]
    Config(#[from] serde_yaml::Error),
}

impl FormError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSpec {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
