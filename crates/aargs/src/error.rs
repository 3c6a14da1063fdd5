use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while scanning, binding, or reading arguments.
///
/// Messages reference the offending token or the display form of a name
/// (`MODE`, `[FILE]`, `--src=VALUE`), never the internal field spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A flag that needed a value reached the end of input, a `--`, or another
    /// flag before getting one.
    #[error("missing value after '{0}'")]
    MissingValue(String),

    /// A value was attached to a boolean flag, or to a flag already used as a counter.
    #[error("unexpected value for '{flag}': {value:?}")]
    UnexpectedValue { flag: String, value: String },

    /// A switch was toggled after it had been given a value.
    #[error("unexpected boolean '{token}' after set to value {previous}")]
    UnexpectedBoolean { token: String, previous: String },

    #[error("unexpected value specified with no- prefix: {0}")]
    UnexpectedNegationValue(String),

    #[error("missing positional arguments: {}", .0.join(", "))]
    MissingPositional(Vec<String>),

    #[error("unexpected epilogue: {0:?}")]
    UnexpectedEpilogue(Vec<String>),

    #[error("arguments are frozen once parsed")]
    AlreadyBound,

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
