//! Error taxonomy shared by the typed API and the embeddable op surface.

use thiserror::Error;

/// Failures surfaced by the hashing facade.
///
/// Every operation reports through this one enum. The two historical
/// failure strings of the crypt surface, `fail to crypt` and
/// `malloc error`, are kept as stable message prefixes so callers that
/// match on them keep working.
#[derive(Debug, Error)]
pub enum CryptError {
    /// An operation was invoked with the wrong number of arguments.
    #[error("wrong number of arguments to '{op}' (expected {expected}, got {got})")]
    WrongArity {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    /// An argument could not be read as the required type.
    #[error("bad argument #{index} to '{op}' ({expected} expected)")]
    BadArgument {
        op: &'static str,
        index: usize,
        expected: &'static str,
    },

    /// Scratch storage for a reentrant call could not be obtained.
    #[error("malloc error: {0}")]
    AllocFailed(String),

    /// The underlying hash primitive rejected the input or failed outright.
    #[error("fail to crypt: {0}")]
    CryptFailed(String),

    /// A salt synthesis parameter was out of range.
    #[error("invalid salt parameter: {0}")]
    InvalidSalt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_the_historical_prefixes() {
        let arity = CryptError::WrongArity {
            op: "crypt",
            expected: 2,
            got: 3,
        };
        assert_eq!(
            arity.to_string(),
            "wrong number of arguments to 'crypt' (expected 2, got 3)"
        );

        let argument = CryptError::BadArgument {
            op: "set_format",
            index: 1,
            expected: "integer",
        };
        assert_eq!(
            argument.to_string(),
            "bad argument #1 to 'set_format' (integer expected)"
        );

        assert_eq!(
            CryptError::AllocFailed("context".into()).to_string(),
            "malloc error: context"
        );
        assert_eq!(
            CryptError::CryptFailed("bad salt".into()).to_string(),
            "fail to crypt: bad salt"
        );
        assert_eq!(
            CryptError::InvalidSalt("cost 99".into()).to_string(),
            "invalid salt parameter: cost 99"
        );
    }
}
