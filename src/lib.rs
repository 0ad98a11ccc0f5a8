// reqlwire - ReQL query construction and wire encoding
// Builds RethinkDB query term trees and renders them as JSON wire terms

#![warn(rust_2018_idioms)]

pub mod config;
pub mod reql;

// Re-exports for convenience
pub use crate::config::ReqlConfig;
pub use error::{Error, Result};
pub use reql::{encode, make_function, make_term, r, Arg, Arguments, Datum, OptArgs, Term, TermType};

/// Error types for term construction, encoding and decoding.
pub mod error {
    use crate::reql::{ArgPosition, Arity, TermType};
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        /// A value could not be turned into a term.
        #[error("cannot build a term from the value at {path}: {reason}")]
        Construction { path: String, reason: String },

        #[error("{term} does not accept the optional argument `{option}`")]
        UnsupportedOption { option: String, term: TermType },

        #[error("{term} expects {expected} positional argument(s), got {actual}")]
        Arity {
            term: TermType,
            expected: Arity,
            actual: usize,
        },

        /// Raised once, by the innermost parent of the sub-term that failed.
        #[error("cannot encode {term} at {position} of {parent}: {source}")]
        Encode {
            parent: TermType,
            position: ArgPosition,
            term: TermType,
            #[source]
            source: Box<Error>,
        },

        #[error("unencodable value: {0}")]
        Unencodable(String),

        #[error("term nesting exceeds the maximum depth of {0}")]
        DepthExceeded(usize),

        #[error("invalid wire term at {path}: {reason}")]
        Decode { path: String, reason: String },

        #[error("configuration error: {0}")]
        Config(String),

        #[error("serialization error: {0}")]
        Serialization(#[from] serde_json::Error),
    }

    impl Error {
        pub(crate) fn construction(path: impl Into<String>, reason: impl Into<String>) -> Self {
            Error::Construction {
                path: path.into(),
                reason: reason.into(),
            }
        }

        pub(crate) fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
            Error::Decode {
                path: path.into(),
                reason: reason.into(),
            }
        }
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
