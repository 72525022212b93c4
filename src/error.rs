//! Definition of the crate's error and result.

use thiserror::Error;

use crate::{DocId, Score};

/// The library's failure based error enum
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScriptScoreError {
    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// A script returned a score that cannot be ranked (NaN or negative infinity).
    ///
    /// This signals a defective script, not a data condition.
    #[error("script score query returned an invalid score: {score} for doc: {doc}")]
    InvalidScore {
        /// The offending score.
        score: Score,
        /// The segment-local document being scored.
        doc: DocId,
    },
    /// The script failed while executing.
    #[error("Script error: '{0}'")]
    ScriptError(String),
    /// An internal invariant was broken.
    #[error("Internal error: '{0}'")]
    InternalError(String),
    /// An Error happened in one of the thread.
    #[error("An error occurred in a thread: '{0}'")]
    ErrorInThread(String),
    /// System error. (e.g.: We failed spawning a new thread)
    #[error("System error.'{0}'")]
    SystemError(String),
}

impl From<rayon::ThreadPoolBuildError> for ScriptScoreError {
    fn from(error: rayon::ThreadPoolBuildError) -> ScriptScoreError {
        ScriptScoreError::SystemError(error.to_string())
    }
}

impl From<serde_json::Error> for ScriptScoreError {
    fn from(error: serde_json::Error) -> ScriptScoreError {
        ScriptScoreError::InvalidArgument(error.to_string())
    }
}
