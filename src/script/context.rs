use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ScriptScoreError;

/// Version of the index format a shard was created with.
///
/// Scripts may adapt their behavior to it. Its string form is `major.minor.patch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl IndexVersion {
    /// Creates a version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> IndexVersion {
        IndexVersion {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for IndexVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for IndexVersion {
    type Err = ScriptScoreError;

    fn from_str(version_str: &str) -> Result<IndexVersion, ScriptScoreError> {
        let invalid = || {
            ScriptScoreError::InvalidArgument(format!(
                "Invalid index version `{version_str}`, expected `major.minor.patch`"
            ))
        };
        let mut parts = version_str.trim().split('.');
        let mut next_part = || -> Result<u32, ScriptScoreError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u32>()
                .map_err(|_| invalid())
        };
        let version = IndexVersion::new(next_part()?, next_part()?, next_part()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl TryFrom<String> for IndexVersion {
    type Error = ScriptScoreError;

    fn try_from(version_str: String) -> Result<IndexVersion, ScriptScoreError> {
        version_str.parse()
    }
}

impl From<IndexVersion> for String {
    fn from(version: IndexVersion) -> String {
        version.to_string()
    }
}

/// Immutable search context handed to every script instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptContext {
    index_name: String,
    shard_id: u32,
    index_version: IndexVersion,
}

impl ScriptContext {
    /// Creates a new script context.
    pub fn new<S: ToString>(index_name: S, shard_id: u32, index_version: IndexVersion) -> Self {
        ScriptContext {
            index_name: index_name.to_string(),
            shard_id,
            index_version,
        }
    }

    /// Name of the index being searched.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Id of the shard being searched.
    pub fn shard_id(&self) -> u32 {
        self.shard_id
    }

    /// Format version of the index being searched.
    pub fn index_version(&self) -> IndexVersion {
        self.index_version
    }
}
