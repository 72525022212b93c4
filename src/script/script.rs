use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Language assumed when a script does not name one.
pub const DEFAULT_SCRIPT_LANG: &str = "expression";

fn default_lang() -> String {
    DEFAULT_SCRIPT_LANG.to_string()
}

/// Description of a scoring script, as written in a search request.
///
/// `Script` identifies a script: two queries using equal scripts are equal.
/// It does not execute anything; see [`ScoreScriptFactory`](super::ScoreScriptFactory).
///
/// ```rust
/// use tantivy_script_score::script::Script;
///
/// let script: Script = serde_json::from_str(r#"{
///     "source": "_score * params.factor",
///     "params": {"factor": 2}
/// }"#).unwrap();
/// assert_eq!(script.lang(), "expression");
/// assert_eq!(
///     script.to_string(),
///     "Script{lang='expression', source='_score * params.factor', params={\"factor\":2}}"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_lang")]
    lang: String,
    source: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, serde_json::Value>,
}

impl Script {
    /// Creates a script written in the default language, without parameters.
    pub fn new<S: ToString>(source: S) -> Script {
        Script::with_lang(DEFAULT_SCRIPT_LANG, source)
    }

    /// Creates a script written in `lang`, without parameters.
    pub fn with_lang<L: ToString, S: ToString>(lang: L, source: S) -> Script {
        Script {
            lang: lang.to_string(),
            source: source.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a parameter.
    pub fn with_param<K: ToString>(mut self, key: K, value: serde_json::Value) -> Script {
        self.params.insert(key.to_string(), value);
        self
    }

    /// Returns the language of the script.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Returns the source of the script.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the script parameters.
    pub fn params(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.params
    }
}

impl Hash for Script {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lang.hash(state);
        self.source.hash(state);
        for (key, value) in &self.params {
            key.hash(state);
            value.to_string().hash(state);
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = serde_json::Value::Object(
            self.params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        );
        write!(
            f,
            "Script{{lang='{}', source='{}', params={}}}",
            self.lang, self.source, params
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use serde_json::json;

    use super::Script;

    fn hash_of(script: &Script) -> u64 {
        let mut hasher = DefaultHasher::new();
        script.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_script_display() {
        let script = Script::with_lang("painless", "doc['likes'].value").with_param("a", json!(1.5));
        assert_eq!(
            script.to_string(),
            "Script{lang='painless', source='doc['likes'].value', params={\"a\":1.5}}"
        );
    }

    #[test]
    fn test_script_equality_and_hash() {
        let left = Script::new("_score").with_param("factor", json!(2));
        let right = Script::new("_score").with_param("factor", json!(2));
        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));
        assert_ne!(left, Script::new("_score").with_param("factor", json!(3)));
        assert_ne!(left, Script::with_lang("painless", "_score").with_param("factor", json!(2)));
    }

    #[test]
    fn test_script_serde() {
        let script: Script = serde_json::from_str(r#"{"source": "doc * 10"}"#).unwrap();
        assert_eq!(script, Script::new("doc * 10"));
        assert_eq!(
            serde_json::to_string(&script).unwrap(),
            r#"{"lang":"expression","source":"doc * 10"}"#
        );
        assert!(serde_json::from_str::<Script>(r#"{"lang": "expression"}"#).is_err());
    }
}
