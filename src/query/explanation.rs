use std::fmt;

use serde::Serialize;

use crate::Score;

fn is_true(value: &bool) -> bool {
    *value
}

/// Object describing the score of a given document.
/// It is organized in trees.
///
/// `.to_pretty_json()` can be useful to print out a human readable
/// representation of this tree when debugging a given score.
///
/// A no-match explanation tells why a document is not part of the
/// result set. Its value is `0`.
#[derive(Clone, Serialize, PartialEq)]
pub struct Explanation {
    value: Score,
    #[serde(rename = "match", skip_serializing_if = "is_true")]
    is_match: bool,
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<Explanation>,
}

impl fmt::Debug for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Explanation({})", self.to_pretty_json())
    }
}

impl Explanation {
    /// Creates a new explanation object.
    pub fn new<T: ToString>(description: T, value: Score) -> Explanation {
        Explanation {
            value,
            is_match: true,
            description: description.to_string(),
            details: vec![],
        }
    }

    /// Creates an explanation for a document that does not match,
    /// wrapping the explanation of the reason why.
    pub fn no_match<T: ToString>(description: T, detail: Explanation) -> Explanation {
        let mut explanation = Explanation::does_not_match(description);
        explanation.add_detail(detail);
        explanation
    }

    /// Creates a leaf explanation for a document that does not match.
    pub fn does_not_match<T: ToString>(description: T) -> Explanation {
        Explanation {
            value: 0.0,
            is_match: false,
            description: description.to_string(),
            details: vec![],
        }
    }

    /// Returns the value associated to the current node.
    pub fn value(&self) -> Score {
        self.value
    }

    /// Returns false if the document described does not match.
    pub fn is_match(&self) -> bool {
        self.is_match
    }

    /// Returns the description of the current node.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the children of the current node.
    pub fn details(&self) -> &[Explanation] {
        &self.details
    }

    /// Add some detail, explaining some part of the current node formula.
    ///
    /// Details are treated as child of the current node.
    pub fn add_detail(&mut self, child_explanation: Explanation) {
        self.details.push(child_explanation);
    }

    /// Shortcut for `self.details.push(Explanation::new(name, value));`
    pub fn add_const<T: ToString>(&mut self, name: T, value: Score) {
        self.details.push(Explanation::new(name, value));
    }

    /// Returns an indented json representation of the explanation tree for debug usage.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap()
    }
}
