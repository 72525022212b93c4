use std::fmt;

/// Term represents the value that the token can take.
///
/// It is a field name associated to a textual value. Queries report the terms
/// they search for through [`Query::query_terms`](crate::query::Query::query_terms),
/// which is what highlighters rely on.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    field: String,
    text: String,
}

impl Term {
    /// Builds a term given a field name and a text.
    pub fn from_field_text(field: &str, text: &str) -> Term {
        Term {
            field: field.to_string(),
            text: text.to_string(),
        }
    }

    /// Returns the field name of the term.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the text of the term.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Term(field={:?}, text={:?})", self.field, self.text)
    }
}
