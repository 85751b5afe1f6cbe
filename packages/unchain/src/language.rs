use derive_more::Display;

pub const EPSILON: &str = "ε";

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl ToString) -> Self {
        let s = s.to_string();
        assert!(!s.is_empty(), "grammar symbols must not be empty");

        Symbol(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
