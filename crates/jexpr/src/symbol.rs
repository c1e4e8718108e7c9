//! Node classification and symbol-prefix handling

use crate::value::Value;

/// The character that marks symbol references.
///
/// A string starting with the prefix is a symbol; a string starting with the
/// prefix twice is an escaped literal with one prefix removed. Two evaluators
/// exchanging expressions must agree on the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix(char);

impl Default for Prefix {
    fn default() -> Self {
        Prefix('$')
    }
}

impl Prefix {
    /// Create a prefix from a character.
    pub fn new(c: char) -> Self {
        Prefix(c)
    }

    /// The prefix character.
    pub fn as_char(self) -> char {
        self.0
    }

    /// Remove one leading prefix, if present.
    pub fn strip(self, s: &str) -> Option<&str> {
        s.strip_prefix(self.0)
    }

    /// Remove one leading prefix if present, otherwise return `s` unchanged.
    ///
    /// Used for keywords and binding names, which may be written bare.
    pub fn name(self, s: &str) -> &str {
        self.strip(s).unwrap_or(s)
    }

    /// Classify an expression node by shape.
    pub fn classify(self, expr: &Value) -> Node<'_> {
        match expr {
            Value::String(s) => match self.strip(s.as_str()) {
                Some(rest) if rest.starts_with(self.0) => Node::Escaped(rest),
                Some(name) => Node::Symbol(name),
                None => Node::Text(s.as_str()),
            },
            Value::List(items) => match items.split_first() {
                Some((head, operands)) => Node::Form { head, operands },
                None => Node::EmptyForm,
            },
            other => Node::Literal(other),
        }
    }
}

/// The syntactic shape of an expression node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// Non-string atom (number, bool, null, map) or runtime value
    Literal(&'a Value),

    /// Plain string, evaluates to itself
    Text(&'a str),

    /// Doubled-prefix string; the payload has one prefix removed
    Escaped(&'a str),

    /// Symbol reference; the payload is the name without prefix
    Symbol(&'a str),

    /// Non-empty list: special form or application
    Form {
        /// First element
        head: &'a Value,
        /// Remaining elements, unevaluated
        operands: &'a [Value],
    },

    /// `[]`, which has no head to apply
    EmptyForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_strings() {
        let p = Prefix::default();
        let symbol = Value::string("$add");
        let escaped = Value::string("$$add");
        let text = Value::string("add");

        assert_eq!(p.classify(&symbol), Node::Symbol("add"));
        assert_eq!(p.classify(&escaped), Node::Escaped("$add"));
        assert_eq!(p.classify(&text), Node::Text("add"));
    }

    #[test]
    fn test_escape_strips_only_one_prefix() {
        let p = Prefix::default();
        let v = Value::string("$$$x");
        assert_eq!(p.classify(&v), Node::Escaped("$$x"));
    }

    #[test]
    fn test_prefix_alone_is_empty_symbol() {
        let p = Prefix::default();
        let v = Value::string("$");
        assert_eq!(p.classify(&v), Node::Symbol(""));
    }

    #[test]
    fn test_classify_forms() {
        let p = Prefix::default();
        let form = Value::from(serde_json::json!(["$add", 1, 2]));
        match p.classify(&form) {
            Node::Form { head, operands } => {
                assert_eq!(head, &Value::string("$add"));
                assert_eq!(operands.len(), 2);
            }
            other => panic!("expected form, got {:?}", other),
        }
        assert_eq!(p.classify(&Value::list(vec![])), Node::EmptyForm);
    }

    #[test]
    fn test_classify_literals() {
        let p = Prefix::default();
        assert_eq!(p.classify(&Value::Int(1)), Node::Literal(&Value::Int(1)));
        assert_eq!(p.classify(&Value::Null), Node::Literal(&Value::Null));
    }

    #[test]
    fn test_custom_prefix() {
        let p = Prefix::new('@');
        let at = Value::string("@x");
        let dollar = Value::string("$x");
        assert_eq!(p.classify(&at), Node::Symbol("x"));
        assert_eq!(p.classify(&dollar), Node::Text("$x"));
        assert_eq!(p.name("@if"), "if");
        assert_eq!(p.name("if"), "if");
    }
}
