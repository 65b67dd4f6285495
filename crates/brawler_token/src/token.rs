//! The recursive token tree node

use std::fmt;
use thiserror::Error;

/// Errors produced by positional reads against an already-parsed token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token '{head}' has no child at index {index}")]
    Missing { head: String, index: usize },
    #[error("child {index} of token '{head}' is not an integer: '{text}'")]
    NotAnInt {
        head: String,
        index: usize,
        text: String,
    },
}

/// A node in the token tree.
///
/// A token is either a composite (`name` heads an ordered list of children)
/// or a scalar leaf (no children; `name` holds the literal atom text). Child
/// order is significant - it encodes positional fields like `coords x y z` -
/// and duplicate head names are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub name: String,
    pub children: Vec<Token>,
}

impl Token {
    /// Create a token with no children (a leaf, until children are added)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create a composite token from its children
    pub fn with_children(name: impl Into<String>, children: Vec<Token>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// True when this token carries no structure of its own
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child token
    pub fn push(&mut self, child: Token) {
        self.children.push(child);
    }

    /// Append a scalar leaf child
    pub fn push_leaf(&mut self, atom: impl Into<String>) {
        self.children.push(Token::new(atom));
    }

    /// Append a `(name atom atom ...)` child group built from scalar atoms
    pub fn push_group<I, S>(&mut self, name: impl Into<String>, atoms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = atoms.into_iter().map(Token::new).collect();
        self.children.push(Token::with_children(name, children));
    }

    /// First child whose head name matches
    pub fn find(&self, name: &str) -> Option<&Token> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children whose head name matches, in order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Token> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Read child `index` as a decimal integer.
    ///
    /// Fails with a typed error when the index is out of range or the child
    /// text does not parse as an integer. This is a query against the parsed
    /// tree, not a second parse pass.
    pub fn read_int(&self, index: usize) -> Result<i64, TokenError> {
        let child = self.children.get(index).ok_or_else(|| TokenError::Missing {
            head: self.name.clone(),
            index,
        })?;
        child
            .name
            .parse::<i64>()
            .map_err(|_| TokenError::NotAnInt {
                head: self.name.clone(),
                index,
                text: child.name.clone(),
            })
    }

    /// Read child `index` as its atom text
    pub fn read_str(&self, index: usize) -> Result<&str, TokenError> {
        self.children
            .get(index)
            .map(|c| c.name.as_str())
            .ok_or_else(|| TokenError::Missing {
                head: self.name.clone(),
                index,
            })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::write(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> Token {
        let mut t = Token::new("coords");
        t.push_leaf("10");
        t.push_leaf("20");
        t.push_leaf("0");
        t
    }

    #[test]
    fn test_read_int_positional() {
        let t = coords();
        assert_eq!(t.read_int(0), Ok(10));
        assert_eq!(t.read_int(1), Ok(20));
        assert_eq!(t.read_int(2), Ok(0));
    }

    #[test]
    fn test_read_int_out_of_range() {
        let t = coords();
        assert_eq!(
            t.read_int(3),
            Err(TokenError::Missing {
                head: "coords".to_string(),
                index: 3
            })
        );
    }

    #[test]
    fn test_read_int_not_numeric() {
        let mut t = Token::new("health");
        t.push_leaf("lots");
        assert_eq!(
            t.read_int(0),
            Err(TokenError::NotAnInt {
                head: "health".to_string(),
                index: 0,
                text: "lots".to_string()
            })
        );
    }

    #[test]
    fn test_find_first_match() {
        let mut t = Token::new("character");
        t.push_group("coords", ["1", "2"]);
        t.push_group("coords", ["3", "4"]);
        let first = t.find("coords").unwrap();
        assert_eq!(first.read_int(0), Ok(1));
        assert_eq!(t.find_all("coords").count(), 2);
        assert!(t.find("missing").is_none());
    }

    #[test]
    fn test_duplicate_heads_preserved_in_order() {
        let mut t = Token::new("block");
        t.push_group("thing", ["a"]);
        t.push_group("thing", ["b"]);
        let names: Vec<&str> = t
            .find_all("thing")
            .map(|c| c.read_str(0).unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
