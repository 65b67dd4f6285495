//! Canonical serializers from `Token` trees back to source text
//!
//! Writing is a pure formatting step: any tree serializes, no validation
//! happens here, and re-parsing the output yields a structurally equal tree.

use crate::Token;

/// Serialize a token on a single line: `(head child child ...)`.
///
/// Scalar leaves are written as bare atoms; composites wrap their head and
/// children in a delimiter pair, children in order, space separated.
pub fn write(token: &Token) -> String {
    let mut out = String::new();
    write_flat(token, &mut out);
    out
}

/// Serialize a token in the indented on-disk form.
///
/// Groups that contain nested groups put each child on its own line; groups
/// of plain atoms stay on one line. Both forms re-parse identically.
pub fn write_pretty(token: &Token) -> String {
    let mut out = String::new();
    write_indented(token, 0, &mut out);
    out.push('\n');
    out
}

fn write_flat(token: &Token, out: &mut String) {
    if token.is_leaf() {
        out.push_str(&token.name);
        return;
    }
    out.push('(');
    out.push_str(&token.name);
    for child in &token.children {
        out.push(' ');
        write_flat(child, out);
    }
    out.push(')');
}

fn write_indented(token: &Token, depth: usize, out: &mut String) {
    let flat_children = token.children.iter().all(Token::is_leaf);
    if token.is_leaf() || flat_children {
        write_flat(token, out);
        return;
    }
    out.push('(');
    out.push_str(&token.name);
    for child in &token.children {
        out.push('\n');
        for _ in 0..(depth + 1) {
            out.push_str("  ");
        }
        write_indented(child, depth + 1, out);
    }
    out.push(')');
}
