//! Blocks: length-bounded segments of a level's world axis

use brawler_token::Token;
use uuid::Uuid;

use crate::thing::{opt_int, Thing};
use crate::LoadError;

/// A contiguous segment of world space holding placed things.
///
/// Blocks concatenate in level order into one world axis; a disabled block
/// keeps its contents but contributes no width to the visible axis.
/// `highlight` marks the block the selection UI is pointing at and is not
/// persisted.
#[derive(Debug, Clone)]
pub struct Block {
    length: i32,
    pub finish: i32,
    pub enabled: bool,
    pub highlight: bool,
    things: Vec<Thing>,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            length: 0,
            finish: 0,
            enabled: true,
            highlight: false,
            things: Vec::new(),
        }
    }
}

// Highlight is transient view state; equivalence covers the persisted fields.
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.finish == other.finish
            && self.enabled == other.enabled
            && self.things == other.things
    }
}

impl Block {
    pub fn new(length: i32) -> Self {
        Self {
            length: length.max(0),
            ..Self::default()
        }
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    /// Set the block length in world units; negative lengths clamp to zero.
    pub fn set_length(&mut self, length: i32) {
        self.length = length.max(0);
    }

    pub fn things(&self) -> &[Thing] {
        &self.things
    }

    pub fn add_thing(&mut self, thing: Thing) {
        self.things.push(thing);
    }

    /// Remove a thing by instance id, returning it if it was here
    pub fn remove_thing(&mut self, id: Uuid) -> Option<Thing> {
        let index = self.things.iter().position(|t| t.id == id)?;
        Some(self.things.remove(index))
    }

    pub fn has_thing(&self, id: Uuid) -> bool {
        self.things.iter().any(|t| t.id == id)
    }

    pub fn find_thing(&self, id: Uuid) -> Option<&Thing> {
        self.things.iter().find(|t| t.id == id)
    }

    pub fn find_thing_mut(&mut self, id: Uuid) -> Option<&mut Thing> {
        self.things.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn things_mut(&mut self) -> impl Iterator<Item = &mut Thing> {
        self.things.iter_mut()
    }

    /// Build a block from a `block` token subtree.
    ///
    /// `length` is required; `finish` defaults to 0 and `enabled` to true.
    /// Everything else in the group must be a thing subtree - an unknown
    /// head fails the load rather than being skipped.
    pub fn from_token(token: &Token) -> Result<Self, LoadError> {
        if token.name != "block" {
            return Err(LoadError::WrongHead {
                expected: "block",
                found: token.name.clone(),
            });
        }

        let length = opt_int(token, "length", "block")?.ok_or(LoadError::MissingField {
            node: "block",
            field: "length",
        })? as i32;
        let finish = opt_int(token, "finish", "block")?.unwrap_or(0) as i32;
        let enabled = opt_int(token, "enabled", "block")?.map(|v| v != 0).unwrap_or(true);

        let mut block = Block::new(length);
        block.finish = finish;
        block.enabled = enabled;

        for child in &token.children {
            match child.name.as_str() {
                "length" | "finish" | "enabled" => {}
                _ => block.add_thing(Thing::from_token(child)?),
            }
        }
        Ok(block)
    }

    /// Serialize to a `block` token subtree, things in placement order
    pub fn to_token(&self) -> Token {
        let mut token = Token::new("block");
        token.push_group("length", [self.length.to_string()]);
        token.push_group("finish", [self.finish.to_string()]);
        token.push_group("enabled", [if self.enabled { "1" } else { "0" }]);
        for thing in &self.things {
            token.push(thing.to_token());
        }
        token
    }
}
