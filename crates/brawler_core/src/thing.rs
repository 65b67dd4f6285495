//! Placed objects: characters and items

use brawler_token::{Token, TokenError};
use uuid::Uuid;

use crate::LoadError;

/// Name given to a character placed interactively, before it is edited
pub const DEFAULT_NAME: &str = "TempName";
/// Health given to a character placed interactively
pub const DEFAULT_HEALTH: i32 = 40;

/// Type-specific payload of a placed thing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingKind {
    Character { name: String, health: i32 },
    Item,
}

/// An object placed in a block.
///
/// Coordinates are local to the owning block's origin, not the level's world
/// origin. `id` and `selected` are editing-session state: they identify and
/// mark the instance while it is being manipulated and are never persisted.
#[derive(Debug, Clone)]
pub struct Thing {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    /// Depth coordinate carried through from `coords`; hit-testing ignores it.
    pub z: i32,
    /// Source-data reference (the template file this thing was placed from)
    pub path: String,
    pub selected: bool,
    pub kind: ThingKind,
}

// Instance identity and selection are transient, so equivalence is over the
// persisted fields only.
impl PartialEq for Thing {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.path == other.path
            && self.kind == other.kind
    }
}

impl Thing {
    /// Create a character at block-local coordinates with placement defaults
    pub fn new_character(x: i32, y: i32, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            z: 0,
            path: path.into(),
            selected: false,
            kind: ThingKind::Character {
                name: DEFAULT_NAME.to_string(),
                health: DEFAULT_HEALTH,
            },
        }
    }

    /// Create an item at block-local coordinates
    pub fn new_item(x: i32, y: i32, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            z: 0,
            path: path.into(),
            selected: false,
            kind: ThingKind::Item,
        }
    }

    /// The token head name for this thing's type
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ThingKind::Character { .. } => "character",
            ThingKind::Item => "item",
        }
    }

    /// Label shown in object lists: a character's name, an item's file stem
    pub fn display_name(&self) -> String {
        match &self.kind {
            ThingKind::Character { name, .. } => name.clone(),
            ThingKind::Item => std::path::Path::new(&self.path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("item")
                .to_string(),
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Build a thing from a `character` or `item` token subtree.
    ///
    /// `coords` is required; `name`, `health` and `path` fall back to the
    /// same defaults interactive placement uses. Any other head name is an
    /// unknown-type error naming the offender.
    pub fn from_token(token: &Token) -> Result<Self, LoadError> {
        let kind = match token.name.as_str() {
            "character" => ThingKind::Character {
                name: opt_str(token, "name", "character")?
                    .unwrap_or_else(|| DEFAULT_NAME.to_string()),
                health: opt_int(token, "health", "character")?.unwrap_or(DEFAULT_HEALTH as i64)
                    as i32,
            },
            "item" => ThingKind::Item,
            other => {
                return Err(LoadError::UnknownType {
                    name: other.to_string(),
                    context: "block",
                })
            }
        };
        let node = match kind {
            ThingKind::Character { .. } => "character",
            ThingKind::Item => "item",
        };

        let coords = token.find("coords").ok_or(LoadError::MissingField {
            node,
            field: "coords",
        })?;
        let x = coords.read_int(0).map_err(|source| bad(node, source))? as i32;
        let y = coords.read_int(1).map_err(|source| bad(node, source))? as i32;
        let z = match coords.read_int(2) {
            Ok(z) => z as i32,
            Err(TokenError::Missing { .. }) => 0,
            Err(source) => return Err(bad(node, source)),
        };
        let path = opt_str(token, "path", node)?.unwrap_or_default();

        Ok(Self {
            id: Uuid::new_v4(),
            x,
            y,
            z,
            path,
            selected: false,
            kind,
        })
    }

    /// Serialize to a token subtree. Fixed child order; an empty path is
    /// omitted and reads back as empty.
    pub fn to_token(&self) -> Token {
        let mut token = Token::new(self.type_name());
        if let ThingKind::Character { name, .. } = &self.kind {
            token.push_group("name", [name.as_str()]);
        }
        token.push_group(
            "coords",
            [self.x.to_string(), self.y.to_string(), self.z.to_string()],
        );
        if let ThingKind::Character { health, .. } = &self.kind {
            token.push_group("health", [health.to_string()]);
        }
        if !self.path.is_empty() {
            token.push_group("path", [self.path.as_str()]);
        }
        token
    }
}

fn bad(node: &'static str, source: TokenError) -> LoadError {
    LoadError::BadValue { node, source }
}

/// Optional single-atom field: absent head means `None`, a present head with
/// a malformed payload is an error.
pub(crate) fn opt_str(
    token: &Token,
    name: &str,
    node: &'static str,
) -> Result<Option<String>, LoadError> {
    match token.find(name) {
        None => Ok(None),
        Some(field) => field
            .read_str(0)
            .map(|s| Some(s.to_string()))
            .map_err(|source| LoadError::BadValue { node, source }),
    }
}

/// Optional single-integer field, same rules as [`opt_str`]
pub(crate) fn opt_int(
    token: &Token,
    name: &str,
    node: &'static str,
) -> Result<Option<i64>, LoadError> {
    match token.find(name) {
        None => Ok(None),
        Some(field) => field
            .read_int(0)
            .map(Some)
            .map_err(|source| LoadError::BadValue { node, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawler_token::parse_all;

    fn parse_thing(source: &str) -> Result<Thing, LoadError> {
        let tokens = parse_all(source).unwrap();
        Thing::from_token(&tokens[0])
    }

    #[test]
    fn test_character_from_token() {
        let thing = parse_thing("(character (coords 10 20 0) (health 40))").unwrap();
        assert_eq!((thing.x, thing.y, thing.z), (10, 20, 0));
        assert_eq!(
            thing.kind,
            ThingKind::Character {
                name: DEFAULT_NAME.to_string(),
                health: 40
            }
        );
        assert_eq!(thing.path, "");
    }

    #[test]
    fn test_item_from_token() {
        let thing = parse_thing("(item (coords 5 6) (path data/misc/apple/apple.txt))").unwrap();
        assert_eq!((thing.x, thing.y, thing.z), (5, 6, 0));
        assert_eq!(thing.kind, ThingKind::Item);
        assert_eq!(thing.display_name(), "apple");
    }

    #[test]
    fn test_missing_coords_is_a_load_error() {
        let err = parse_thing("(character (health 40))").unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingField {
                node: "character",
                field: "coords"
            }
        );
    }

    #[test]
    fn test_unknown_head_is_rejected() {
        let err = parse_thing("(widget (coords 1 2))").unwrap_err();
        assert_eq!(
            err,
            LoadError::UnknownType {
                name: "widget".to_string(),
                context: "block"
            }
        );
    }

    #[test]
    fn test_garbage_coordinate_is_a_bad_value() {
        let err = parse_thing("(item (coords 1 here))").unwrap_err();
        assert!(matches!(err, LoadError::BadValue { node: "item", .. }));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let thing = parse_thing(
            "(character (name Billy) (coords 40 12 3) (health 85) (path data/chars/billy/billy.txt))",
        )
        .unwrap();
        let reparsed = Thing::from_token(&thing.to_token()).unwrap();
        assert_eq!(reparsed, thing);
        assert_ne!(reparsed.id, thing.id);
    }

    #[test]
    fn test_placement_defaults_serialize_fully() {
        let placed = Thing::new_character(15, 30, "data/chars/angel/angel.txt");
        let token = placed.to_token();
        assert_eq!(token.find("name").unwrap().read_str(0), Ok(DEFAULT_NAME));
        assert_eq!(
            token.find("health").unwrap().read_int(0),
            Ok(DEFAULT_HEALTH as i64)
        );
        assert_eq!(
            token.find("path").unwrap().read_str(0),
            Ok("data/chars/angel/angel.txt")
        );
    }

    #[test]
    fn test_empty_path_round_trips_as_absent() {
        let thing = parse_thing("(item (coords 1 2))").unwrap();
        assert!(thing.to_token().find("path").is_none());
        let reparsed = Thing::from_token(&thing.to_token()).unwrap();
        assert_eq!(reparsed.path, "");
    }
}
