//! Editable-property descriptors for things
//!
//! Each thing variant exposes its own editable fields as data, so the
//! property dialog stays outside the core: the UI renders descriptors,
//! collects new values, and writes them back through `set_property`.

use thiserror::Error;

use crate::thing::{Thing, ThingKind};

/// A typed property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Int(i64),
    Text(String),
}

/// One editable field of a thing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("'{kind}' things have no property '{key}'")]
    UnknownKey { kind: &'static str, key: String },
    #[error("property '{key}' expects a {expected} value")]
    WrongKind {
        key: &'static str,
        expected: &'static str,
    },
}

impl Thing {
    /// The editable fields of this thing, current values included
    pub fn properties(&self) -> Vec<PropertyDescriptor> {
        match &self.kind {
            ThingKind::Character { name, health } => vec![
                PropertyDescriptor {
                    key: "name",
                    label: "Name",
                    value: PropertyValue::Text(name.clone()),
                },
                PropertyDescriptor {
                    key: "health",
                    label: "Health",
                    value: PropertyValue::Int(*health as i64),
                },
                PropertyDescriptor {
                    key: "path",
                    label: "Path",
                    value: PropertyValue::Text(self.path.clone()),
                },
            ],
            ThingKind::Item => vec![PropertyDescriptor {
                key: "path",
                label: "Path",
                value: PropertyValue::Text(self.path.clone()),
            }],
        }
    }

    /// Write one editable field back. Unknown keys and mismatched value
    /// kinds are rejected without touching the thing.
    pub fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let kind = self.type_name();
        match (&mut self.kind, key, value) {
            (ThingKind::Character { name, .. }, "name", PropertyValue::Text(text)) => {
                *name = text;
                Ok(())
            }
            (ThingKind::Character { .. }, "name", _) => Err(PropertyError::WrongKind {
                key: "name",
                expected: "text",
            }),
            (ThingKind::Character { health, .. }, "health", PropertyValue::Int(value)) => {
                *health = value as i32;
                Ok(())
            }
            (ThingKind::Character { .. }, "health", _) => Err(PropertyError::WrongKind {
                key: "health",
                expected: "integer",
            }),
            (_, "path", PropertyValue::Text(text)) => {
                self.path = text;
                Ok(())
            }
            (_, "path", _) => Err(PropertyError::WrongKind {
                key: "path",
                expected: "text",
            }),
            (_, key, _) => Err(PropertyError::UnknownKey {
                kind,
                key: key.to_string(),
            }),
        }
    }
}
