//! Typed document references.
//!
//! Clients link entities with `collection/id` path strings (for example
//! `users/01h2xcejqtf2nbrexx3vqjhp41`). [`EntityRef`] parses and formats
//! those paths once, at the boundary, so the rest of the engine works with
//! a validated kind + id pair instead of raw strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The collection a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// `users/<id>`
    User,
    /// `pets/<id>`
    Pet,
    /// `photos/<id>`
    Photo,
    /// `contests/<id>`
    Contest,
    /// `connections/<id>`
    Connection,
    /// `guardian_requests/<id>`
    GuardianRequest,
}

impl RefKind {
    /// Collection segment used in the path form.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Pet => "pets",
            Self::Photo => "photos",
            Self::Contest => "contests",
            Self::Connection => "connections",
            Self::GuardianRequest => "guardian_requests",
        }
    }

    fn from_collection(s: &str) -> Option<Self> {
        match s {
            "users" => Some(Self::User),
            "pets" => Some(Self::Pet),
            "photos" => Some(Self::Photo),
            "contests" => Some(Self::Contest),
            "connections" => Some(Self::Connection),
            "guardian_requests" => Some(Self::GuardianRequest),
            _ => None,
        }
    }
}

/// Error parsing an entity reference path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefParseError {
    #[error("reference is not of the form <collection>/<id>: {0}")]
    Malformed(String),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("reference has an empty id")]
    EmptyId,
}

/// A validated `collection/id` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    kind: RefKind,
    id: String,
}

impl EntityRef {
    /// Build a reference from a kind and an id.
    #[must_use]
    pub fn new(kind: RefKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// The collection this reference points into.
    #[must_use]
    pub const fn kind(&self) -> RefKind {
        self.kind
    }

    /// The bare document id, with the collection prefix stripped.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.collection(), self.id)
    }
}

impl FromStr for EntityRef {
    type Err = RefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (collection, id) = s
            .split_once('/')
            .ok_or_else(|| RefParseError::Malformed(s.to_string()))?;

        let kind = RefKind::from_collection(collection)
            .ok_or_else(|| RefParseError::UnknownCollection(collection.to_string()))?;

        if id.is_empty() || id.contains('/') {
            return Err(RefParseError::EmptyId);
        }

        Ok(Self::new(kind, id))
    }
}

impl Serialize for EntityRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
