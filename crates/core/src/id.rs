//! Strongly-typed identifiers used across the domain.
//!
//! Identities come from the hosted authentication layer and are opaque
//! strings, so every identifier here wraps a validated `String`.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Authenticated principal identity (the auth provider's user id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

/// Identifier of a salon (the tenant boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalonId(String);

/// Identifier of a document within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

fn validate(raw: &str, name: &str) -> Result<(), DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: empty")));
    }
    if raw.contains('/') {
        return Err(DomainError::invalid_id(format!(
            "{name}: '{raw}' contains a path separator"
        )));
    }
    Ok(())
}

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build an identifier, rejecting empty values and path separators.
            pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
                let raw = raw.into();
                validate(&raw, $name)?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(Identity, "Identity");
impl_string_newtype!(SalonId, "SalonId");
impl_string_newtype!(DocumentId, "DocumentId");

impl DocumentId {
    /// Generate a fresh document id.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl SalonId {
    /// The salon id a legacy salon document would carry for this owner.
    ///
    /// Salons created before explicit ownership used the owner's identity as
    /// their key.
    pub fn for_owner(owner: &Identity) -> Self {
        Self(owner.0.clone())
    }

    pub fn as_document_id(&self) -> DocumentId {
        DocumentId(self.0.clone())
    }
}

impl Identity {
    /// Whether this identity is the key of the given salon (legacy 1:1 scheme).
    pub fn is_salon_key(&self, salon_id: &SalonId) -> bool {
        self.0 == salon_id.0
    }

    pub fn as_document_id(&self) -> DocumentId {
        DocumentId(self.0.clone())
    }
}
