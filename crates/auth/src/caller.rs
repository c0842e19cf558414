use serde::{Deserialize, Serialize};

use salonbook_core::Identity;

/// The authenticated principal making a request.
///
/// An unauthenticated request has no `Caller` at all (`Option<&Caller>`), so
/// "authenticated" is never a flag that can disagree with the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub identity: Identity,
    pub email: Option<String>,
}

impl Caller {
    pub fn new(identity: Identity, email: Option<String>) -> Self {
        Self { identity, email }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
