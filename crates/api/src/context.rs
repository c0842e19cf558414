use salonbook_auth::Caller;

/// Caller context for a request.
///
/// Present on every request; `caller()` is `None` for anonymous visitors
/// (the public booking page).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerContext {
    caller: Option<Caller>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    pub fn authenticated(caller: Caller) -> Self {
        Self {
            caller: Some(caller),
        }
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }
}
