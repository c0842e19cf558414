//! Platform administrators.

use std::collections::BTreeSet;

use crate::Caller;

/// Emails granted cross-tenant read access.
///
/// Injected from configuration; comparison ignores case and surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: BTreeSet<String>,
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parse a comma-separated list (the `PLATFORM_ADMINS` format).
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    /// `is_platform_admin`: authenticated and the caller's email is listed.
    pub fn admits(&self, caller: Option<&Caller>) -> bool {
        caller
            .and_then(Caller::email)
            .is_some_and(|email| self.contains(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use salonbook_core::Identity;

    fn admins() -> AdminAllowList {
        AdminAllowList::from_csv(" ops@salonbook.app, Founder@SalonBook.app ,,")
    }

    fn caller(email: Option<&str>) -> Caller {
        Caller::new(Identity::parse("uid-1").unwrap(), email.map(str::to_string))
    }

    #[test]
    fn csv_is_trimmed_and_normalized() {
        let list = admins();
        assert_eq!(list.len(), 2);
        assert!(list.contains("founder@salonbook.app"));
        assert!(list.contains("  OPS@salonbook.app"));
    }

    #[test]
    fn only_listed_authenticated_callers_are_admins() {
        let list = admins();
        assert!(list.admits(Some(&caller(Some("ops@salonbook.app")))));
        assert!(list.admits(Some(&caller(Some("founder@salonbook.app")))));
        assert!(!list.admits(Some(&caller(None))));
        assert!(!list.admits(None));
    }

    #[test]
    fn empty_list_admits_nobody() {
        let list = AdminAllowList::from_csv("");
        assert!(list.is_empty());
        assert!(!list.admits(Some(&caller(Some("ops@salonbook.app")))));
    }

    proptest! {
        #[test]
        fn unlisted_emails_are_never_admins(local in "[a-z0-9.]{1,16}", domain in "[a-z]{1,10}\\.[a-z]{2,4}") {
            let email = format!("{local}@{domain}");
            prop_assume!(email != "ops@salonbook.app" && email != "founder@salonbook.app");
            prop_assert!(!admins().admits(Some(&caller(Some(&email)))));
        }
    }
}
