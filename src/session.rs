//! Session identity and the authorization gate
//!
//! A `Session` is an explicit value passed into every mutating engine call,
//! never ambient state. Identities classify three ways: `None` (logged out),
//! the `"Guest"` sentinel (authenticated but read-only), and any other
//! non-empty string (admin). The engine consults `can_mutate()` before every
//! write path; deny is the default.

/// The non-privileged, read-only sentinel identity
pub const GUEST_USER: &str = "Guest";

/// Current actor identity and privilege classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_user: Option<String>,
}

impl Session {
    /// A session with no identity (read-only)
    pub fn logged_out() -> Self {
        Self { current_user: None }
    }

    /// A session for the given identity
    pub fn login(user: impl Into<String>) -> Self {
        Self {
            current_user: Some(user.into()),
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Admin iff an identity is set, non-empty, and not the guest sentinel
    pub fn is_admin(&self) -> bool {
        matches!(self.current_user.as_deref(), Some(u) if !u.is_empty() && u != GUEST_USER)
    }

    /// True iff this session may issue mutations
    pub fn can_mutate(&self) -> bool {
        self.is_admin()
    }

    /// Identity string used in audit entries
    pub fn actor(&self) -> &str {
        self.current_user.as_deref().unwrap_or("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_out_cannot_mutate() {
        let s = Session::logged_out();
        assert!(!s.is_admin());
        assert!(!s.can_mutate());
        assert_eq!(s.current_user(), None);
    }

    #[test]
    fn test_guest_cannot_mutate() {
        let s = Session::login(GUEST_USER);
        assert!(!s.can_mutate());
        assert_eq!(s.current_user(), Some("Guest"));
    }

    #[test]
    fn test_named_identity_is_admin() {
        let s = Session::login("Alice");
        assert!(s.is_admin());
        assert!(s.can_mutate());
        assert_eq!(s.actor(), "Alice");
    }

    #[test]
    fn test_empty_identity_is_not_admin() {
        let s = Session::login("");
        assert!(!s.can_mutate());
    }
}
