use crate::access::Role;

/// Per-visit authentication state.
///
/// Invariant: identity fields are set and cleared together. A session is
/// either fully anonymous (flag false, all fields `None`) or fully
/// identified (flag true, all fields set). Only [`Session::login`] and
/// [`Session::clear`] mutate it, and both replace every field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn login(&mut self, username: &str, role: Role, display_name: &str) {
        self.authenticated = true;
        self.username = Some(username.to_string());
        self.role = Some(role);
        self.display_name = Some(display_name.to_string());
    }

    pub fn clear(&mut self) {
        self.authenticated = false;
        self.username = None;
        self.role = None;
        self.display_name = None;
    }

    pub fn is_admin(&self) -> bool {
        self.authenticated && self.role == Some(Role::Admin)
    }

    /// Username, or the empty string for anonymous sessions. Used when
    /// stamping authorship onto submitted records.
    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    pub fn display_name_or_empty(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_anonymous() {
        let session = Session::default();
        assert!(!session.authenticated);
        assert!(session.username.is_none());
        assert!(session.role.is_none());
        assert!(session.display_name.is_none());
    }

    #[test]
    fn login_sets_every_field() {
        let mut session = Session::default();
        session.login("user1", Role::User, "First User");
        assert!(session.authenticated);
        assert_eq!(session.username.as_deref(), Some("user1"));
        assert_eq!(session.role, Some(Role::User));
        assert_eq!(session.display_name.as_deref(), Some("First User"));
    }

    #[test]
    fn clear_resets_every_field() {
        let mut session = Session::default();
        session.login("admin1", Role::Admin, "Site Admin");
        session.clear();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn clear_on_anonymous_session_is_harmless() {
        let mut session = Session::default();
        session.clear();
        assert_eq!(session, Session::default());
    }
}
