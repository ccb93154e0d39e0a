use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Account role as declared in `users.yaml`. Comparison is exact; there is
/// no normalization, and an unknown role string fails deserialization
/// rather than mapping to a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Special,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Special => "special",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "Member",
            Role::Special => "Special member",
            Role::Admin => "Administrator",
        }
    }
}

/// Content visibility level. Public, User, and Special each map to a
/// directory of markdown documents; Admin gates the admin-authored
/// surfaces (column authoring, inquiry answers) and has no directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Public,
    User,
    Special,
    Admin,
}

impl Tier {
    /// Directory name under the content root, for the tiers that are
    /// backed by files.
    pub fn dir_name(&self) -> Option<&'static str> {
        match self {
            Tier::Public => Some("public"),
            Tier::User => Some("user"),
            Tier::Special => Some("special"),
            Tier::Admin => None,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Tier> {
        match slug {
            "public" => Some(Tier::Public),
            "user" => Some(Tier::User),
            "special" => Some(Tier::Special),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tier::Public => "Public documents",
            Tier::User => "Member documents",
            Tier::Special => "Special documents",
            Tier::Admin => "Administration",
        }
    }
}

/// A gated write operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SubmitInquiry,
    SubmitReview,
    AuthorColumn,
    AnswerInquiry,
}

/// Whether `session` may view content at `tier`.
///
/// The authentication flag dominates the role: a session carrying a role
/// but not the flag is denied every gated tier, and an authenticated
/// session with no role may still view the User tier. Absent role never
/// matches, so the check fails closed.
pub fn can_view(session: &Session, tier: Tier) -> bool {
    match tier {
        Tier::Public => true,
        Tier::User => session.authenticated,
        Tier::Special => {
            session.authenticated
                && matches!(session.role, Some(Role::Special) | Some(Role::Admin))
        }
        Tier::Admin => session.authenticated && session.role == Some(Role::Admin),
    }
}

/// Whether `session` may perform `action`. Same dominance rule as
/// [`can_view`].
pub fn can_perform(session: &Session, action: Action) -> bool {
    match action {
        Action::SubmitInquiry | Action::SubmitReview => session.authenticated,
        Action::AuthorColumn => {
            session.authenticated
                && matches!(session.role, Some(Role::Special) | Some(Role::Admin))
        }
        Action::AnswerInquiry => session.authenticated && session.role == Some(Role::Admin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest() -> Session {
        Session::default()
    }

    fn member(role: Role) -> Session {
        let mut session = Session::default();
        session.login("someone", role, "Some One");
        session
    }

    #[test]
    fn guest_sees_public_only() {
        let session = guest();
        assert!(can_view(&session, Tier::Public));
        assert!(!can_view(&session, Tier::User));
        assert!(!can_view(&session, Tier::Special));
        assert!(!can_view(&session, Tier::Admin));
    }

    #[test]
    fn user_role_stops_at_user_tier() {
        let session = member(Role::User);
        assert!(can_view(&session, Tier::Public));
        assert!(can_view(&session, Tier::User));
        assert!(!can_view(&session, Tier::Special));
        assert!(!can_view(&session, Tier::Admin));
    }

    #[test]
    fn special_role_includes_user_tier() {
        let session = member(Role::Special);
        assert!(can_view(&session, Tier::User));
        assert!(can_view(&session, Tier::Special));
        assert!(!can_view(&session, Tier::Admin));
    }

    #[test]
    fn admin_sees_everything() {
        let session = member(Role::Admin);
        for tier in [Tier::Public, Tier::User, Tier::Special, Tier::Admin] {
            assert!(can_view(&session, tier));
        }
    }

    #[test]
    fn authentication_flag_dominates_role() {
        // Inconsistent by construction: role set, flag cleared.
        let mut session = member(Role::Admin);
        session.authenticated = false;
        assert!(can_view(&session, Tier::Public));
        assert!(!can_view(&session, Tier::User));
        assert!(!can_view(&session, Tier::Special));
        assert!(!can_view(&session, Tier::Admin));
        assert!(!can_perform(&session, Action::AnswerInquiry));
    }

    #[test]
    fn authenticated_without_role_reaches_user_tier_only() {
        let mut session = member(Role::User);
        session.role = None;
        assert!(can_view(&session, Tier::User));
        assert!(!can_view(&session, Tier::Special));
        assert!(!can_view(&session, Tier::Admin));
    }

    #[test]
    fn special_access_implies_user_access() {
        for role in [Role::User, Role::Special, Role::Admin] {
            let session = member(role);
            if can_view(&session, Tier::Special) {
                assert!(can_view(&session, Tier::User));
            }
        }
    }

    #[test]
    fn write_actions_follow_roles() {
        let user = member(Role::User);
        assert!(can_perform(&user, Action::SubmitInquiry));
        assert!(can_perform(&user, Action::SubmitReview));
        assert!(!can_perform(&user, Action::AuthorColumn));
        assert!(!can_perform(&user, Action::AnswerInquiry));

        let special = member(Role::Special);
        assert!(can_perform(&special, Action::AuthorColumn));
        assert!(!can_perform(&special, Action::AnswerInquiry));

        let admin = member(Role::Admin);
        assert!(can_perform(&admin, Action::AuthorColumn));
        assert!(can_perform(&admin, Action::AnswerInquiry));

        let guest = guest();
        assert!(!can_perform(&guest, Action::SubmitInquiry));
        assert!(!can_perform(&guest, Action::SubmitReview));
    }

    #[test]
    fn role_round_trips_through_yaml() {
        let role: Role = serde_yaml::from_str("special").unwrap();
        assert_eq!(role, Role::Special);
        assert!(serde_yaml::from_str::<Role>("Special").is_err());
    }
}
