//! Who may use and who may edit canned replies.

use crate::config::RepliesConfig;
use axum::http::Method;
use serde::Serialize;

/// The acting user as resolved by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Use,
    Edit,
}

impl Ability {
    /// Reads and usage recording need `Use`; every other method needs `Edit`.
    pub fn required_for(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD || *method == Method::PATCH {
            Ability::Use
        } else {
            Ability::Edit
        }
    }
}

/// Permission predicates derived from the site settings.
///
/// Use and edit share one allow-list of group names but each has its own "everyone" override.
#[derive(Debug, Clone, Default)]
pub struct PermissionPolicy {
    everyone_can_use: bool,
    everyone_can_edit: bool,
    /// Lowercased group names.
    groups: Vec<String>,
}

impl PermissionPolicy {
    pub fn new(everyone_can_use: bool, everyone_can_edit: bool, groups: &str) -> Self {
        Self {
            everyone_can_use,
            everyone_can_edit,
            groups: groups
                .split('|')
                .map(|g| g.trim().to_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }

    pub fn from_config(cfg: &RepliesConfig) -> Self {
        Self::new(cfg.everyone_enabled, cfg.everyone_can_edit, &cfg.groups)
    }

    pub fn can_use(&self, user: &User) -> bool {
        self.everyone_can_use || self.in_allowed_group(user)
    }

    pub fn can_edit(&self, user: &User) -> bool {
        self.everyone_can_edit || self.in_allowed_group(user)
    }

    pub fn allows(&self, user: &User, ability: Ability) -> bool {
        match ability {
            Ability::Use => self.can_use(user),
            Ability::Edit => self.can_edit(user),
        }
    }

    fn in_allowed_group(&self, user: &User) -> bool {
        user.groups
            .iter()
            .any(|name| self.groups.iter().any(|g| *g == name.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(groups: &[&str]) -> User {
        User {
            id: 42,
            username: "someone".to_string(),
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
        }
    }

    #[test]
    fn group_member_may_use_and_edit() {
        let policy = PermissionPolicy::new(false, false, "staff|Moderators");
        let moderator = user(&["trust_level_0", "moderators"]);
        assert!(policy.can_use(&moderator));
        assert!(policy.can_edit(&moderator));
    }

    #[test]
    fn group_names_compare_case_insensitively() {
        let policy = PermissionPolicy::new(false, false, "Staff");
        assert!(policy.can_use(&user(&["STAFF"])));
    }

    #[test]
    fn outsider_is_denied_without_everyone_flags() {
        let policy = PermissionPolicy::new(false, false, "staff");
        let outsider = user(&["trust_level_1"]);
        assert!(!policy.can_use(&outsider));
        assert!(!policy.can_edit(&outsider));
    }

    #[test]
    fn everyone_flags_are_independent() {
        let outsider = user(&[]);

        let use_only = PermissionPolicy::new(true, false, "staff");
        assert!(use_only.can_use(&outsider));
        assert!(!use_only.can_edit(&outsider));

        let edit_only = PermissionPolicy::new(false, true, "staff");
        assert!(!edit_only.can_use(&outsider));
        assert!(edit_only.can_edit(&outsider));
    }

    #[test]
    fn empty_group_list_matches_nobody() {
        let policy = PermissionPolicy::new(false, false, "");
        assert!(!policy.can_use(&user(&[""])));
        assert!(!policy.can_edit(&user(&["staff"])));
    }

    #[test]
    fn methods_map_to_abilities() {
        assert_eq!(Ability::required_for(&Method::GET), Ability::Use);
        assert_eq!(Ability::required_for(&Method::PATCH), Ability::Use);
        assert_eq!(Ability::required_for(&Method::POST), Ability::Edit);
        assert_eq!(Ability::required_for(&Method::PUT), Ability::Edit);
        assert_eq!(Ability::required_for(&Method::DELETE), Ability::Edit);
    }
}
