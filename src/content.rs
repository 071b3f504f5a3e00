//! The PACT site's content kinds and their canonical query keys.
//!
//! Public pages and admin screens read the same records through different
//! queries: the public services page caches `["services"]`, the admin list
//! caches `["admin", "services"]`, and detail views cache
//! `["services", id]`. Writing a record has to invalidate both sides, which
//! is what [`ContentKind::invalidation_paths`] returns.
//!
//! # Examples
//!
//! ```
//! use pact_mutation::content::{content_config, ContentKind, CrudAction};
//! use pact_mutation::query_key;
//!
//! let config = content_config::<(), (), ()>(ContentKind::TeamMembers, CrudAction::Update);
//! assert_eq!(
//!     config.invalidation_paths(),
//!     &[query_key!["team_members"], query_key!["admin", "team_members"]]
//! );
//! assert_eq!(config.success_message(), Some("Team member updated successfully"));
//! assert_eq!(config.error_message(), "Failed to update team member");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::ADMIN_SCOPE;
use crate::mutation::MutationConfig;
use crate::types::{KeySegment, QueryKey};

/// A kind of content managed through the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Consultancy services listed on the services page.
    Services,
    /// Case-study projects.
    Projects,
    /// Team member profiles.
    TeamMembers,
    /// News articles.
    News,
    /// Client logos and testimonials.
    Clients,
    /// Contact form submissions.
    Contact,
    /// Site-wide settings (hero text, contact details).
    SiteSettings,
}

impl ContentKind {
    /// Every content kind.
    pub const ALL: [ContentKind; 7] = [
        Self::Services,
        Self::Projects,
        Self::TeamMembers,
        Self::News,
        Self::Clients,
        Self::Contact,
        Self::SiteSettings,
    ];

    /// Collection name used as the first key segment.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Projects => "projects",
            Self::TeamMembers => "team_members",
            Self::News => "news",
            Self::Clients => "clients",
            Self::Contact => "contact_submissions",
            Self::SiteSettings => "site_settings",
        }
    }

    /// Singular, capitalised name for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Services => "Service",
            Self::Projects => "Project",
            Self::TeamMembers => "Team member",
            Self::News => "News item",
            Self::Clients => "Client",
            Self::Contact => "Contact submission",
            Self::SiteSettings => "Site settings",
        }
    }

    /// Key of the public listing, e.g. `["news"]`.
    pub fn list_key(&self) -> QueryKey {
        QueryKey::from([self.slug()])
    }

    /// Key of the admin listing, e.g. `["admin", "news"]`.
    pub fn admin_key(&self) -> QueryKey {
        QueryKey::from([ADMIN_SCOPE, self.slug()])
    }

    /// Key of a single record, e.g. `["news", 12]`.
    pub fn item_key(&self, id: impl Into<KeySegment>) -> QueryKey {
        self.list_key().with(id)
    }

    /// Paths to invalidate after any write to this kind: the public listing
    /// (which also covers item keys) and the admin listing.
    pub fn invalidation_paths(&self) -> Vec<QueryKey> {
        vec![self.list_key(), self.admin_key()]
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// An admin write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudAction {
    /// A new record.
    Create,
    /// An edit to an existing record.
    Update,
    /// A removal.
    Delete,
}

impl CrudAction {
    fn past_tense(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Success text, e.g. `"Service created successfully"`.
    pub fn success_message(&self, kind: ContentKind) -> String {
        format!("{} {} successfully", kind.label(), self.past_tense())
    }

    /// Error text, e.g. `"Failed to delete news item"`.
    pub fn error_message(&self, kind: ContentKind) -> String {
        format!("Failed to {} {}", self.verb(), kind.label().to_lowercase())
    }
}

/// A [`MutationConfig`] with the standard paths and messages for an admin
/// write. Callbacks can be chained on afterwards.
pub fn content_config<R, E, V>(kind: ContentKind, action: CrudAction) -> MutationConfig<R, E, V> {
    MutationConfig::new()
        .with_invalidations(kind.invalidation_paths())
        .with_success_message(action.success_message(kind))
        .with_error_message(action.error_message(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_key;

    #[test]
    fn keys_follow_slug() {
        assert_eq!(ContentKind::News.list_key(), query_key!["news"]);
        assert_eq!(ContentKind::News.admin_key(), query_key!["admin", "news"]);
        assert_eq!(ContentKind::News.item_key(12), query_key!["news", 12]);
        assert!(ContentKind::News
            .list_key()
            .is_prefix_of(&ContentKind::News.item_key(12)));
    }

    #[test]
    fn every_kind_has_valid_config() {
        for kind in ContentKind::ALL {
            for action in [CrudAction::Create, CrudAction::Update, CrudAction::Delete] {
                let config = content_config::<(), (), ()>(kind, action);
                assert!(config.validate().is_ok(), "{kind} {action:?}");
                assert_eq!(config.invalidation_paths().len(), 2);
            }
        }
    }

    #[test]
    fn messages() {
        assert_eq!(
            CrudAction::Create.success_message(ContentKind::Services),
            "Service created successfully"
        );
        assert_eq!(
            CrudAction::Delete.error_message(ContentKind::News),
            "Failed to delete news item"
        );
    }

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<_> = ContentKind::ALL.iter().map(ContentKind::slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), ContentKind::ALL.len());
    }
}
