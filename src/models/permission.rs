//! Capability gate.
//!
//! Every privileged action is checked against [`CAPABILITIES`]; nothing else
//! in the crate decides capability from a role directly.

use crate::models::Role;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    PublishArticles,
    ManageCategories,
    SeeArticleUser,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Capability::PublishArticles => "publish-articles",
            Capability::ManageCategories => "manage-categories",
            Capability::SeeArticleUser => "see-article-user",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const CAPABILITIES: &[(Role, &[Capability])] = &[
    (Role::User, &[]),
    (
        Role::Admin,
        &[
            Capability::PublishArticles,
            Capability::ManageCategories,
            Capability::SeeArticleUser,
        ],
    ),
    (Role::Publisher, &[Capability::PublishArticles]),
];

pub fn allows(role: Role, capability: Capability) -> bool {
    CAPABILITIES
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, granted)| granted.contains(&capability))
        .unwrap_or(false)
}
