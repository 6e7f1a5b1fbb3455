//! Role-gated navigation menu.

use serde::Serialize;

use super::{has_role, Role, User};

/// One entry of the dashboard menu.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub title: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    pub roles: &'static [Role],
}

/// The full static menu. Visibility is an allow-list per entry; there is
/// no role hierarchy.
pub const NAVIGATION_ITEMS: &[NavItem] = &[
    NavItem {
        title: "Tableau de bord",
        href: "/dashboard",
        icon: "layout-dashboard",
        roles: &[Role::Apprentice, Role::Ssp, Role::Admin],
    },
    NavItem {
        title: "Mon profil",
        href: "/profile",
        icon: "user",
        roles: &[Role::Apprentice],
    },
    NavItem {
        title: "Questionnaires",
        href: "/questionnaires",
        icon: "clipboard-list",
        roles: &[Role::Apprentice],
    },
    NavItem {
        title: "Mes rendez-vous",
        href: "/appointments",
        icon: "calendar-clock",
        roles: &[Role::Apprentice],
    },
    NavItem {
        title: "Ressources",
        href: "/resources",
        icon: "book-open",
        roles: &[Role::Apprentice],
    },
    NavItem {
        title: "Mes apprentis",
        href: "/apprentices",
        icon: "users",
        roles: &[Role::Ssp],
    },
    NavItem {
        title: "Suivi individuel",
        href: "/tracking",
        icon: "line-chart",
        roles: &[Role::Ssp],
    },
    NavItem {
        title: "Événements",
        href: "/events",
        icon: "calendar",
        roles: &[Role::Ssp, Role::Admin],
    },
    NavItem {
        title: "Gestion utilisateurs",
        href: "/users",
        icon: "user-cog",
        roles: &[Role::Admin],
    },
    NavItem {
        title: "Analytiques",
        href: "/analytics",
        icon: "bar-chart",
        roles: &[Role::Ssp, Role::Admin],
    },
    NavItem {
        title: "Configuration",
        href: "/settings",
        icon: "settings",
        roles: &[Role::Admin],
    },
];

/// Menu entries visible to the given user.
pub fn visible_items(user: &User) -> Vec<NavItem> {
    NAVIGATION_ITEMS
        .iter()
        .filter(|item| has_role(Some(user), item.roles))
        .cloned()
        .collect()
}
