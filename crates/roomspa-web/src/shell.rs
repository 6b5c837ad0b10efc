//! Admin layout: sidebar, header and the flash notice

use crate::navigation::{self, NAVIGATION, NavSection};
use crate::session::SessionContext;
use std::collections::HashSet;

/// Per-render sidebar state
///
/// Expansion is tracked per section id and is never persisted: each render
/// starts with only the section containing the current page expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarState {
    expanded: HashSet<&'static str>,
}

impl SidebarState {
    /// Initial state for a page at `path`
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        let expanded = NAVIGATION
            .iter()
            .filter(|s| !s.children.is_empty() && s.contains(path))
            .map(|s| s.id)
            .collect();
        Self { expanded }
    }

    /// Whether the section is expanded
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }
}

/// A rendered sidebar link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Section id
    pub id: &'static str,
    /// Link text
    pub label: &'static str,
    /// Target
    pub href: &'static str,
    /// Icon name
    pub icon: &'static str,
    /// Tooltip
    pub description: &'static str,
    /// Pill text, empty for none
    pub badge: &'static str,
    /// Highlighted
    pub active: bool,
    /// Submenu starts open
    pub expanded: bool,
    /// Submenu entries
    pub children: Vec<NavLink>,
}

impl NavLink {
    fn from_section(section: &NavSection, path: &str, sidebar: &SidebarState) -> Self {
        Self {
            id: section.id,
            label: section.label,
            href: section.href,
            icon: section.icon,
            description: section.description,
            badge: section.badge.unwrap_or_default(),
            active: navigation::is_active(section.href, path),
            expanded: sidebar.is_expanded(section.id),
            children: section
                .children
                .iter()
                .map(|child| Self::from_section(child, path, sidebar))
                .collect(),
        }
    }

    /// Whether the entry has a submenu
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Everything the layout template needs besides the page body
#[derive(Debug, Clone)]
pub struct Shell {
    /// Page title resolved from the registry
    pub title: &'static str,
    /// Sidebar entries
    pub nav: Vec<NavLink>,
    /// Header name
    pub user_name: String,
    /// Header email
    pub user_email: String,
    /// Avatar initials
    pub initials: String,
    /// One-shot success notice, e.g. after a redirect
    pub notice: Option<String>,
    /// One-shot failure message from a redirected action
    pub error: Option<String>,
}

impl Shell {
    /// Build the layout for `path`
    #[must_use]
    pub fn new(session: &SessionContext, path: &str) -> Self {
        let sidebar = SidebarState::for_path(path);
        Self {
            title: navigation::resolve_title(path),
            nav: NAVIGATION
                .iter()
                .map(|section| NavLink::from_section(section, path, &sidebar))
                .collect(),
            user_name: session.display_name(),
            user_email: session.email(),
            initials: session.initials(),
            notice: None,
            error: None,
        }
    }

    /// Attach a flash notice
    #[must_use]
    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice.filter(|n| !n.trim().is_empty());
        self
    }

    /// Attach both flash messages carried by a redirect
    #[must_use]
    pub fn with_flash(mut self, notice: Option<&String>, error: Option<&String>) -> Self {
        self.error = error.filter(|e| !e.trim().is_empty()).cloned();
        self.with_notice(notice.cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> SessionContext {
        SessionContext {
            token: "t".to_string(),
            user: None,
        }
    }

    #[test]
    fn test_active_parent_starts_expanded() {
        let state = SidebarState::for_path("/admin/reports/financial");
        assert!(state.is_expanded("reports"));
        assert!(!state.is_expanded("analytics"));
    }

    #[test]
    fn test_shell_marks_active_links() {
        let shell = Shell::new(&session(), "/admin/analytics/therapists");

        assert_eq!(shell.title, "Therapist Analytics");
        let analytics = shell.nav.iter().find(|l| l.id == "analytics").unwrap();
        assert!(analytics.active);
        assert!(analytics.expanded);
        let child = analytics
            .children
            .iter()
            .find(|l| l.id == "therapist-analytics")
            .unwrap();
        assert!(child.active);

        let dashboard = shell.nav.iter().find(|l| l.id == "dashboard").unwrap();
        assert!(!dashboard.active);
    }

    #[test]
    fn test_flash_carries_error() {
        let error = "Coupon not found".to_string();
        let shell = Shell::new(&session(), "/admin/coupons").with_flash(None, Some(&error));
        assert_eq!(shell.error.as_deref(), Some("Coupon not found"));
        assert!(shell.notice.is_none());
    }

    #[test]
    fn test_blank_notice_is_dropped() {
        let shell = Shell::new(&session(), "/admin").with_notice(Some("  ".to_string()));
        assert!(shell.notice.is_none());
    }
}
