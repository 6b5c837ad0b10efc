//! Sidebar navigation registry and page-title resolution

/// One sidebar entry, optionally with a single level of children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSection {
    /// Stable identifier
    pub id: &'static str,
    /// Sidebar label, also used as the page title
    pub label: &'static str,
    /// Route path
    pub href: &'static str,
    /// Icon name from the icon set used by the stylesheet
    pub icon: &'static str,
    /// Tooltip text
    pub description: &'static str,
    /// Small pill shown next to the label
    pub badge: Option<&'static str>,
    /// Nested entries
    pub children: &'static [NavSection],
}

impl NavSection {
    const fn leaf(id: &'static str, label: &'static str, href: &'static str, description: &'static str) -> Self {
        Self {
            id,
            label,
            href,
            icon: "",
            description,
            badge: None,
            children: &[],
        }
    }

    /// Whether this entry or one of its children is active for `path`
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        is_active(self.href, path) || self.children.iter().any(|c| is_active(c.href, path))
    }
}

const ANALYTICS_CHILDREN: &[NavSection] = &[
    NavSection::leaf(
        "booking-analytics",
        "Booking Analytics",
        "/admin/analytics/bookings",
        "Booking trends and insights",
    ),
    NavSection::leaf(
        "therapist-analytics",
        "Therapist Analytics",
        "/admin/analytics/therapists",
        "Therapist performance",
    ),
    NavSection::leaf(
        "advanced-analytics",
        "Advanced Analytics",
        "/admin/analytics/advanced",
        "Geographic and service analytics",
    ),
];

const REPORT_CHILDREN: &[NavSection] = &[
    NavSection::leaf(
        "financial-reports",
        "Financial Reports",
        "/admin/reports/financial",
        "Revenue and financial analytics",
    ),
    NavSection::leaf(
        "export-data",
        "Export Data",
        "/admin/reports/export",
        "Export various data types",
    ),
];

/// The admin sidebar, in display order
///
/// Order matters: [`is_active`] is a prefix match, so the scan picks the first
/// top-level entry whose prefix fits.
pub static NAVIGATION: &[NavSection] = &[
    NavSection {
        id: "dashboard",
        label: "Dashboard",
        href: "/admin",
        icon: "layout-dashboard",
        description: "Overview and key metrics",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "users",
        label: "Users",
        href: "/admin/users",
        icon: "users",
        description: "Manage all users",
        badge: Some("new"),
        children: &[],
    },
    NavSection {
        id: "bookings",
        label: "Bookings",
        href: "/admin/bookings",
        icon: "calendar",
        description: "Booking management",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "therapists",
        label: "Therapists",
        href: "/admin/therapists",
        icon: "user-cog",
        description: "Therapist management",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "customers",
        label: "Customers",
        href: "/admin/customers",
        icon: "users",
        description: "Customer management",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "pending-requests",
        label: "Pending Requests",
        href: "/admin/pending-requests",
        icon: "clock",
        description: "Pending booking requests",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "conversations",
        label: "Conversations",
        href: "/admin/conversations",
        icon: "message-square",
        description: "Chat management",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "coupons",
        label: "Coupons",
        href: "/admin/coupons",
        icon: "ticket",
        description: "Discount coupons",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "analytics",
        label: "Analytics",
        href: "/admin/analytics",
        icon: "bar-chart-3",
        description: "Advanced analytics",
        badge: None,
        children: ANALYTICS_CHILDREN,
    },
    NavSection {
        id: "reports",
        label: "Reports",
        href: "/admin/reports",
        icon: "file-text",
        description: "Financial and system reports",
        badge: None,
        children: REPORT_CHILDREN,
    },
    NavSection {
        id: "monitoring",
        label: "Live Monitoring",
        href: "/admin/monitoring",
        icon: "monitor",
        description: "Real-time system monitoring",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "notifications",
        label: "Notifications",
        href: "/admin/notifications",
        icon: "bell",
        description: "Manage notifications",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "system",
        label: "System",
        href: "/admin/system",
        icon: "activity",
        description: "System health and settings",
        badge: None,
        children: &[],
    },
    NavSection {
        id: "settings",
        label: "Settings",
        href: "/admin/settings",
        icon: "settings",
        description: "Application settings",
        badge: None,
        children: &[],
    },
];

/// Sidebar highlight rule: `/admin` only matches exactly, everything else by
/// whole-segment prefix, so `/admin/users` covers `/admin/users/42` but not
/// `/admin/users-archive`
#[must_use]
pub fn is_active(href: &str, path: &str) -> bool {
    if href == "/admin" {
        return path == href;
    }
    path.strip_prefix(href)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
}

/// Title for `path`: the deepest matching entry's label, else `"Dashboard"`
#[must_use]
pub fn resolve_title(path: &str) -> &'static str {
    NAVIGATION
        .iter()
        .find(|section| section.contains(path))
        .map_or("Dashboard", |section| {
            section
                .children
                .iter()
                .find(|child| is_active(child.href, path))
                .map_or(section.label, |child| child.label)
        })
}

/// Look up a top-level or nested entry by id
#[must_use]
pub fn find_section(id: &str) -> Option<&'static NavSection> {
    NAVIGATION.iter().find_map(|section| {
        if section.id == id {
            Some(section)
        } else {
            section.children.iter().find(|child| child.id == id)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case("/admin", "Dashboard")]
    #[case("/admin/users", "Users")]
    #[case("/admin/users/42", "Users")]
    #[case("/admin/analytics", "Analytics")]
    #[case("/admin/analytics/bookings", "Booking Analytics")]
    #[case("/admin/analytics/advanced?metric=cohort", "Advanced Analytics")]
    #[case("/admin/reports/export", "Export Data")]
    #[case("/admin/coupons/new", "Coupons")]
    #[case("/admin/nowhere", "Dashboard")]
    #[case("/login", "Dashboard")]
    #[case("", "Dashboard")]
    fn test_resolve_title(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(resolve_title(path), expected);
    }

    #[test]
    fn test_dashboard_only_matches_exactly() {
        assert!(is_active("/admin", "/admin"));
        assert!(!is_active("/admin", "/admin/users"));
        assert!(is_active("/admin/users", "/admin/users/7"));
    }

    #[rstest]
    #[case("/admin/users", true)]
    #[case("/admin/users?page=2", true)]
    #[case("/admin/users/7/edit", true)]
    #[case("/admin/users-archive", false)]
    #[case("/admin/usersx", false)]
    #[case("/admin/use", false)]
    fn test_prefix_stops_at_segment_boundary(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_active("/admin/users", path), expected);
    }

    #[test]
    fn test_sibling_path_falls_back_to_dashboard_title() {
        assert_eq!(resolve_title("/admin/coupons-archive"), "Dashboard");
    }

    #[test]
    fn test_find_section_reaches_children() {
        assert_eq!(find_section("users").unwrap().href, "/admin/users");
        assert_eq!(find_section("export-data").unwrap().label, "Export Data");
        assert!(find_section("missing").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for section in NAVIGATION {
            assert!(seen.insert(section.id));
            for child in section.children {
                assert!(seen.insert(child.id));
            }
        }
    }

    #[test]
    fn test_children_live_under_parent_path() {
        for section in NAVIGATION {
            for child in section.children {
                assert!(child.href.starts_with(section.href));
            }
        }
    }

    proptest! {
        #[test]
        fn test_resolve_title_never_fails(path in ".*") {
            let title = resolve_title(&path);
            let known = NAVIGATION
                .iter()
                .flat_map(|s| std::iter::once(s.label).chain(s.children.iter().map(|c| c.label)))
                .any(|label| label == title);
            prop_assert!(known);
        }

        #[test]
        fn test_nested_paths_resolve_to_child(suffix in "(/[a-z0-9]{1,6}){0,3}") {
            let path = format!("/admin/analytics/bookings{suffix}");
            prop_assert_eq!(resolve_title(&path), "Booking Analytics");
        }
    }
}
