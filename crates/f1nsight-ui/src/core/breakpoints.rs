//! Responsive breakpoint definitions for the dashboard layout.

/// Widest viewport (inclusive, CSS pixels) treated as mobile.
pub const MOBILE_MAX_WIDTH: u32 = 600;

/// Layout branch selected from the window width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportMode {
    /// Wide layout with a persistently collapsible sidebar.
    Desktop,
    /// Narrow layout where the sidebar is an overlay.
    Mobile,
}

impl ViewportMode {
    /// Mode for a width using the default breakpoint.
    #[must_use]
    pub fn for_width(width: u32) -> Self {
        Self::for_width_with(width, MOBILE_MAX_WIDTH)
    }

    /// Mode for a width using a custom mobile breakpoint.
    #[must_use]
    pub fn for_width_with(width: u32, mobile_max_width: u32) -> Self {
        layout(mobile_max_width)
            .iter()
            .find(|bp| width >= bp.min_width && bp.max_width.is_none_or(|max| width <= max))
            .map_or(Self::Desktop, |bp| bp.mode)
    }

    /// String identifier used in log fields and datasets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

/// Individual breakpoint with an inclusive minimum width and optional maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    /// Identifier for diagnostics.
    pub name: &'static str,
    /// Inclusive lower bound.
    pub min_width: u32,
    /// Inclusive upper bound, open-ended when `None`.
    pub max_width: Option<u32>,
    /// Layout branch for widths in range.
    pub mode: ViewportMode,
}

/// Ordered breakpoints for a given mobile cut-off.
#[must_use]
pub const fn layout(mobile_max_width: u32) -> [Breakpoint; 2] {
    [
        Breakpoint {
            name: "mobile",
            min_width: 0,
            max_width: Some(mobile_max_width),
            mode: ViewportMode::Mobile,
        },
        Breakpoint {
            name: "desktop",
            min_width: mobile_max_width.saturating_add(1),
            max_width: None,
            mode: ViewportMode::Desktop,
        },
    ]
}
