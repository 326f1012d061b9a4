//! Yew components mounted into the server-rendered dashboard.

pub(crate) mod theme_switcher;
