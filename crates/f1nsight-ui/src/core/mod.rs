//! Core, DOM-free widget state machines and helpers for the dashboard.
pub mod breakpoints;
pub mod collapse;
pub mod compare;
pub mod config;
pub mod group;
pub mod loader;
pub mod notifications;
pub mod preferences;
pub mod select;
pub mod sidebar;
pub mod theme;
pub mod widget;
