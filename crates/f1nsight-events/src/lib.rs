#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Typed UI event bus for the F1nsight dashboard.
//!
//! Widgets publish [`UiEvent`] values instead of dispatching loosely typed
//! document events. Each event is wrapped in an [`EventEnvelope`] carrying a
//! sequential identifier and an emission timestamp. The bus keeps a bounded
//! replay ring so late subscribers (for example a comparison view mounted
//! after both selectors were already filled) can catch up with
//! [`EventBus::backlog_since`].
//!
//! The bus is single-threaded: it lives on the browser event loop and
//! delivers events synchronously. Events published from inside a handler are
//! queued and delivered once the current dispatch has completed.

mod payloads;
mod routing;
mod topics;

pub use payloads::{
    DEFAULT_REPLAY_CAPACITY, DriverSelection, EventEnvelope, EventId, SelectorSlot,
    SelectorSlotError, UiEvent,
};
pub use routing::{EventBus, Subscription};
pub use topics::{DRIVER_SELECTED_DOM_EVENT, event_kind};
