//! Driver comparison coordinator.
//!
//! Listens for [`UiEvent::DriverSelected`] on the bus and redraws the
//! comparison chart once both selector slots hold a driver.

use f1nsight_events::{DriverSelection, EventBus, SelectorSlot, Subscription, UiEvent};
use std::cell::RefCell;
use std::rc::Rc;

/// Seam to the page's chart drawing routine.
pub trait ChartUpdater {
    /// Redraw the comparison chart for two drivers.
    fn update_chart(&self, driver1: &str, driver2: &str);
}

/// Slot bookkeeping for the two comparison selectors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComparisonSlots {
    drivers: [Option<String>; 2],
}

impl ComparisonSlots {
    /// Record a driver for a slot; blank values clear the slot.
    pub fn set(&mut self, slot: SelectorSlot, driver: &str) {
        let value = driver.trim();
        self.drivers[slot.index()] = (!value.is_empty()).then(|| value.to_string());
    }

    /// Driver held by a slot.
    #[must_use]
    pub fn get(&self, slot: SelectorSlot) -> Option<&str> {
        self.drivers[slot.index()].as_deref()
    }

    /// Both drivers once every slot is populated.
    #[must_use]
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.drivers[0], &self.drivers[1]) {
            (Some(first), Some(second)) => Some((first.as_str(), second.as_str())),
            _ => None,
        }
    }
}

/// Owns the slot state and reacts to selector picks.
pub struct ComparisonCoordinator {
    slots: ComparisonSlots,
    updater: Rc<dyn ChartUpdater>,
    bus: EventBus,
}

impl ComparisonCoordinator {
    /// Coordinator with empty slots.
    #[must_use]
    pub fn new(bus: EventBus, updater: Rc<dyn ChartUpdater>) -> Self {
        Self {
            slots: ComparisonSlots::default(),
            updater,
            bus,
        }
    }

    /// Pre-fill a slot from server-rendered markup without redrawing.
    pub fn seed(&mut self, slot: SelectorSlot, driver: &str) {
        self.slots.set(slot, driver);
    }

    /// Current slot state.
    #[must_use]
    pub const fn slots(&self) -> &ComparisonSlots {
        &self.slots
    }

    /// Apply a pick; redraws and publishes when both slots are filled.
    ///
    /// Returns `true` when the chart was updated.
    pub fn on_driver_selected(&mut self, selection: &DriverSelection) -> bool {
        self.slots.set(selection.selector, &selection.driver);
        let Some((driver1, driver2)) = self.slots.pair() else {
            tracing::debug!(
                selector = selection.selector.ordinal(),
                "waiting for second driver"
            );
            return false;
        };
        tracing::info!(driver1, driver2, "updating comparison chart");
        self.updater.update_chart(driver1, driver2);
        let _ = self.bus.publish(UiEvent::ComparisonReady {
            driver1: driver1.to_string(),
            driver2: driver2.to_string(),
        });
        true
    }

    /// Subscribe a shared coordinator to the bus.
    #[must_use = "dropping the subscription detaches the coordinator"]
    pub fn attach(this: &Rc<RefCell<Self>>) -> Subscription {
        let bus = this.borrow().bus.clone();
        let coordinator = Rc::clone(this);
        bus.subscribe(move |envelope| {
            if let UiEvent::DriverSelected(selection) = &envelope.event {
                let _ = coordinator.borrow_mut().on_driver_selected(selection);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingChart {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl ChartUpdater for RecordingChart {
        fn update_chart(&self, driver1: &str, driver2: &str) {
            self.calls
                .borrow_mut()
                .push((driver1.to_string(), driver2.to_string()));
        }
    }

    fn pick(driver: &str, selector: SelectorSlot) -> UiEvent {
        UiEvent::DriverSelected(DriverSelection {
            driver: driver.to_string(),
            selector,
        })
    }

    #[test]
    fn chart_updates_only_when_both_slots_are_filled() {
        let bus = EventBus::new();
        let chart = Rc::new(RecordingChart::default());
        let coordinator = Rc::new(RefCell::new(ComparisonCoordinator::new(
            bus.clone(),
            chart.clone(),
        )));
        let _sub = ComparisonCoordinator::attach(&coordinator);

        let _ = bus.publish(pick("hamilton", SelectorSlot::First));
        assert!(chart.calls.borrow().is_empty());

        let _ = bus.publish(pick("verstappen", SelectorSlot::Second));
        assert_eq!(
            *chart.calls.borrow(),
            vec![("hamilton".to_string(), "verstappen".to_string())]
        );
        assert!(matches!(
            bus.backlog_since(0).last().map(|env| &env.event),
            Some(UiEvent::ComparisonReady { driver1, driver2 })
                if driver1 == "hamilton" && driver2 == "verstappen"
        ));
    }

    #[test]
    fn seeded_slot_counts_towards_the_pair() {
        let chart = Rc::new(RecordingChart::default());
        let mut coordinator = ComparisonCoordinator::new(EventBus::new(), chart.clone());
        coordinator.seed(SelectorSlot::Second, "norris");
        assert!(chart.calls.borrow().is_empty());

        let updated = coordinator.on_driver_selected(&DriverSelection {
            driver: "piastri".into(),
            selector: SelectorSlot::First,
        });
        assert!(updated);
        assert_eq!(coordinator.slots().pair(), Some(("piastri", "norris")));
    }

    #[test]
    fn blank_values_clear_the_slot() {
        let mut slots = ComparisonSlots::default();
        slots.set(SelectorSlot::First, "alonso");
        slots.set(SelectorSlot::Second, "  ");
        assert_eq!(slots.get(SelectorSlot::First), Some("alonso"));
        assert_eq!(slots.get(SelectorSlot::Second), None);
        assert_eq!(slots.pair(), None);
    }
}
