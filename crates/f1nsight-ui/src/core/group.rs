//! Mutually exclusive widget groups (at most one member open).

use crate::core::widget::{Hit, ToggleWidget, Transition};

/// Anything that exposes a [`ToggleWidget`] and can join an [`ExclusiveGroup`].
pub trait GroupMember {
    /// Shared access to the member's state machine.
    fn widget(&self) -> &ToggleWidget;
    /// Mutable access to the member's state machine.
    fn widget_mut(&mut self) -> &mut ToggleWidget;
}

impl GroupMember for ToggleWidget {
    fn widget(&self) -> &ToggleWidget {
        self
    }

    fn widget_mut(&mut self) -> &mut ToggleWidget {
        self
    }
}

/// A state change produced by a group operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberChange {
    /// Position of the member in the group.
    pub index: usize,
    /// Transition the member went through.
    pub transition: Transition,
}

/// Ordered set of widgets where opening one closes its siblings.
pub struct ExclusiveGroup<M> {
    members: Vec<M>,
}

impl<M: GroupMember> ExclusiveGroup<M> {
    /// Build a group from members in document order.
    #[must_use]
    pub const fn new(members: Vec<M>) -> Self {
        Self { members }
    }

    /// Number of members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Shared access to one member.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&M> {
        self.members.get(index)
    }

    /// Mutable access to one member.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut M> {
        self.members.get_mut(index)
    }

    /// Index of the open member, if any.
    #[must_use]
    pub fn open_index(&self) -> Option<usize> {
        self.members.iter().position(|m| m.widget().is_open())
    }

    /// Trigger click on `index`: a closed member opens after all siblings
    /// close; an open member closes.
    pub fn toggle(&mut self, index: usize) -> Vec<MemberChange> {
        let Some(was_open) = self.members.get(index).map(|m| m.widget().is_open()) else {
            return Vec::new();
        };
        let mut changes = self.close_all();
        if !was_open {
            if let Some(member) = self.members.get_mut(index) {
                let transition = member.widget_mut().open();
                if transition.changed() {
                    changes.push(MemberChange { index, transition });
                }
            }
        }
        changes
    }

    /// Close every member.
    pub fn close_all(&mut self) -> Vec<MemberChange> {
        self.members
            .iter_mut()
            .enumerate()
            .filter_map(|(index, member)| {
                let transition = member.widget_mut().close();
                transition
                    .changed()
                    .then_some(MemberChange { index, transition })
            })
            .collect()
    }

    /// Route a document click; `hit_for` classifies the target per member.
    pub fn on_outside_interaction(
        &mut self,
        mut hit_for: impl FnMut(usize) -> Hit,
    ) -> Vec<MemberChange> {
        self.members
            .iter_mut()
            .enumerate()
            .filter_map(|(index, member)| {
                let transition = member.widget_mut().on_outside_interaction(hit_for(index));
                transition
                    .changed()
                    .then_some(MemberChange { index, transition })
            })
            .collect()
    }

    /// Iterate members in document order.
    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(size: usize) -> ExclusiveGroup<ToggleWidget> {
        ExclusiveGroup::new((0..size).map(|_| ToggleWidget::new()).collect())
    }

    #[test]
    fn opening_a_member_closes_siblings() {
        let mut group = group(3);
        let _ = group.toggle(0);
        assert_eq!(group.open_index(), Some(0));

        let changes = group.toggle(2);
        assert_eq!(group.open_index(), Some(2));
        assert_eq!(
            changes,
            vec![
                MemberChange {
                    index: 0,
                    transition: Transition::Closed
                },
                MemberChange {
                    index: 2,
                    transition: Transition::Opened
                },
            ]
        );
        assert_eq!(group.iter().filter(|m| m.is_open()).count(), 1);
    }

    #[test]
    fn toggling_open_member_closes_it() {
        let mut group = group(2);
        let _ = group.toggle(1);
        let changes = group.toggle(1);
        assert_eq!(group.open_index(), None);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut group = group(2);
        let _ = group.toggle(0);
        assert!(group.toggle(5).is_empty());
        assert_eq!(group.open_index(), Some(0));
    }

    #[test]
    fn outside_click_closes_only_members_it_missed() {
        let mut group = group(2);
        let _ = group.toggle(1);
        let changes = group.on_outside_interaction(|index| {
            if index == 1 { Hit::Panel } else { Hit::Outside }
        });
        assert!(changes.is_empty());
        assert_eq!(group.open_index(), Some(1));

        let changes = group.on_outside_interaction(|_| Hit::Outside);
        assert_eq!(changes.len(), 1);
        assert!(!group.is_empty());
        assert_eq!(group.open_index(), None);
        assert_eq!(group.len(), 2);
    }
}
