//! Property group coordinator
//!
//! Collects changed members of every property group during a commit and hands
//! each touched group out exactly once at the commit boundary. Per instance and
//! group the lifecycle is `Idle -> Collecting -> Flushed -> Idle`.

use super::PropValue;
use crate::native::ObjectId;
use std::collections::BTreeMap;

/// Where one group of one instance is in the current commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPhase {
    /// No member changed yet
    Idle,
    /// At least one member changed, update not run yet
    Collecting,
    /// Update ran this commit
    Flushed,
}

/// Changed members of one group.
///
/// Members that did not change are absent. A member that was removed is
/// present with no value, so `contains` and `get` answer different questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupValues {
    values: BTreeMap<&'static str, Option<PropValue>>,
}

impl GroupValues {
    pub(crate) fn insert(&mut self, key: &'static str, value: Option<PropValue>) {
        self.values.insert(key, value);
    }

    /// Current value of a changed member, `None` when unchanged or removed
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key).and_then(Option::as_ref)
    }

    /// Whether a member changed (including removal)
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Numeric value of a changed member
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropValue::as_number)
    }

    /// Changed member names
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug)]
struct PendingGroup {
    instance: ObjectId,
    group: usize,
    values: GroupValues,
    phase: GroupPhase,
}

/// Per-commit accumulator of group member changes
#[derive(Debug, Default)]
pub struct PropertyGroupCoordinator {
    pending: Vec<PendingGroup>,
}

impl PropertyGroupCoordinator {
    /// Create an idle coordinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a commit; anything left from an aborted commit is dropped
    pub fn begin_commit(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Dropping {} group updates from an unfinished commit", self.pending.len());
            self.pending.clear();
        }
    }

    /// Record a changed member
    pub fn collect(&mut self, instance: ObjectId, group: usize, key: &'static str, value: Option<PropValue>) {
        let entry = match self
            .pending
            .iter_mut()
            .position(|pending| pending.instance == instance && pending.group == group)
        {
            Some(index) => &mut self.pending[index],
            None => {
                self.pending.push(PendingGroup {
                    instance,
                    group,
                    values: GroupValues::default(),
                    phase: GroupPhase::Collecting,
                });
                let last = self.pending.len() - 1;
                &mut self.pending[last]
            }
        };

        if entry.phase == GroupPhase::Flushed {
            log::warn!("Group {} of {:?} changed after it was flushed; ignoring `{}`", group, instance, key);
            return;
        }
        entry.values.insert(key, value);
    }

    /// Take every collecting group, in the order they were first touched, and
    /// mark them flushed
    pub fn take_ready(&mut self) -> Vec<(ObjectId, usize, GroupValues)> {
        self.pending
            .iter_mut()
            .filter(|pending| pending.phase == GroupPhase::Collecting)
            .map(|pending| {
                pending.phase = GroupPhase::Flushed;
                (pending.instance, pending.group, std::mem::take(&mut pending.values))
            })
            .collect()
    }

    /// Close the commit; every group returns to idle
    pub fn end_commit(&mut self) {
        self.pending.clear();
    }

    /// Forget pending changes of an instance being disposed
    pub fn discard(&mut self, instance: ObjectId) {
        self.pending.retain(|pending| pending.instance != instance);
    }

    /// Phase of one group of one instance
    pub fn phase(&self, instance: ObjectId, group: usize) -> GroupPhase {
        self.pending
            .iter()
            .find(|pending| pending.instance == instance && pending.group == group)
            .map_or(GroupPhase::Idle, |pending| pending.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<ObjectId> {
        let mut map: SlotMap<ObjectId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_group_fires_once_with_all_changed_members() {
        let id = ids(1)[0];
        let mut groups = PropertyGroupCoordinator::new();
        groups.begin_commit();
        groups.collect(id, 0, "intensity", Some(PropValue::from(2)));
        groups.collect(id, 0, "power", None);
        assert_eq!(groups.phase(id, 0), GroupPhase::Collecting);

        let ready = groups.take_ready();
        assert_eq!(ready.len(), 1);
        let (_, _, values) = &ready[0];
        assert_eq!(values.number("intensity"), Some(2.0));
        assert!(values.contains("power"));
        assert!(values.get("power").is_none());

        assert_eq!(groups.phase(id, 0), GroupPhase::Flushed);
        assert!(groups.take_ready().is_empty());

        groups.end_commit();
        assert_eq!(groups.phase(id, 0), GroupPhase::Idle);
    }

    #[test]
    fn test_unchanged_members_are_omitted() {
        let id = ids(1)[0];
        let mut groups = PropertyGroupCoordinator::new();
        groups.begin_commit();
        groups.collect(id, 0, "width", Some(PropValue::from(640)));

        let ready = groups.take_ready();
        let keys: Vec<_> = ready[0].2.keys().collect();
        assert_eq!(keys, vec!["width"]);
    }

    #[test]
    fn test_discard_drops_pending_changes() {
        let both = ids(2);
        let mut groups = PropertyGroupCoordinator::new();
        groups.begin_commit();
        groups.collect(both[0], 0, "power", Some(PropValue::from(5)));
        groups.collect(both[1], 0, "power", Some(PropValue::from(6)));
        groups.discard(both[0]);

        let ready = groups.take_ready();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, both[1]);
    }
}
