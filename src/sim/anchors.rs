//! Append-only history of anchor states
//!
//! One anchor per jump plus the initial state, ordered by strictly
//! increasing time. The store only checks ordering; jump rules live in
//! `Simulation::add_jump`.

use super::error::SimError;
use super::state::BirdState;

#[derive(Debug, Clone, Default)]
pub struct AnchorStore {
    anchors: Vec<BirdState>,
}

impl AnchorStore {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
        }
    }

    /// Drop all history and start over from `initial`
    pub fn reset(&mut self, initial: BirdState) {
        self.anchors.clear();
        self.anchors.push(initial);
    }

    /// Append an anchor. Caller guarantees `anchor.time > last().time`.
    pub(crate) fn push(&mut self, anchor: BirdState) {
        debug_assert!(
            self.anchors.last().is_none_or(|last| anchor.time > last.time),
            "anchors must be strictly ordered"
        );
        self.anchors.push(anchor);
    }

    pub fn last(&self) -> Option<BirdState> {
        self.anchors.last().copied()
    }

    /// Anchor with the greatest `time <= t`
    pub fn find_anchor_for(&self, t: f64) -> Result<BirdState, SimError> {
        // Times are sorted, so the anchors at or before `t` form a prefix
        let count = self.anchors.partition_point(|a| a.time <= t);
        match count {
            0 => Err(SimError::Uninitialized),
            n => Ok(self.anchors[n - 1]),
        }
    }

    pub fn as_slice(&self) -> &[BirdState] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: f64) -> BirdState {
        BirdState {
            time,
            ..BirdState::spawn(0.0, time)
        }
    }

    fn store(times: &[f64]) -> AnchorStore {
        let mut store = AnchorStore::new();
        store.reset(at(times[0]));
        for &t in &times[1..] {
            store.push(at(t));
        }
        store
    }

    #[test]
    fn test_empty_store_is_uninitialized() {
        let store = AnchorStore::new();
        assert!(store.is_empty());
        assert_eq!(store.find_anchor_for(10.0), Err(SimError::Uninitialized));
        assert!(store.last().is_none());
    }

    #[test]
    fn test_find_anchor_past_and_future() {
        let store = store(&[0.0, 5.0, 12.0]);
        assert_eq!(store.find_anchor_for(0.0).unwrap().time, 0.0);
        assert_eq!(store.find_anchor_for(4.99).unwrap().time, 0.0);
        assert_eq!(store.find_anchor_for(5.0).unwrap().time, 5.0);
        assert_eq!(store.find_anchor_for(11.0).unwrap().time, 5.0);
        assert_eq!(store.find_anchor_for(12.0).unwrap().time, 12.0);
        assert_eq!(store.find_anchor_for(1e9).unwrap().time, 12.0);
    }

    #[test]
    fn test_time_before_history_is_uninitialized() {
        let store = store(&[0.0, 3.0]);
        assert_eq!(store.find_anchor_for(-0.5), Err(SimError::Uninitialized));
    }

    #[test]
    fn test_reset_keeps_only_initial() {
        let mut store = store(&[0.0, 3.0, 8.0]);
        assert_eq!(store.len(), 3);
        store.reset(at(0.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.last().unwrap().time, 0.0);
    }

    #[test]
    fn test_returned_anchor_is_a_copy() {
        let store = store(&[0.0]);
        let mut copy = store.find_anchor_for(1.0).unwrap();
        copy.y = -999.0;
        assert_eq!(store.as_slice()[0].y, 0.0);
    }
}
