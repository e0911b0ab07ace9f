//! Two-slot history ring used by the note-tracking decoder.

use crate::snapshot::Snapshot;

/// The last displayed and the last simulated frame.
///
/// `pre_previous` is overwritten on every frame, `previous` only when a
/// line was actually emitted. Unchanged-field suppression compares against
/// `previous`; frequency deltas and gate edges compare against `pre_previous`.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Last frame that produced an output line
    pub previous: Snapshot,
    /// Last frame simulated, displayed or not
    pub pre_previous: Snapshot,
}

impl History {
    /// Fresh history with both slots zeroed and all notes unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both slots.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record `current` as the last emitted line.
    pub fn commit_displayed(&mut self, current: &Snapshot) {
        self.previous = *current;
    }

    /// Record `current` as the last simulated frame.
    pub fn commit_simulated(&mut self, current: &Snapshot) {
        self.pre_previous = *current;
    }

    /// Forget the note last displayed on `channel`.
    pub fn forget_displayed_note(&mut self, channel: usize) {
        self.previous.channels[channel].note = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_frequency(frequency: u16) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.channels[0].frequency = frequency;
        snapshot.channels[0].note = Some(48);
        snapshot
    }

    #[test]
    fn simulated_frames_do_not_touch_previous() {
        let mut history = History::new();
        history.commit_displayed(&snapshot_with_frequency(0x1000));
        history.commit_simulated(&snapshot_with_frequency(0x2000));
        assert_eq!(history.previous.channels[0].frequency, 0x1000);
        assert_eq!(history.pre_previous.channels[0].frequency, 0x2000);
    }

    #[test]
    fn forgetting_leaves_pre_previous_alone() {
        let mut history = History::new();
        let snapshot = snapshot_with_frequency(0x1168);
        history.commit_displayed(&snapshot);
        history.commit_simulated(&snapshot);
        history.forget_displayed_note(0);
        assert_eq!(history.previous.channels[0].note, None);
        assert_eq!(history.pre_previous.channels[0].note, Some(48));

        history.reset();
        assert_eq!(history.pre_previous, Snapshot::default());
    }
}
