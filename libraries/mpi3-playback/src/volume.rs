//! Volume control over a fixed step table
//!
//! The mixer only ever sees values from a precomputed table: fine steps at
//! low volume, coarser ones above a ceiling. The controller moves an index
//! through that table and keeps an optional pre-mute index.

use crate::error::{PlaybackError, Result};
use tracing::{debug, warn};

/// System volume mixer
///
/// Calls are best-effort: the controller logs failures and carries on.
pub trait Mixer: Send {
    /// Set the output volume in percent (0-100)
    fn set_volume(&mut self, percent: u8) -> Result<()>;
}

/// Mixer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMixer;

impl Mixer for NullMixer {
    fn set_volume(&mut self, _percent: u8) -> Result<()> {
        Ok(())
    }
}

/// Strictly increasing volume percentages starting at 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeTable {
    steps: Vec<u8>,
}

impl VolumeTable {
    /// Use an explicit step list
    ///
    /// # Errors
    /// Returns an error unless the list is non-empty, starts at 0, strictly
    /// increases and stays within 100.
    pub fn new(steps: Vec<u8>) -> Result<Self> {
        if steps.first() != Some(&0) {
            return Err(PlaybackError::InvalidVolumeTable(
                "table must start at 0".to_string(),
            ));
        }
        if steps.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(PlaybackError::InvalidVolumeTable(
                "steps must strictly increase".to_string(),
            ));
        }
        if steps.iter().any(|&step| step > 100) {
            return Err(PlaybackError::InvalidVolumeTable(
                "steps must not exceed 100".to_string(),
            ));
        }
        Ok(Self { steps })
    }

    /// Build a two-range table
    ///
    /// Counts up from 0 by `low_step` while below `low_ceiling`, then from
    /// `low_ceiling` by `high_step`. 100 is always the last entry.
    ///
    /// `build(10, 90, 5)` gives `[0, 10, 20, ..., 80, 90, 95, 100]`.
    pub fn build(low_step: u8, low_ceiling: u8, high_step: u8) -> Result<Self> {
        if low_step == 0 || high_step == 0 {
            return Err(PlaybackError::InvalidVolumeTable(
                "volume steps must be positive".to_string(),
            ));
        }
        if low_ceiling > 100 {
            return Err(PlaybackError::InvalidVolumeTable(format!(
                "low ceiling {low_ceiling} exceeds 100"
            )));
        }

        let mut steps = Vec::new();
        let mut level = 0u16;
        while level < u16::from(low_ceiling) {
            steps.push(level as u8);
            level += u16::from(low_step);
        }
        level = u16::from(low_ceiling);
        while level <= 100 {
            steps.push(level as u8);
            level += u16::from(high_step);
        }
        if steps.last() != Some(&100) {
            steps.push(100);
        }

        Self::new(steps)
    }

    /// Percentages in ascending order
    pub fn steps(&self) -> &[u8] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; a table has at least the zero entry
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index for a desired default
    ///
    /// Exact match, else the highest entry below it. The zero entry always
    /// qualifies, so this never fails for a valid table.
    fn index_for(&self, desired: u8) -> Option<usize> {
        self.steps.iter().rposition(|&step| step <= desired)
    }
}

impl Default for VolumeTable {
    fn default() -> Self {
        Self {
            steps: vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 100],
        }
    }
}

/// Volume controller
///
/// Invariant: `index < table.len()`.
pub struct VolumeController {
    table: VolumeTable,
    index: usize,
    saved: Option<usize>,
    mixer: Box<dyn Mixer>,
}

impl VolumeController {
    /// Create a controller at the closest step not above `default`
    ///
    /// Pushes the starting volume to the mixer.
    pub fn new(table: VolumeTable, default: u8, mixer: Box<dyn Mixer>) -> Self {
        let index = table.index_for(default).unwrap_or_else(|| {
            warn!(default, "No volume step at or below default, using lowest step");
            0
        });
        if table.steps.get(index) != Some(&default) {
            debug!(
                default,
                chosen = table.steps.get(index).copied().unwrap_or(0),
                "Default volume not in step table"
            );
        }

        let mut controller = Self {
            table,
            index,
            saved: None,
            mixer,
        };
        controller.apply();
        controller
    }

    /// Current volume in percent
    pub fn current(&self) -> u8 {
        self.table.steps.get(self.index).copied().unwrap_or(0)
    }

    /// Current table index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether a pre-mute volume is stored
    pub fn is_muted(&self) -> bool {
        self.saved.is_some()
    }

    /// The step table
    pub fn table(&self) -> &VolumeTable {
        &self.table
    }

    /// Move one step up, clamped at the top
    pub fn increase(&mut self) -> u8 {
        if self.index + 1 < self.table.len() {
            self.index += 1;
        }
        self.saved = None;
        self.apply();
        self.current()
    }

    /// Move one step down, clamped at zero
    pub fn decrease(&mut self) -> u8 {
        self.index = self.index.saturating_sub(1);
        self.saved = None;
        self.apply();
        self.current()
    }

    /// Toggle mute
    ///
    /// Saves the current index and drops to zero, or restores the saved
    /// index. With nothing saved and the volume already at zero there is
    /// nothing to toggle: logs a warning and leaves the volume alone.
    pub fn mute(&mut self) -> u8 {
        if let Some(saved) = self.saved.take() {
            debug!(restored = self.table.steps[saved], "Unmuting");
            self.index = saved;
        } else if self.index > 0 {
            debug!(saved = self.current(), "Muting");
            self.saved = Some(self.index);
            self.index = 0;
        } else {
            warn!("Mute requested at zero volume with no saved level, ignoring");
            return self.current();
        }
        self.apply();
        self.current()
    }

    fn apply(&mut self) {
        let percent = self.current();
        if let Err(e) = self.mixer.set_volume(percent) {
            warn!(percent, error = %e, "Failed to set mixer volume");
        }
    }
}

impl std::fmt::Debug for VolumeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeController")
            .field("table", &self.table)
            .field("index", &self.index)
            .field("saved", &self.saved)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingMixer {
        calls: Arc<Mutex<Vec<u8>>>,
        fail: bool,
    }

    impl Mixer for RecordingMixer {
        fn set_volume(&mut self, percent: u8) -> Result<()> {
            self.calls.lock().unwrap().push(percent);
            if self.fail {
                Err(PlaybackError::Mixer("amixer exited with 1".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn create_controller(default: u8) -> (VolumeController, Arc<Mutex<Vec<u8>>>) {
        let mixer = RecordingMixer::default();
        let calls = mixer.calls.clone();
        let table = VolumeTable::build(10, 90, 5).unwrap();
        (VolumeController::new(table, default, Box::new(mixer)), calls)
    }

    #[test]
    fn build_two_range_table() {
        let table = VolumeTable::build(10, 90, 5).unwrap();
        assert_eq!(
            table.steps(),
            &[0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 100]
        );
        assert_eq!(table, VolumeTable::default());
    }

    #[test]
    fn build_appends_hundred() {
        let table = VolumeTable::build(25, 50, 30).unwrap();
        assert_eq!(table.steps(), &[0, 25, 50, 80, 100]);
    }

    #[test]
    fn build_rejects_zero_step() {
        assert!(VolumeTable::build(0, 90, 5).is_err());
        assert!(VolumeTable::build(10, 90, 0).is_err());
        assert!(VolumeTable::build(10, 101, 5).is_err());
    }

    #[test]
    fn new_rejects_bad_tables() {
        assert!(VolumeTable::new(vec![]).is_err());
        assert!(VolumeTable::new(vec![5, 10]).is_err());
        assert!(VolumeTable::new(vec![0, 10, 10]).is_err());
        assert!(VolumeTable::new(vec![0, 120]).is_err());
        assert!(VolumeTable::new(vec![0]).is_ok());
    }

    #[test]
    fn default_exact_match() {
        let (controller, calls) = create_controller(20);
        assert_eq!(controller.current(), 20);
        assert_eq!(*calls.lock().unwrap(), vec![20]);
    }

    #[test]
    fn default_rounds_down() {
        let (controller, _) = create_controller(93);
        assert_eq!(controller.current(), 90);
    }

    #[test]
    fn increase_clamps_at_top() {
        let (mut controller, _) = create_controller(90);
        for _ in 0..20 {
            controller.increase();
        }
        assert_eq!(controller.current(), 100);
        assert_eq!(controller.index(), controller.table().len() - 1);
    }

    #[test]
    fn decrease_clamps_at_zero() {
        let (mut controller, _) = create_controller(20);
        assert_eq!(controller.decrease(), 10);
        assert_eq!(controller.decrease(), 0);
        assert_eq!(controller.decrease(), 0);
    }

    #[test]
    fn mute_toggle_restores_level() {
        let (mut controller, calls) = create_controller(20);
        assert_eq!(controller.mute(), 0);
        assert!(controller.is_muted());
        assert_eq!(controller.mute(), 20);
        assert!(!controller.is_muted());
        assert_eq!(*calls.lock().unwrap(), vec![20, 0, 20]);
    }

    #[test]
    fn mute_at_zero_without_saved_is_noop() {
        let (mut controller, calls) = create_controller(0);
        assert_eq!(controller.mute(), 0);
        assert!(!controller.is_muted());
        // Only the initial volume was pushed
        assert_eq!(*calls.lock().unwrap(), vec![0]);
    }

    #[test]
    fn manual_change_forgets_saved_level() {
        let (mut controller, _) = create_controller(50);
        controller.mute();
        assert_eq!(controller.increase(), 10);
        assert!(!controller.is_muted());
        // Next mute saves 10 instead of restoring 50
        assert_eq!(controller.mute(), 0);
        assert_eq!(controller.mute(), 10);
    }

    #[test]
    fn mixer_failure_is_not_fatal() {
        let mixer = RecordingMixer {
            fail: true,
            ..RecordingMixer::default()
        };
        let mut controller = VolumeController::new(VolumeTable::default(), 50, Box::new(mixer));
        assert_eq!(controller.increase(), 60);
    }
}
