//! Position confidence model

use crate::types::ConfidenceSettings;

/// Trust in the current position estimate
///
/// Confidence decays on two independent channels: elapsed time and metres
/// walked since the last anchor. It never falls below the configured floor
/// and only rises through [`ConfidenceModel::anchor`].
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceModel {
    settings: ConfidenceSettings,
    value: f32,
}

impl ConfidenceModel {
    pub fn new(settings: ConfidenceSettings) -> Self {
        Self {
            settings,
            value: 1.0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Apply drift for `elapsed` seconds
    pub fn decay_time(&mut self, elapsed: f32) {
        if elapsed > 0.0 {
            self.lower(self.settings.decay_per_second * elapsed);
        }
    }

    /// Apply dead-reckoning error for `metres` walked
    pub fn decay_distance(&mut self, metres: f32) {
        if metres > 0.0 {
            self.lower(self.settings.decay_per_metre * metres);
        }
    }

    /// Set confidence to an anchored level, clamped into `[floor, 1]`
    pub fn anchor(&mut self, level: f32) {
        self.value = level.clamp(self.settings.floor, 1.0);
    }

    /// Back to full confidence, as on a fresh route
    pub fn reset(&mut self) {
        self.value = 1.0;
    }

    /// Level applied after manual recalibration
    pub fn manual_level(&self) -> f32 {
        self.settings.manual_confidence
    }

    /// Level applied for an external fix with the given accuracy in metres
    ///
    /// Tighter fixes earn higher confidence, bounded by the beacon range.
    pub fn beacon_level(&self, accuracy: f32) -> f32 {
        let s = &self.settings;
        (1.0 - accuracy.max(0.0) * s.beacon_accuracy_penalty).clamp(s.beacon_min, s.beacon_max)
    }

    fn lower(&mut self, amount: f32) {
        self.value = (self.value - amount).max(self.settings.floor);
    }
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        Self::new(ConfidenceSettings::default())
    }
}
