//! Monitoring volume and export gain.
//!
//! The two values are deliberately independent: what the user hears while
//! scrubbing is `playback_volume` alone, while `export_gain` only travels to
//! the processing service as part of [`ExportOptions`](crate::domain::model::ExportOptions).

pub const MAX_PLAYBACK_VOLUME: f64 = 1.0;
pub const MAX_EXPORT_GAIN: f64 = 2.0;
pub const DEFAULT_EXPORT_GAIN: f64 = 1.0;
/// Step used by the volume keys
pub const VOLUME_STEP: f64 = 0.05;

/// Clamp a gain into `[0, 2]`; NaN keeps `fallback`
pub fn clamp_export_gain(gain: f64, fallback: f64) -> f64 {
    if gain.is_nan() {
        return fallback;
    }
    gain.clamp(0.0, MAX_EXPORT_GAIN)
}

fn clamp_volume(volume: f64, fallback: f64) -> f64 {
    if volume.is_nan() {
        return fallback;
    }
    volume.clamp(0.0, MAX_PLAYBACK_VOLUME)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioMixer {
    playback_volume: f64,
    export_gain: f64,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self {
            playback_volume: MAX_PLAYBACK_VOLUME,
            export_gain: DEFAULT_EXPORT_GAIN,
            muted: false,
        }
    }
}

impl AudioMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume the user chose, regardless of mute
    pub fn playback_volume(&self) -> f64 {
        self.playback_volume
    }

    pub fn export_gain(&self) -> f64 {
        self.export_gain
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Value to apply to the playback primitive
    pub fn monitor_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.playback_volume
        }
    }

    pub fn set_playback_volume(&mut self, volume: f64) -> f64 {
        self.playback_volume = clamp_volume(volume, self.playback_volume);
        self.monitor_volume()
    }

    pub fn adjust_playback_volume(&mut self, delta: f64) -> f64 {
        self.set_playback_volume(self.playback_volume + delta)
    }

    pub fn set_export_gain(&mut self, gain: f64) -> f64 {
        self.export_gain = clamp_export_gain(gain, self.export_gain);
        self.export_gain
    }

    /// Mute silences monitoring without touching the stored volume, so
    /// unmuting restores it bit for bit.
    pub fn toggle_mute(&mut self) -> f64 {
        self.muted = !self.muted;
        self.monitor_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_and_gain_are_clamped_independently() {
        let mut mixer = AudioMixer::new();
        assert_eq!(mixer.set_playback_volume(1.7), 1.0);
        assert_eq!(mixer.set_export_gain(1.7), 1.7);
        assert_eq!(mixer.set_export_gain(9.0), 2.0);
        assert_eq!(mixer.set_playback_volume(-0.2), 0.0);
        assert_eq!(mixer.export_gain(), 2.0);
    }

    #[test]
    fn test_gain_never_reaches_monitoring() {
        let mut mixer = AudioMixer::new();
        mixer.set_playback_volume(0.4);
        mixer.set_export_gain(2.0);
        assert_eq!(mixer.monitor_volume(), 0.4);
    }

    #[test]
    fn test_volume_step_saturates() {
        let mut mixer = AudioMixer::new();
        mixer.set_playback_volume(0.98);
        assert_eq!(mixer.adjust_playback_volume(VOLUME_STEP), 1.0);
        mixer.set_playback_volume(0.02);
        assert_eq!(mixer.adjust_playback_volume(-VOLUME_STEP), 0.0);
    }

    #[test]
    fn test_mute_round_trip_restores_exact_volume() {
        for volume in [0.0, 0.05, 1.0 / 3.0, 0.731, 1.0] {
            let mut mixer = AudioMixer::new();
            mixer.set_playback_volume(volume);
            assert_eq!(mixer.toggle_mute(), 0.0);
            assert!(mixer.is_muted());
            let restored = mixer.toggle_mute();
            assert_eq!(restored.to_bits(), volume.to_bits());
        }
    }

    #[test]
    fn test_nan_input_is_ignored() {
        let mut mixer = AudioMixer::new();
        mixer.set_playback_volume(0.5);
        assert_eq!(mixer.set_playback_volume(f64::NAN), 0.5);
        assert_eq!(mixer.set_export_gain(f64::NAN), DEFAULT_EXPORT_GAIN);
    }
}
