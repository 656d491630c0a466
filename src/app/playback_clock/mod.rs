// Playback clock - bridges the playback primitive into the selection model

use crate::domain::selection::SelectionModel;
use crate::ports::PlaybackPort;

/// Consistent view of the primitive at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSnapshot {
    pub duration: f64,
    pub current_time: f64,
    pub is_playing: bool,
}

/// Forwards the primitive's notifications without buffering or correction:
/// the time shown is exactly the last value the primitive reported.
pub struct PlaybackClock<P: PlaybackPort> {
    player: P,
}

impl<P: PlaybackPort> PlaybackClock<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// "Metadata ready": returns the forwarded duration, or `None` if the
    /// primitive still has none to report.
    pub fn on_metadata_ready(&self, selection: &mut SelectionModel) -> Option<f64> {
        let duration = self.player.duration()?;
        selection.set_duration(duration);
        Some(duration)
    }

    /// Periodic "time update"
    pub fn on_time_update(&self, selection: &mut SelectionModel) {
        selection.set_current_time(self.player.current_time());
    }

    /// Returns whether the primitive is playing afterwards
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.player.is_paused() {
            self.player.play();
        } else {
            self.player.pause();
        }
        !self.player.is_paused()
    }

    pub fn seek(&mut self, time: f64) {
        self.player.seek(time);
    }

    pub fn apply_volume(&mut self, volume: f64) {
        self.player.set_volume(volume);
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            duration: self.player.duration().unwrap_or(0.0),
            current_time: self.player.current_time(),
            is_playing: !self.player.is_paused(),
        }
    }
}
