// Simulated playback adapter - deterministic stand-in for a native player

use crate::ports::PlaybackPort;

/// In-memory player whose clock only moves when [`advance`](Self::advance) is called.
///
/// Metadata is not available until [`load_metadata`](Self::load_metadata),
/// mirroring a real element that reports duration asynchronously.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    media_duration: f64,
    metadata_loaded: bool,
    position: f64,
    paused: bool,
    volume: f64,
}

impl SimulatedPlayer {
    pub fn new(media_duration: f64) -> Self {
        Self {
            media_duration: media_duration.max(0.0),
            metadata_loaded: false,
            position: 0.0,
            paused: true,
            volume: 1.0,
        }
    }

    pub fn load_metadata(&mut self) {
        self.metadata_loaded = true;
    }

    /// Move the clock forward while playing; stops at the end of the media
    pub fn advance(&mut self, seconds: f64) {
        if self.paused || !self.metadata_loaded || seconds <= 0.0 {
            return;
        }
        self.position = (self.position + seconds).min(self.media_duration);
        if self.position >= self.media_duration {
            self.paused = true;
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

impl PlaybackPort for SimulatedPlayer {
    fn duration(&self) -> Option<f64> {
        self.metadata_loaded.then_some(self.media_duration)
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, time: f64) {
        self.position = time.clamp(0.0, self.media_duration);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_unknown_until_metadata() {
        let mut player = SimulatedPlayer::new(10.0);
        assert_eq!(player.duration(), None);
        player.load_metadata();
        assert_eq!(player.duration(), Some(10.0));
    }

    #[test]
    fn test_clock_only_moves_while_playing() {
        let mut player = SimulatedPlayer::new(10.0);
        player.load_metadata();
        player.advance(2.0);
        assert_eq!(player.current_time(), 0.0);

        player.play();
        player.advance(2.0);
        assert_eq!(player.current_time(), 2.0);

        player.advance(20.0);
        assert_eq!(player.current_time(), 10.0);
        assert!(player.is_paused());
    }
}
