// Selection model - trim range, playhead and media duration

use crate::domain::model::TrimRangeMs;

/// Minimum gap restored between start and end when a mutation collapses the range
pub const RANGE_EPSILON: f64 = 1.0;
/// One frame at the nominal 30 fps used by the frame-step keys
pub const FRAME_STEP: f64 = 1.0 / 30.0;
/// Coarse skip used by the arrow keys
pub const SKIP_STEP: f64 = 5.0;

/// Trim selection over a loaded media.
///
/// All fields start at zero. Once `duration > 0` every mutation leaves
/// `0 <= start < end <= duration` and `0 <= current <= duration`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionModel {
    duration: f64,
    current_time: f64,
    start_time: f64,
    end_time: f64,
}

/// Positions on a timeline surface as fractions of the media duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    pub playhead: f64,
    pub start: f64,
    pub end: f64,
    pub range_width: f64,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn has_media(&self) -> bool {
        self.duration > 0.0
    }

    /// Forget the loaded media
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The first positive duration also opens the range to the whole media.
    /// Later calls only re-clamp existing positions.
    pub fn set_duration(&mut self, duration: f64) {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        let first = self.duration == 0.0;
        self.duration = duration;

        if first {
            self.end_time = duration;
        }

        self.current_time = self.clamp(self.current_time);
        self.start_time = self.clamp(self.start_time);
        self.end_time = self.clamp(self.end_time);
        self.repair_range();
    }

    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = self.clamp(time);
    }

    pub fn set_start(&mut self, time: f64) {
        self.start_time = self.clamp(time).min(self.end_time);
        self.repair_range();
    }

    pub fn set_end(&mut self, time: f64) {
        self.end_time = self.clamp(time).max(self.start_time);
        self.repair_range();
    }

    pub fn seek_relative(&mut self, delta: f64) {
        self.set_current_time(self.current_time + delta);
    }

    /// Map a fraction of the timeline width to a media time
    pub fn time_at_fraction(&self, fraction: f64) -> f64 {
        self.clamp(self.duration * fraction)
    }

    pub fn range_ms(&self) -> TrimRangeMs {
        TrimRangeMs::from_seconds(self.start_time, self.end_time)
    }

    pub fn timeline_layout(&self) -> TimelineLayout {
        if !self.has_media() {
            return TimelineLayout {
                playhead: 0.0,
                start: 0.0,
                end: 0.0,
                range_width: 0.0,
            };
        }

        TimelineLayout {
            playhead: self.current_time / self.duration,
            start: self.start_time / self.duration,
            end: self.end_time / self.duration,
            range_width: (self.end_time - self.start_time) / self.duration,
        }
    }

    fn clamp(&self, time: f64) -> f64 {
        if time.is_nan() {
            return 0.0;
        }
        time.clamp(0.0, self.duration)
    }

    // end = start + ε unless that overshoots the media, in which case the
    // range is pinned to the tail: [max(0, duration - ε), duration].
    fn repair_range(&mut self) {
        if !self.has_media() || self.end_time > self.start_time {
            return;
        }

        let end = self.start_time + RANGE_EPSILON;
        if end <= self.duration {
            self.end_time = end;
        } else {
            self.end_time = self.duration;
            self.start_time = (self.duration - RANGE_EPSILON).max(0.0);
        }
    }
}
