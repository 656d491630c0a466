// Editor session - single owner of the selection, mixer and playback clock

pub mod listeners;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::app::playback_clock::{ClockSnapshot, PlaybackClock};
use crate::domain::mixer::AudioMixer;
use crate::domain::model::{ExportOptions, SourceFile};
use crate::domain::rules::{Command, DragContext, GestureRouter, InputEvent};
use crate::domain::selection::SelectionModel;
use crate::ports::PlaybackPort;

pub use listeners::{ListenerGuard, ListenerKind, ListenerRegistry};

/// Notifications raised by the playback primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaEvent {
    MetadataLoaded,
    TimeUpdate,
}

/// Anything the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionEvent {
    Input(InputEvent),
    Media { media: MediaEvent },
}

/// A drag in progress. Its move/release listeners live exactly as long as
/// this value does.
struct DragSession {
    context: DragContext,
    _move_listener: ListenerGuard,
    _release_listener: ListenerGuard,
}

/// Editing session for one loaded video.
///
/// Events are handled one at a time and run to completion. Only this type
/// holds the [`SelectionModel`] mutably; callers read it through
/// [`selection`](Self::selection).
pub struct EditorSession<P: PlaybackPort> {
    selection: SelectionModel,
    mixer: AudioMixer,
    clock: PlaybackClock<P>,
    output: ExportOptions,
    source: Option<SourceFile>,
    listeners: ListenerRegistry,
    drag: Option<DragSession>,
    _keyboard: ListenerGuard,
}

impl<P: PlaybackPort> EditorSession<P> {
    pub fn new(player: P) -> Self {
        Self::with_registry(player, ListenerRegistry::new())
    }

    /// Use a shared registry, e.g. the host's global listener table
    pub fn with_registry(player: P, listeners: ListenerRegistry) -> Self {
        let keyboard = listeners.register(ListenerKind::KeyDown);
        Self {
            selection: SelectionModel::new(),
            mixer: AudioMixer::new(),
            clock: PlaybackClock::new(player),
            output: ExportOptions::default(),
            source: None,
            listeners,
            drag: None,
            _keyboard: keyboard,
        }
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn mixer(&self) -> &AudioMixer {
        &self.mixer
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        self.clock.snapshot()
    }

    pub fn player(&self) -> &P {
        self.clock.player()
    }

    pub fn player_mut(&mut self) -> &mut P {
        self.clock.player_mut()
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    /// Select a new video; the previous selection and any drag are discarded
    pub fn load_source(&mut self, file: SourceFile) {
        debug!(file = %file.file_name, bytes = file.len(), "Loading source video");
        self.unload();
        self.source = Some(file);
    }

    pub fn unload(&mut self) -> Option<SourceFile> {
        self.drag = None;
        self.selection.reset();
        self.source.take()
    }

    /// Export options as of now; gain comes from the mixer
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            gain: self.mixer.export_gain(),
            ..self.output.clone()
        }
    }

    pub fn set_export_options(&mut self, options: ExportOptions) {
        self.mixer.set_export_gain(options.gain);
        self.output = options;
    }

    pub fn set_export_gain(&mut self, gain: f64) -> f64 {
        self.mixer.set_export_gain(gain)
    }

    pub fn set_playback_volume(&mut self, volume: f64) {
        let monitor = self.mixer.set_playback_volume(volume);
        self.clock.apply_volume(monitor);
    }

    /// Set both ends of the range as two consecutive edits
    pub fn set_range(&mut self, start: f64, end: f64) {
        self.apply(Command::SetStart(start));
        self.apply(Command::SetEnd(end));
    }

    pub fn handle(&mut self, event: &SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::Input(input) => self.handle_input(input),
            SessionEvent::Media { media } => {
                self.handle_media(*media);
                None
            }
        }
    }

    /// Route and apply one input event; returns the command it resolved to
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Command> {
        if !self.accepts(event) {
            return None;
        }

        let drag = self.drag.as_ref().map(|d| &d.context);
        let command = GestureRouter::route(event, &self.selection, drag)?;
        trace!(?event, ?command, "Input routed");
        self.apply(command);
        Some(command)
    }

    pub fn handle_media(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded => {
                if let Some(duration) = self.clock.on_metadata_ready(&mut self.selection) {
                    debug!(duration, "Media metadata ready");
                    self.clock.apply_volume(self.mixer.monitor_volume());
                }
            }
            MediaEvent::TimeUpdate => self.clock.on_time_update(&mut self.selection),
        }
    }

    fn accepts(&self, event: &InputEvent) -> bool {
        let kind = match event {
            InputEvent::KeyDown { .. } => ListenerKind::KeyDown,
            InputEvent::PointerMove { .. } => ListenerKind::PointerMove,
            InputEvent::PointerUp { .. } => ListenerKind::PointerUp,
            InputEvent::PointerDown { .. } => return true,
        };
        self.listeners.is_listening(kind)
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePlayPause => {
                self.clock.toggle_play_pause();
            }
            Command::SeekRelative(delta) => {
                self.selection.seek_relative(delta);
                self.clock.seek(self.selection.current_time());
            }
            Command::SeekTo(time) => {
                self.selection.set_current_time(time);
                self.clock.seek(self.selection.current_time());
            }
            Command::MarkStart => self.selection.set_start(self.selection.current_time()),
            Command::MarkEnd => self.selection.set_end(self.selection.current_time()),
            Command::SetStart(time) => self.selection.set_start(time),
            Command::SetEnd(time) => self.selection.set_end(time),
            Command::AdjustVolume(delta) => {
                let monitor = self.mixer.adjust_playback_volume(delta);
                self.clock.apply_volume(monitor);
            }
            Command::ToggleMute => {
                let monitor = self.mixer.toggle_mute();
                self.clock.apply_volume(monitor);
            }
            Command::BeginDrag(context) => {
                // Release the previous drag's listeners before installing new ones
                self.drag = None;
                self.drag = Some(DragSession {
                    context,
                    _move_listener: self.listeners.register(ListenerKind::PointerMove),
                    _release_listener: self.listeners.register(ListenerKind::PointerUp),
                });
            }
            Command::EndDrag => self.drag = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::simulated_playback::SimulatedPlayer;
    use crate::domain::rules::{Key, Modifiers, PointerTarget, TrackGeometry};

    fn session(duration: f64) -> EditorSession<SimulatedPlayer> {
        let mut session = EditorSession::new(SimulatedPlayer::new(duration));
        session.load_source(SourceFile::new("clip.mp4", vec![0; 16]));
        session.player_mut().load_metadata();
        session.handle_media(MediaEvent::MetadataLoaded);
        session
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn press(x: f64, target: PointerTarget) -> InputEvent {
        InputEvent::PointerDown {
            x,
            target,
            track: TrackGeometry::new(0.0, 100.0),
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_metadata_initializes_selection() {
        let session = session(10.0);
        assert_eq!(session.selection().duration(), 10.0);
        assert_eq!(session.selection().end_time(), 10.0);
    }

    #[test]
    fn test_seek_keys_move_selection_and_player() {
        let mut session = session(10.0);
        session.handle_input(&key(Key::ArrowRight));
        assert_eq!(session.selection().current_time(), 5.0);
        assert_eq!(session.player().current_time(), 5.0);

        session.handle_input(&key(Key::ArrowRight));
        session.handle_input(&key(Key::ArrowRight));
        assert_eq!(session.selection().current_time(), 10.0);
    }

    #[test]
    fn test_mark_keys_use_current_time() {
        let mut session = session(10.0);
        session.handle_input(&press(20.0, PointerTarget::Track));
        session.handle_input(&key(Key::Char('s')));
        session.handle_input(&press(70.0, PointerTarget::Track));
        session.handle_input(&key(Key::Char('e')));
        assert_eq!(session.selection().start_time(), 2.0);
        assert_eq!(session.selection().end_time(), 7.0);
    }

    #[test]
    fn test_space_toggles_player() {
        let mut session = session(10.0);
        session.handle_input(&key(Key::Space));
        assert!(session.snapshot().is_playing);
        session.handle_input(&key(Key::Space));
        assert!(!session.snapshot().is_playing);
    }

    #[test]
    fn test_time_updates_and_user_seeks_last_write_wins() {
        let mut session = session(10.0);
        session.handle_input(&key(Key::Space));
        session.player_mut().advance(1.5);
        session.handle_media(MediaEvent::TimeUpdate);
        session.handle_input(&key(Key::ArrowRight));
        assert_eq!(session.selection().current_time(), 6.5);

        session.player_mut().advance(0.5);
        session.handle_media(MediaEvent::TimeUpdate);
        assert_eq!(session.selection().current_time(), 7.0);
    }

    #[test]
    fn test_volume_keys_drive_monitor_volume_only() {
        let mut session = session(10.0);
        session.set_export_gain(1.8);
        session.handle_input(&key(Key::ArrowDown));
        session.handle_input(&key(Key::ArrowDown));
        assert!((session.player().volume() - 0.9).abs() < 1e-9);
        assert_eq!(session.export_options().gain, 1.8);

        session.handle_input(&key(Key::Char('m')));
        assert_eq!(session.player().volume(), 0.0);
        session.handle_input(&key(Key::Char('m')));
        assert_eq!(session.player().volume(), session.mixer().playback_volume());
    }

    #[test]
    fn test_handle_drag_updates_range_and_cleans_up() {
        let mut session = session(10.0);
        assert_eq!(session.listeners().len(), 1);

        session.handle_input(&press(0.0, PointerTarget::StartHandle));
        assert!(session.is_dragging());
        assert_eq!(session.listeners().len(), 3);

        session.handle_input(&InputEvent::PointerMove { x: 30.0 });
        assert_eq!(session.selection().start_time(), 3.0);
        session.handle_input(&InputEvent::PointerMove { x: 45.0 });
        assert_eq!(session.selection().start_time(), 4.5);

        session.handle_input(&InputEvent::PointerUp { x: 45.0 });
        assert!(!session.is_dragging());
        assert_eq!(session.listeners().len(), 1);

        session.handle_input(&InputEvent::PointerMove { x: 90.0 });
        assert_eq!(session.selection().start_time(), 4.5);
    }

    #[test]
    fn test_repeated_drags_do_not_leak_listeners() {
        let mut session = session(10.0);
        for round in 0..25 {
            let target = if round % 2 == 0 {
                PointerTarget::StartHandle
            } else {
                PointerTarget::EndHandle
            };
            session.handle_input(&press(50.0, target));
            session.handle_input(&InputEvent::PointerMove { x: 10.0 + round as f64 });
            if round % 3 != 0 {
                session.handle_input(&InputEvent::PointerUp { x: 10.0 });
            }
        }
        assert!(session.listeners().len() <= 3);
        session.handle_input(&InputEvent::PointerUp { x: 0.0 });
        assert_eq!(session.listeners().len(), 1);
        assert!(session.selection().end_time() > session.selection().start_time());
    }

    #[test]
    fn test_teardown_releases_all_listeners() {
        let registry = ListenerRegistry::new();
        {
            let mut session = EditorSession::with_registry(SimulatedPlayer::new(10.0), registry.clone());
            session.player_mut().load_metadata();
            session.handle_media(MediaEvent::MetadataLoaded);
            session.handle_input(&press(100.0, PointerTarget::EndHandle));
            assert_eq!(registry.len(), 3);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unload_ends_drag_and_resets_selection() {
        let mut session = session(10.0);
        session.handle_input(&press(100.0, PointerTarget::EndHandle));
        let source = session.unload();
        assert_eq!(source.map(|s| s.file_name), Some("clip.mp4".to_string()));
        assert!(!session.is_dragging());
        assert_eq!(session.listeners().len(), 1);
        assert!(!session.selection().has_media());
    }

    #[test]
    fn test_export_options_take_gain_from_mixer() {
        let mut session = session(10.0);
        let options = ExportOptions::default().with_gain(0.5).with_frame_rate(24).unwrap();
        session.set_export_options(options);
        assert_eq!(session.export_options().gain, 0.5);
        session.set_export_gain(1.25);
        let options = session.export_options();
        assert_eq!(options.gain, 1.25);
        assert_eq!(options.frame_rate, Some(24));
    }

    #[test]
    fn test_session_event_json_forms() {
        let media: SessionEvent = serde_json::from_str(r#"{"media":"time_update"}"#).unwrap();
        assert_eq!(
            media,
            SessionEvent::Media {
                media: MediaEvent::TimeUpdate
            }
        );
        let input: SessionEvent = serde_json::from_str(r#"{"type":"key_down","key":"Space"}"#).unwrap();
        assert_eq!(input, SessionEvent::Input(key(Key::Space)));
    }
}
