// Gesture rules - maps raw input to selection and playback commands

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::mixer::VOLUME_STEP;
use crate::domain::selection::{SelectionModel, FRAME_STEP, SKIP_STEP};

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Space,
    Period,
    Comma,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

impl Key {
    /// Accepts DOM key codes (`KeyS`, `ArrowUp`) and single characters
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let key = match name {
            "Space" | " " => Key::Space,
            "Period" | "." => Key::Period,
            "Comma" | "," => Key::Comma,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            other => {
                let letter = other.strip_prefix("Key").unwrap_or(other);
                let mut chars = letter.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return Err(DomainError::BadArgs(format!("Unknown key: {}", name))),
                }
            }
        };
        Ok(key)
    }

    fn is_char(&self, expected: char) -> bool {
        matches!(self, Key::Char(c) if c.eq_ignore_ascii_case(&expected))
    }
}

impl TryFrom<String> for Key {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Key::parse(&value)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Space => "Space".to_string(),
            Key::Period => "Period".to_string(),
            Key::Comma => "Comma".to_string(),
            Key::ArrowLeft => "ArrowLeft".to_string(),
            Key::ArrowRight => "ArrowRight".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::Char(c) => c.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, alt: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, alt: false };
    pub const ALT: Modifiers = Modifiers { shift: false, alt: true };
}

/// Horizontal extent of the timeline track, in the pointer's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Media time under `x`, clamped to `[0, duration]`
    pub fn time_at(&self, x: f64, selection: &SelectionModel) -> f64 {
        if self.width.is_nan() || self.width <= 0.0 {
            return 0.0;
        }
        selection.time_at_fraction((x - self.left) / self.width)
    }
}

/// Element of the timeline that received a pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    Track,
    StartHandle,
    EndHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragHandle {
    Start,
    End,
}

/// Raw input as delivered by the host surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerDown {
        x: f64,
        target: PointerTarget,
        track: TrackGeometry,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
    },
    PointerUp {
        x: f64,
    },
}

/// Handle and track geometry captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragContext {
    pub handle: DragHandle,
    pub track: TrackGeometry,
}

/// Action resolved from one input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TogglePlayPause,
    SeekRelative(f64),
    SeekTo(f64),
    MarkStart,
    MarkEnd,
    SetStart(f64),
    SetEnd(f64),
    AdjustVolume(f64),
    ToggleMute,
    BeginDrag(DragContext),
    EndDrag,
}

/// Stateless routing table. Rows are tried top to bottom and the first
/// match wins, so a shift-click on a handle sets the start instead of
/// starting a drag.
pub struct GestureRouter;

impl GestureRouter {
    pub fn route(
        event: &InputEvent,
        selection: &SelectionModel,
        drag: Option<&DragContext>,
    ) -> Option<Command> {
        match *event {
            InputEvent::KeyDown { key, .. } => Self::route_key(key),
            InputEvent::PointerDown {
                x,
                target,
                track,
                modifiers,
            } => Some(Self::route_pointer_down(x, target, track, modifiers, selection)),
            InputEvent::PointerMove { x } => {
                let drag = drag?;
                let time = drag.track.time_at(x, selection);
                Some(match drag.handle {
                    DragHandle::Start => Command::SetStart(time),
                    DragHandle::End => Command::SetEnd(time),
                })
            }
            InputEvent::PointerUp { .. } => drag.map(|_| Command::EndDrag),
        }
    }

    fn route_key(key: Key) -> Option<Command> {
        let command = match key {
            Key::Space => Command::TogglePlayPause,
            Key::Period => Command::SeekRelative(FRAME_STEP),
            Key::Comma => Command::SeekRelative(-FRAME_STEP),
            Key::ArrowRight => Command::SeekRelative(SKIP_STEP),
            Key::ArrowLeft => Command::SeekRelative(-SKIP_STEP),
            k if k.is_char('s') => Command::MarkStart,
            k if k.is_char('e') => Command::MarkEnd,
            Key::ArrowUp => Command::AdjustVolume(VOLUME_STEP),
            Key::ArrowDown => Command::AdjustVolume(-VOLUME_STEP),
            k if k.is_char('m') => Command::ToggleMute,
            Key::Char(_) => return None,
        };
        Some(command)
    }

    fn route_pointer_down(
        x: f64,
        target: PointerTarget,
        track: TrackGeometry,
        modifiers: Modifiers,
        selection: &SelectionModel,
    ) -> Command {
        let time = track.time_at(x, selection);

        if target == PointerTarget::Track && !modifiers.shift && !modifiers.alt {
            return Command::SeekTo(time);
        }
        if modifiers.shift {
            return Command::SetStart(time.min(selection.end_time()));
        }
        if modifiers.alt {
            return Command::SetEnd(time.max(selection.start_time()));
        }

        let handle = match target {
            PointerTarget::StartHandle => DragHandle::Start,
            PointerTarget::EndHandle => DragHandle::End,
            PointerTarget::Track => return Command::SeekTo(time),
        };
        Command::BeginDrag(DragContext { handle, track })
    }
}
