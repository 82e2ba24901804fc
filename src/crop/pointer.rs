// SPDX-License-Identifier: MPL-2.0
//! Unified pointer input.
//!
//! Mouse and single-finger touch streams are normalized into one stream of
//! [`PointerEvent`]s in container coordinates. The engine only ever sees that
//! stream (through [`GestureSink`]), so gesture handling exists once
//! regardless of the input device.

use crate::domain::Point;

/// Device that produced a gesture. Touch gets a larger handle tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Normalized gesture lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Start { position: Point, kind: PointerKind },
    Move(Point),
    End,
}

impl PointerEvent {
    /// Forwards the event to the matching sink callback.
    pub fn dispatch<S: GestureSink + ?Sized>(self, sink: &mut S) {
        match self {
            PointerEvent::Start { position, kind } => sink.gesture_start(position, kind),
            PointerEvent::Move(position) => sink.gesture_move(position),
            PointerEvent::End => sink.gesture_end(),
        }
    }
}

/// Receiver of the normalized gesture stream.
pub trait GestureSink {
    fn gesture_start(&mut self, position: Point, kind: PointerKind);
    fn gesture_move(&mut self, position: Point);
    fn gesture_end(&mut self);
}

/// Output of an adapter for one raw input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub event: Option<PointerEvent>,
    /// The host must swallow the raw event (no scroll, zoom, selection or
    /// context menu) because a gesture owns the pointer.
    pub capture: bool,
}

impl Normalized {
    const IGNORED: Self = Self {
        event: None,
        capture: false,
    };

    fn captured(event: Option<PointerEvent>) -> Self {
        Self {
            event,
            capture: true,
        }
    }
}

/// Raw mouse input, already translated to container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseInput {
    /// Primary button pressed. `inside` tells whether the cursor is over the
    /// container; presses elsewhere never start a gesture.
    Pressed { position: Point, inside: bool },
    /// Cursor moved, anywhere in the window.
    Moved(Point),
    Released,
    /// Cursor left the window. A release may never arrive after this.
    Left,
}

/// Raw touch input, already translated to container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchInput {
    Pressed { id: u64, position: Point, inside: bool },
    Moved { id: u64, position: Point },
    Lifted { id: u64 },
    /// The platform cancelled the contact.
    Lost { id: u64 },
}

/// Mouse adapter. Moves are tracked outside the container while the button
/// is held so a drag is not cut short at the container edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseAdapter {
    pressed: bool,
}

impl MouseAdapter {
    pub fn handle(&mut self, input: MouseInput) -> Normalized {
        match input {
            MouseInput::Pressed { position, inside } if inside && !self.pressed => {
                self.pressed = true;
                Normalized::captured(Some(PointerEvent::Start {
                    position,
                    kind: PointerKind::Mouse,
                }))
            }
            MouseInput::Moved(position) if self.pressed => {
                Normalized::captured(Some(PointerEvent::Move(position)))
            }
            MouseInput::Released | MouseInput::Left if self.pressed => {
                self.pressed = false;
                Normalized::captured(Some(PointerEvent::End))
            }
            _ => Normalized::IGNORED,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pressed
    }
}

/// Single-finger touch adapter.
///
/// The first finger down owns the gesture. Any further finger makes the
/// contact a multi-touch one: its events are swallowed and moves of the
/// primary finger become no-ops until the extra fingers lift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchAdapter {
    primary: Option<u64>,
    fingers: Vec<u64>,
}

impl TouchAdapter {
    pub fn handle(&mut self, input: TouchInput) -> Normalized {
        match input {
            TouchInput::Pressed {
                id,
                position,
                inside,
            } => {
                if !self.fingers.contains(&id) {
                    self.fingers.push(id);
                }
                if self.primary.is_some() {
                    return Normalized::captured(None);
                }
                if inside && self.fingers.len() == 1 {
                    self.primary = Some(id);
                    return Normalized::captured(Some(PointerEvent::Start {
                        position,
                        kind: PointerKind::Touch,
                    }));
                }
                Normalized::IGNORED
            }
            TouchInput::Moved { id, position } => match self.primary {
                Some(primary) if primary == id && self.fingers.len() == 1 => {
                    Normalized::captured(Some(PointerEvent::Move(position)))
                }
                Some(_) => Normalized::captured(None),
                None => Normalized::IGNORED,
            },
            TouchInput::Lifted { id } | TouchInput::Lost { id } => {
                self.fingers.retain(|finger| *finger != id);
                match self.primary {
                    Some(primary) if primary == id => {
                        self.primary = None;
                        Normalized::captured(Some(PointerEvent::End))
                    }
                    Some(_) => Normalized::captured(None),
                    None => Normalized::IGNORED,
                }
            }
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.primary.is_some()
    }

    /// True while more than one finger is down.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.fingers.len() > 1
    }
}
