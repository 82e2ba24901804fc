// SPDX-License-Identifier: MPL-2.0
//! Crop overlay: the canvas program that hosts the pointer handlers.
//!
//! The overlay covers the image container. It turns iced mouse and touch
//! events into the unified pointer stream, publishes them to the
//! application, and captures events while a gesture is active so nothing
//! underneath scrolls or zooms. It draws the committed rectangle only; the
//! engine stays the single owner of crop state.

use crate::crop::gesture::GestureMode;
use crate::crop::hit_test::{self, Hit};
use crate::crop::pointer::{
    MouseAdapter, MouseInput, Normalized, PointerEvent, TouchAdapter, TouchInput,
};
use crate::crop::CropEngine;
use crate::domain::{Corner, CropRect, ImageDisplayMetrics, OutputShape, Point};
use crate::ui::design_tokens::sizing;
use crate::ui::theme;
use iced::widget::canvas::{self, Canvas};
use iced::{mouse, touch, Element, Length, Rectangle};

/// Adapter state kept by the canvas between events.
#[derive(Debug, Default)]
pub struct OverlayInput {
    mouse: MouseAdapter,
    touch: TouchAdapter,
}

fn to_local(position: iced::Point, bounds: Rectangle) -> Point {
    Point::new(position.x - bounds.x, position.y - bounds.y)
}

impl OverlayInput {
    /// Normalizes one iced event into container coordinates.
    pub fn translate(
        &mut self,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Normalized {
        let unhandled = Normalized {
            event: None,
            capture: false,
        };
        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                match cursor.position() {
                    Some(position) => self.mouse.handle(MouseInput::Pressed {
                        position: to_local(position, bounds),
                        inside: cursor.is_over(bounds),
                    }),
                    None => unhandled,
                }
            }
            // Tracked even outside the bounds so a drag continues past the edge.
            iced::Event::Mouse(mouse::Event::CursorMoved { position }) => self
                .mouse
                .handle(MouseInput::Moved(to_local(*position, bounds))),
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                self.mouse.handle(MouseInput::Released)
            }
            iced::Event::Mouse(mouse::Event::CursorLeft) => self.mouse.handle(MouseInput::Left),
            iced::Event::Touch(touch::Event::FingerPressed { id, position }) => {
                self.touch.handle(TouchInput::Pressed {
                    id: id.0,
                    position: to_local(*position, bounds),
                    inside: bounds.contains(*position),
                })
            }
            iced::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                self.touch.handle(TouchInput::Moved {
                    id: id.0,
                    position: to_local(*position, bounds),
                })
            }
            iced::Event::Touch(touch::Event::FingerLifted { id, .. }) => {
                self.touch.handle(TouchInput::Lifted { id: id.0 })
            }
            iced::Event::Touch(touch::Event::FingerLost { id, .. }) => {
                self.touch.handle(TouchInput::Lost { id: id.0 })
            }
            _ => unhandled,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mouse.is_active() || self.touch.is_active()
    }
}

/// Canvas program used to draw and interact with the crop overlay.
pub struct CropOverlay<Message> {
    pub rect: CropRect,
    pub metrics: ImageDisplayMetrics,
    pub shape: OutputShape,
    /// Mode of the gesture in progress, for handle highlighting.
    pub active: Option<GestureMode>,
    /// Handle zone used for the cursor hint; matches what a press would hit.
    pub hit_tolerance: f32,
    on_pointer: fn(PointerEvent) -> Message,
}

impl<Message> CropOverlay<Message> {
    /// Snapshot of the engine's committed state, or `None` when the session
    /// has no rectangle to show.
    pub fn from_engine(engine: &CropEngine, on_pointer: fn(PointerEvent) -> Message) -> Option<Self> {
        Some(Self {
            rect: engine.crop_rect()?,
            metrics: engine.metrics()?,
            shape: engine.output_spec().map(|spec| spec.shape).unwrap_or_default(),
            active: engine.gesture().map(|gesture| gesture.mode),
            hit_tolerance: engine.settings().mouse_hit_tolerance,
            on_pointer,
        })
    }
}

impl CropEngine {
    /// The canvas program for the current session, publishing pointer
    /// events through `on_pointer`.
    pub fn overlay<Message>(&self, on_pointer: fn(PointerEvent) -> Message) -> Option<CropOverlay<Message>> {
        CropOverlay::from_engine(self, on_pointer)
    }
}

impl<Message: 'static> CropOverlay<Message> {
    /// Wraps the overlay in a canvas filling its container.
    pub fn view<'a>(self) -> Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl<Message> canvas::Program<Message> for CropOverlay<Message> {
    type State = OverlayInput;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<iced::widget::Action<Message>> {
        use iced::widget::Action;

        let normalized = state.translate(event, bounds, cursor);
        match (normalized.event, normalized.capture) {
            (Some(pointer), true) => Some(Action::publish((self.on_pointer)(pointer)).and_capture()),
            (Some(pointer), false) => Some(Action::publish((self.on_pointer)(pointer))),
            (None, true) => Some(Action::capture()),
            (None, false) => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        use canvas::{Frame, Path, Stroke};

        let mut frame = Frame::new(renderer, bounds.size());

        let image = self.metrics.crop_bounds();
        let crop = self.rect;

        // Darkened overlay outside crop area
        let dark_overlay = theme::crop_overlay_outside_color();
        let shades = [
            (image.left, image.top, image.width(), crop.y - image.top),
            (image.left, crop.bottom(), image.width(), image.bottom - crop.bottom()),
            (image.left, crop.y, crop.x - image.left, crop.height),
            (crop.right(), crop.y, image.right - crop.right(), crop.height),
        ];
        for (x, y, width, height) in shades {
            if width > 0.0 && height > 0.0 {
                frame.fill_rectangle(
                    iced::Point::new(x, y),
                    iced::Size::new(width, height),
                    dark_overlay,
                );
            }
        }

        let top_left = iced::Point::new(crop.x, crop.y);
        let crop_size = iced::Size::new(crop.width, crop.height);

        // Rule-of-thirds grid
        let grid_color = theme::crop_overlay_grid_color();
        for i in 1..3 {
            let x = crop.x + crop.width * i as f32 / 3.0;
            let y = crop.y + crop.height * i as f32 / 3.0;
            for line in [
                Path::line(iced::Point::new(x, crop.y), iced::Point::new(x, crop.bottom())),
                Path::line(iced::Point::new(crop.x, y), iced::Point::new(crop.right(), y)),
            ] {
                frame.stroke(
                    &line,
                    Stroke::default()
                        .with_width(sizing::CROP_GRID_WIDTH)
                        .with_color(grid_color),
                );
            }
        }

        if self.shape == OutputShape::Circle {
            let center = crop.center();
            let guide = Path::circle(
                iced::Point::new(center.x, center.y),
                crop.width.min(crop.height) / 2.0,
            );
            frame.stroke(
                &guide,
                Stroke::default()
                    .with_width(sizing::CROP_BORDER_WIDTH)
                    .with_color(theme::crop_overlay_circle_color()),
            );
        }

        frame.stroke(
            &Path::rectangle(top_left, crop_size),
            Stroke::default()
                .with_width(sizing::CROP_BORDER_WIDTH)
                .with_color(theme::crop_overlay_handle_color()),
        );

        let handle_size = sizing::CROP_HANDLE_SIZE;
        for corner in Corner::ALL {
            let at = crop.corner(corner);
            let handle = Path::rectangle(
                iced::Point::new(at.x - handle_size / 2.0, at.y - handle_size / 2.0),
                iced::Size::new(handle_size, handle_size),
            );
            let fill = if self.active == Some(GestureMode::Resizing(corner)) {
                theme::crop_overlay_active_handle_color()
            } else {
                theme::crop_overlay_handle_color()
            };
            frame.fill(&handle, fill);
            frame.stroke(
                &handle,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(theme::crop_overlay_handle_border_color()),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match self.active {
            Some(GestureMode::Dragging) if state.is_active() => return mouse::Interaction::Grabbing,
            Some(GestureMode::Resizing(_)) if state.is_active() => {
                return mouse::Interaction::Crosshair
            }
            _ => {}
        }

        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };
        let local = Point::new(position.x, position.y);
        match hit_test::classify(local, &self.rect, self.hit_tolerance) {
            Hit::Corner(_) => mouse::Interaction::Crosshair,
            Hit::Move => mouse::Interaction::Grab,
            Hit::None => mouse::Interaction::default(),
        }
    }
}
