//! Drag-rectangle selection canvas for the cropping tool.
//!
//! A transparent canvas stacked over the preview image. It tracks a left
//! button drag and emits selection events in preview coordinates; the
//! cropper binary maps them into its own message type.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Geometry, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::imaging::crop::SelectionRect;

/// Selection events in preview-canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// Left button pressed: a new selection starts here
    Started(Point),
    /// Drag in progress: the moving corner is here
    Moved(Point),
    /// Left button released: the selection is final
    Finished(Point),
}

/// Canvas program drawing the current selection rectangle
pub struct SelectionCanvas {
    /// Current selection, if the user has dragged one
    pub selection: Option<SelectionRect>,
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
}

impl Program<SelectionEvent> for SelectionCanvas {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<SelectionEvent>) {
        match event {
            // Mouse button press - start a new selection
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    state.is_dragging = true;
                    return (
                        canvas::event::Status::Captured,
                        Some(SelectionEvent::Started(pos)),
                    );
                }
            }

            // Mouse move - grow the rectangle while dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging {
                    if let Some(pos) = cursor.position_in(bounds) {
                        return (
                            canvas::event::Status::Captured,
                            Some(SelectionEvent::Moved(pos)),
                        );
                    }
                }
            }

            // Mouse button release - finalize the selection
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    if let Some(pos) = cursor.position_in(bounds) {
                        return (
                            canvas::event::Status::Captured,
                            Some(SelectionEvent::Finished(pos)),
                        );
                    }
                    return (canvas::event::Status::Captured, None);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        if let Some(selection) = &self.selection {
            let (x, y, w, h) = selection.normalized();
            frame.stroke(
                &Path::rectangle(Point::new(x, y), Size::new(w, h)),
                Stroke::default()
                    .with_color(Color::from_rgb(1.0, 0.0, 0.0))
                    .with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
