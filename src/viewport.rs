//! Canvas viewport for the warehouse scene.
//!
//! Draws the floor grid and marker volumes through the showcase camera and
//! turns raw mouse input into application messages. The widget keeps only
//! cursor bookkeeping; everything else lives in the showcase.

use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme, event, mouse};
use nalgebra::{Point3, Vector3};

use warehouse_showcase::Showcase;
use warehouse_showcase::camera::Projection;
use warehouse_showcase::presenter::{Marker, MarkerKind};
use warehouse_showcase::ray_casting::project_to_viewport;

use crate::Message;

/// Half size of the floor grid in world units
const GRID_HALF_SIZE: f32 = 40.0;
const GRID_STEP: f32 = 8.0;
const BACKGROUND: Color = Color::from_rgb(0.07, 0.08, 0.10);
const GRID_COLOR: Color = Color::from_rgb(0.18, 0.20, 0.24);

/// Edges of a box as index pairs into its 8 corners
#[rustfmt::skip]
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0), // bottom
    (4, 5), (5, 7), (7, 6), (6, 4), // top
    (0, 4), (1, 5), (2, 6), (3, 7), // sides
];

/// Cursor bookkeeping between events
#[derive(Debug, Default)]
pub(crate) struct ViewportState {
    last_cursor: Option<Point>,
    orbiting: bool,
}

pub(crate) struct WarehouseViewport<'a> {
    showcase: &'a Showcase,
}

impl<'a> WarehouseViewport<'a> {
    pub(crate) fn new(showcase: &'a Showcase) -> Self {
        Self { showcase }
    }

    /// Projection matching the widget bounds, so picking and drawing agree
    fn projection(&self, size: Size) -> Projection {
        let mut projection = *self.showcase.projection();
        if size.width > 0.0 && size.height > 0.0 {
            projection.aspect = size.width / size.height;
        }
        projection
    }
}

impl canvas::Program<Message> for WarehouseViewport<'_> {
    type State = ViewportState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        let canvas::Event::Mouse(mouse_event) = event else {
            return (event::Status::Ignored, None);
        };
        let size = bounds.size();
        let position = cursor.position_in(bounds);

        match mouse_event {
            mouse::Event::CursorMoved { .. } => {
                let last = state.last_cursor;
                state.last_cursor = position;
                match (last, position) {
                    (Some(last), Some(current)) if state.orbiting => (
                        event::Status::Captured,
                        Some(Message::OrbitDragged(current.x - last.x, current.y - last.y)),
                    ),
                    _ => (
                        event::Status::Captured,
                        Some(Message::ViewportHovered { position, size }),
                    ),
                }
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => match position {
                Some(position) => (
                    event::Status::Captured,
                    Some(Message::ViewportClicked { position, size }),
                ),
                None => (event::Status::Ignored, None),
            },
            mouse::Event::ButtonPressed(button @ mouse::Button::Right) if position.is_some() => {
                state.orbiting = true;
                (event::Status::Captured, Some(Message::OrbitPressed(button)))
            }
            mouse::Event::ButtonReleased(button @ mouse::Button::Right) if state.orbiting => {
                state.orbiting = false;
                (event::Status::Captured, Some(Message::OrbitReleased(button)))
            }
            mouse::Event::WheelScrolled { delta } if position.is_some() => {
                let scroll_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                (event::Status::Captured, Some(Message::Scrolled(scroll_delta)))
            }
            mouse::Event::CursorLeft => {
                state.last_cursor = None;
                (
                    event::Status::Ignored,
                    Some(Message::ViewportHovered {
                        position: None,
                        size,
                    }),
                )
            }
            _ => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let size = bounds.size();
        let projection = self.projection(size);
        let camera = self.showcase.camera().camera();
        let project = |point: Point3<f32>| project_to_viewport(&point, size, camera, &projection);

        let mut frame = Frame::new(renderer, size);
        frame.fill_rectangle(Point::ORIGIN, size, BACKGROUND);

        // Floor grid on y = 0
        let grid_stroke = Stroke::default().with_color(GRID_COLOR).with_width(1.0);
        let steps = (2.0 * GRID_HALF_SIZE / GRID_STEP) as usize;
        for i in 0..=steps {
            let offset = -GRID_HALF_SIZE + i as f32 * GRID_STEP;
            let lines = [
                (
                    Point3::new(offset, 0.0, -GRID_HALF_SIZE),
                    Point3::new(offset, 0.0, GRID_HALF_SIZE),
                ),
                (
                    Point3::new(-GRID_HALF_SIZE, 0.0, offset),
                    Point3::new(GRID_HALF_SIZE, 0.0, offset),
                ),
            ];
            for (from, to) in lines {
                if let (Some(a), Some(b)) = (project(from), project(to)) {
                    frame.stroke(&Path::line(a, b), grid_stroke);
                }
            }
        }

        let hovered = self.showcase.presenter().hovered().map(|m| m.id.as_str());
        for marker in self.showcase.presenter().markers().iter().filter(|m| m.visible) {
            draw_marker(&mut frame, marker, hovered == Some(marker.id.as_str()), &project);
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) && self.showcase.presenter().hovered().is_some() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

fn draw_marker(
    frame: &mut Frame,
    marker: &Marker,
    hovered: bool,
    project: &impl Fn(Point3<f32>) -> Option<Point>,
) {
    let [r, g, b] = marker.color;
    let alpha = if marker.interactive { 1.0 } else { 0.45 };
    let color = if hovered {
        Color::WHITE
    } else {
        Color::from_rgba(r, g, b, alpha)
    };
    let width = match (&marker.kind, hovered) {
        (_, true) => 2.5,
        (MarkerKind::Section, false) => 1.5,
        (MarkerKind::SubArea { .. }, false) => 1.0,
    };
    let stroke = Stroke::default().with_color(color).with_width(width);

    let min = marker.bounds.min;
    let extent: Vector3<f32> = marker.bounds.max - marker.bounds.min;
    let corners: Vec<Option<Point>> = (0..8)
        .map(|i| {
            let corner = Point3::new(
                min.x + if i & 1 != 0 { extent.x } else { 0.0 },
                min.y + if i & 4 != 0 { extent.y } else { 0.0 },
                min.z + if i & 2 != 0 { extent.z } else { 0.0 },
            );
            project(corner)
        })
        .collect();

    for (a, b) in BOX_EDGES {
        if let (Some(from), Some(to)) = (corners[a], corners[b]) {
            frame.stroke(&Path::line(from, to), stroke);
        }
    }

    if let Some(anchor) = project(marker.anchor) {
        frame.fill(&Path::circle(anchor, 5.0), color);
        frame.fill_text(canvas::Text {
            content: marker.label.clone(),
            position: Point::new(anchor.x + 8.0, anchor.y - 8.0),
            color,
            size: Pixels(13.0),
            ..canvas::Text::default()
        });
    }
}
