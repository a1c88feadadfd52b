//! Interactive crop selection overlay.
//!
//! Rendered in a stack on top of the image widget, this canvas draws the
//! current selection (darkened surround, border, corner handles) and turns
//! mouse drags into percent-unit [`CropRegion`]s. Dragging inside the
//! selection moves it; dragging a corner resizes it, locked to the aspect
//! ratio of the target print size.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::crop::{CropRegion, CropUnit};

/// Smallest selection edge, in on-screen pixels
const MIN_EDGE: f32 = 24.0;
/// Hit tolerance around a corner handle, in pixels
const HANDLE_GRAB: f32 = 10.0;
/// Visual size of a corner handle square
const HANDLE_SIZE: f32 = 7.0;

#[derive(Debug, Clone)]
pub enum Event {
    /// The selection changed during a drag (in-progress state)
    Changed(CropRegion),
    /// A drag ended; this is the region rasterization should use
    Committed(CropRegion),
}

/// Canvas program drawn over the image. `region` is the in-progress
/// selection in percent units; `aspect` is the locked width/height ratio.
pub struct CropCanvas<'a> {
    pub region: Option<&'a CropRegion>,
    pub aspect: f32,
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Direction the moving corner grows away from its anchor
    fn direction(self) -> (f32, f32) {
        match self {
            Corner::TopLeft => (-1.0, -1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, 1.0),
            Corner::BottomRight => (1.0, 1.0),
        }
    }
}

/// A selection rectangle in canvas-local pixels
#[derive(Debug, Clone, Copy)]
struct RectPx {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl RectPx {
    fn from_region(region: &CropRegion, size: Size) -> Self {
        match region.unit {
            CropUnit::Percent => Self {
                x: region.x / 100.0 * size.width,
                y: region.y / 100.0 * size.height,
                width: region.width / 100.0 * size.width,
                height: region.height / 100.0 * size.height,
            },
            CropUnit::Pixel => Self {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            },
        }
    }

    fn to_region(self, size: Size) -> CropRegion {
        CropRegion::percent(
            self.x / size.width * 100.0,
            self.y / size.height * 100.0,
            self.width / size.width * 100.0,
            self.height / size.height * 100.0,
        )
    }

    fn corner(self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.x + self.width, self.y),
            Corner::BottomLeft => Point::new(self.x, self.y + self.height),
            Corner::BottomRight => Point::new(self.x + self.width, self.y + self.height),
        }
    }

    /// Anchor (fixed point) when resizing from `corner`
    fn anchor(self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.corner(Corner::BottomRight),
            Corner::TopRight => self.corner(Corner::BottomLeft),
            Corner::BottomLeft => self.corner(Corner::TopRight),
            Corner::BottomRight => self.corner(Corner::TopLeft),
        }
    }

    fn contains(self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy)]
enum DragMode {
    Move,
    Resize(Corner),
}

/// State for drag interactions
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    mode: Option<DragMode>,
    /// Cursor position when the drag started, canvas-local
    grab: Point,
    /// Selection when the drag started
    start: Option<RectPx>,
    /// Last rectangle produced during the current drag
    current: Option<RectPx>,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            mode: None,
            grab: Point::ORIGIN,
            start: None,
            current: None,
        }
    }
}

const CORNERS: [Corner; 4] = [
    Corner::TopLeft,
    Corner::TopRight,
    Corner::BottomLeft,
    Corner::BottomRight,
];

fn hit_corner(rect: RectPx, p: Point) -> Option<Corner> {
    CORNERS.into_iter().find(|corner| {
        let c = rect.corner(*corner);
        (p.x - c.x).abs() <= HANDLE_GRAB && (p.y - c.y).abs() <= HANDLE_GRAB
    })
}

impl CropCanvas<'_> {
    /// Resize from `corner` toward the cursor, keeping the aspect lock and
    /// staying inside the canvas
    fn resized(&self, start: RectPx, corner: Corner, cursor: Point, size: Size) -> RectPx {
        let anchor = start.anchor(corner);
        let (dir_x, dir_y) = corner.direction();

        let max_width = if dir_x < 0.0 {
            anchor.x
        } else {
            size.width - anchor.x
        };
        let max_height = if dir_y < 0.0 {
            anchor.y
        } else {
            size.height - anchor.y
        };

        // Width follows the cursor; height is derived from the aspect lock
        let desired = (cursor.x - anchor.x) * dir_x;
        let mut width = desired.clamp(MIN_EDGE, max_width.max(MIN_EDGE));
        let mut height = width / self.aspect;
        if height > max_height {
            height = max_height.max(MIN_EDGE / self.aspect);
            width = height * self.aspect;
        }

        RectPx {
            x: if dir_x < 0.0 { anchor.x - width } else { anchor.x },
            y: if dir_y < 0.0 { anchor.y - height } else { anchor.y },
            width,
            height,
        }
    }

    fn moved(&self, start: RectPx, grab: Point, cursor: Point, size: Size) -> RectPx {
        RectPx {
            x: (start.x + cursor.x - grab.x).clamp(0.0, (size.width - start.width).max(0.0)),
            y: (start.y + cursor.y - grab.y).clamp(0.0, (size.height - start.height).max(0.0)),
            ..start
        }
    }
}

impl Program<Event> for CropCanvas<'_> {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Event>) {
        let size = bounds.size();

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let Some(region) = self.region else {
                    return (canvas::event::Status::Ignored, None);
                };
                let rect = RectPx::from_region(region, size);

                let mode = if let Some(corner) = hit_corner(rect, position) {
                    Some(DragMode::Resize(corner))
                } else if rect.contains(position) {
                    Some(DragMode::Move)
                } else {
                    None
                };

                if let Some(mode) = mode {
                    state.mode = Some(mode);
                    state.grab = position;
                    state.start = Some(rect);
                    state.current = Some(rect);
                    return (canvas::event::Status::Captured, None);
                }
                (canvas::event::Status::Ignored, None)
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let (Some(mode), Some(start)) = (state.mode, state.start) else {
                    return (canvas::event::Status::Ignored, None);
                };
                // Keep tracking even when the cursor leaves the canvas
                let Some(position) = cursor.position() else {
                    return (canvas::event::Status::Ignored, None);
                };
                let local = Point::new(position.x - bounds.x, position.y - bounds.y);

                let rect = match mode {
                    DragMode::Move => self.moved(start, state.grab, local, size),
                    DragMode::Resize(corner) => self.resized(start, corner, local, size),
                };
                state.current = Some(rect);
                (
                    canvas::event::Status::Captured,
                    Some(Event::Changed(rect.to_region(size))),
                )
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.mode.take().is_none() {
                    return (canvas::event::Status::Ignored, None);
                }
                let committed = state.current.take().map(|rect| rect.to_region(size));
                state.start = None;
                (
                    canvas::event::Status::Captured,
                    committed.map(Event::Committed),
                )
            }

            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let size = bounds.size();

        let Some(region) = self.region else {
            return vec![frame.into_geometry()];
        };
        let rect = RectPx::from_region(region, size);
        let shade = Color::from_rgba(0.0, 0.0, 0.0, 0.45);

        // Darken everything outside the selection (four strips)
        frame.fill_rectangle(Point::ORIGIN, Size::new(size.width, rect.y), shade);
        frame.fill_rectangle(
            Point::new(0.0, rect.y + rect.height),
            Size::new(size.width, (size.height - rect.y - rect.height).max(0.0)),
            shade,
        );
        frame.fill_rectangle(
            Point::new(0.0, rect.y),
            Size::new(rect.x, rect.height),
            shade,
        );
        frame.fill_rectangle(
            Point::new(rect.x + rect.width, rect.y),
            Size::new((size.width - rect.x - rect.width).max(0.0), rect.height),
            shade,
        );

        // Selection border
        let outline = Path::rectangle(
            Point::new(rect.x, rect.y),
            Size::new(rect.width, rect.height),
        );
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(Color::WHITE)
                .with_width(2.0),
        );

        // Corner handles
        for corner in CORNERS {
            let c = rect.corner(corner);
            frame.fill_rectangle(
                Point::new(c.x - HANDLE_SIZE / 2.0, c.y - HANDLE_SIZE / 2.0),
                Size::new(HANDLE_SIZE, HANDLE_SIZE),
                Color::WHITE,
            );
        }

        vec![frame.into_geometry()]
    }
}
