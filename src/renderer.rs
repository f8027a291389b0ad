// src/renderer.rs

use crate::error::MapError;
use crate::shape::Shape;
use crate::surface::DrawSurface;
use crate::viewport::{
    DegeneratePolicy, PixelPoint, ViewportTransform, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

/// A shape paired with its computed pixel position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedShape<'a> {
    pub shape: &'a Shape,
    pub pixel: PixelPoint,
}

/// Draws a list of markers onto a [`DrawSurface`], scaled to the fixed viewport.
///
/// # Example
///
/// ```rust
/// use map_maker::{CommandRecorder, Location, MapRenderer};
/// use map_maker::location::markers_from_locations;
///
/// let locations = vec![Location::new("A", 0.0, 0.0), Location::new("B", 10.0, 10.0)];
/// let markers = markers_from_locations(&locations);
///
/// let mut recorder = CommandRecorder::new();
/// let drawn = MapRenderer::new().draw_map(&mut recorder, &markers)?;
/// assert_eq!(drawn, 2);
/// # Ok::<(), map_maker::MapError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MapRenderer {
    policy: DegeneratePolicy,
}

impl MapRenderer {
    /// A renderer that rejects degenerate bounding boxes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DegeneratePolicy) -> Self {
        MapRenderer { policy }
    }

    /// Computes every pixel position, in input order, without drawing.
    pub fn layout<'a>(&self, shapes: &'a [Shape]) -> Result<Vec<PlacedShape<'a>>, MapError> {
        let transform = ViewportTransform::fit(shapes, self.policy).map_err(|e| {
            log::warn!("Cannot lay out {} shape(s): {}", shapes.len(), e);
            e
        })?;
        log::debug!("Fitted viewport to {:?}", transform.bounding_box());

        Ok(shapes
            .iter()
            .map(|shape| PlacedShape {
                shape,
                pixel: transform.project_shape(shape),
            })
            .collect())
    }

    /// Lays out `shapes` and issues their draw commands in order.
    ///
    /// The full layout is computed before the first command, so a layout error
    /// leaves the surface untouched. Returns the number of shapes drawn.
    pub fn draw_map<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        shapes: &[Shape],
    ) -> Result<usize, MapError> {
        let placed = self.layout(shapes)?;
        draw_placed(surface, &placed)
    }

    /// One complete render pass: lay out, open the surface at the viewport size,
    /// draw, close.
    ///
    /// The surface is only opened once the layout has succeeded, so a failed
    /// pass writes nothing at all.
    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        shapes: &[Shape],
    ) -> Result<usize, MapError> {
        let placed = self.layout(shapes)?;
        surface.setup(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)?;
        let drawn = draw_placed(surface, &placed)?;
        surface.close()?;
        Ok(drawn)
    }
}

fn draw_placed<S: DrawSurface + ?Sized>(
    surface: &mut S,
    placed: &[PlacedShape<'_>],
) -> Result<usize, MapError> {
    for PlacedShape { shape, pixel } in placed {
        surface.set_drawing(false)?;
        surface.move_to(pixel.x, pixel.y)?;
        surface.set_drawing(true)?;
        if let Shape::Banner { text, .. } = shape {
            surface.write_text(text)?;
        }
        log::debug!("Drew {} at ({:.2}, {:.2})", shape, pixel.x, pixel.y);
    }
    Ok(placed.len())
}
