// src/viewport.rs

//! Linear min-max mapping from marker coordinates into the fixed viewport.
//!
//! The marker's `x` (latitude) drives the vertical pixel axis and its `y`
//! (longitude) drives the horizontal one, negated, so that a 500x500 window
//! centred on the origin shows north up and east to the right:
//!
//! ```text
//! pixel_x = -1 * (y - min_y) * VIEW_SPAN / delta_y + X_OFFSET
//! pixel_y =      (x - min_x) * VIEW_SPAN / delta_x - Y_OFFSET
//! ```

use crate::error::{DegenerateAxis, MapError};
use crate::shape::Shape;
use serde::{Deserialize, Serialize};

/// Length, in pixels, that each data axis is stretched to.
pub const VIEW_SPAN: f64 = 400.0;
/// Horizontal pixel position of the minimum longitude.
pub const X_OFFSET: f64 = 170.0;
/// Distance below the origin of the minimum latitude.
pub const Y_OFFSET: f64 = 200.0;
pub const VIEWPORT_WIDTH: u32 = 500;
pub const VIEWPORT_HEIGHT: u32 = 500;

/// Position on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint { x, y }
    }
}

/// What to do with an axis whose values are all equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Fail the layout with `MapError::DegenerateAxis`.
    #[default]
    Reject,
    /// Place every marker at the centre of the collapsed axis' pixel range.
    Center,
}

/// Axis-aligned extent of a set of markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Scans all shapes once.
    ///
    /// # Errors
    /// `MapError::EmptyInput` for an empty slice, `MapError::InvalidRecord` if any
    /// coordinate is NaN or infinite.
    pub fn from_shapes(shapes: &[Shape]) -> Result<Self, MapError> {
        let (first, rest) = shapes.split_first().ok_or(MapError::EmptyInput)?;
        check_finite(first)?;

        let mut bbox = BoundingBox {
            min_x: first.x(),
            max_x: first.x(),
            min_y: first.y(),
            max_y: first.y(),
        };
        for shape in rest {
            check_finite(shape)?;
            let (x, y) = shape.position();
            bbox.min_x = bbox.min_x.min(x);
            bbox.max_x = bbox.max_x.max(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_y = bbox.max_y.max(y);
        }
        Ok(bbox)
    }

    pub fn delta_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn delta_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The collapsed axes, if any.
    pub fn degenerate_axis(&self) -> Option<DegenerateAxis> {
        match (self.delta_x() == 0.0, self.delta_y() == 0.0) {
            (true, true) => Some(DegenerateAxis::Both),
            (true, false) => Some(DegenerateAxis::Latitude),
            (false, true) => Some(DegenerateAxis::Longitude),
            (false, false) => None,
        }
    }
}

fn check_finite(shape: &Shape) -> Result<(), MapError> {
    let (x, y) = shape.position();
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(MapError::InvalidRecord(format!(
            "shape '{}' has non-finite coordinates ({}, {})",
            shape, x, y
        )))
    }
}

/// The affine map fitted to one set of markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    bbox: BoundingBox,
    flat_x: bool,
    flat_y: bool,
}

impl ViewportTransform {
    /// Fits the transform to the bounding box of `shapes`.
    ///
    /// # Errors
    /// Propagates the bounding-box errors. Under `DegeneratePolicy::Reject` a zero
    /// extent on either axis yields `MapError::DegenerateAxis`.
    pub fn fit(shapes: &[Shape], policy: DegeneratePolicy) -> Result<Self, MapError> {
        let bbox = BoundingBox::from_shapes(shapes)?;
        // project() scales an offset of up to delta by VIEW_SPAN before dividing.
        if !(bbox.delta_x() * VIEW_SPAN).is_finite() || !(bbox.delta_y() * VIEW_SPAN).is_finite() {
            return Err(MapError::InvalidRecord(format!(
                "coordinate extent too large to scale: delta_x={}, delta_y={}",
                bbox.delta_x(),
                bbox.delta_y()
            )));
        }

        let degenerate = bbox.degenerate_axis();
        if let (Some(axis), DegeneratePolicy::Reject) = (degenerate, policy) {
            return Err(MapError::DegenerateAxis(axis));
        }

        Ok(ViewportTransform {
            bbox,
            flat_x: matches!(
                degenerate,
                Some(DegenerateAxis::Latitude) | Some(DegenerateAxis::Both)
            ),
            flat_y: matches!(
                degenerate,
                Some(DegenerateAxis::Longitude) | Some(DegenerateAxis::Both)
            ),
        })
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Maps raw marker coordinates `(x, y)` to pixel space.
    pub fn project(&self, x: f64, y: f64) -> PixelPoint {
        let pixel_x = if self.flat_y {
            X_OFFSET - VIEW_SPAN / 2.0
        } else {
            -1.0 * (y - self.bbox.min_y) * VIEW_SPAN / self.bbox.delta_y() + X_OFFSET
        };
        let pixel_y = if self.flat_x {
            VIEW_SPAN / 2.0 - Y_OFFSET
        } else {
            (x - self.bbox.min_x) * VIEW_SPAN / self.bbox.delta_x() - Y_OFFSET
        };
        PixelPoint::new(pixel_x, pixel_y)
    }

    pub fn project_shape(&self, shape: &Shape) -> PixelPoint {
        self.project(shape.x(), shape.y())
    }
}
