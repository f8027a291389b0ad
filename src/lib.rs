pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod query;
pub mod renderer;
pub mod shape;
pub mod surface;
pub mod viewport;

pub use client::StoreClient;
pub use config::ConnectionSettings;
pub use error::{DegenerateAxis, MapError};
pub use location::{Location, LocationFields};
pub use renderer::{MapRenderer, PlacedShape};
pub use shape::{DrawParam, Shape, ShapeKind};
pub use surface::{CommandRecorder, DrawCommand, DrawSurface, TextSurface};
pub use viewport::{DegeneratePolicy, PixelPoint, ViewportTransform};
