// src/surface.rs

//! Drawing surfaces that receive map draw commands.
//!
//! A surface accepts discrete commands. The only state carried from one call to
//! the next is the current pen position, which every `move_to` replaces; text is
//! written at that position.

use crate::error::MapError;
use crate::viewport::PixelPoint;
use serde::Serialize;
use std::io::Write;

/// Target for map draw commands.
///
/// Implement this for a window, a canvas, or anything else that can place text
/// at a point.
pub trait DrawSurface {
    /// Prepares a drawing area of the given size. Does nothing by default.
    fn setup(&mut self, _width: u32, _height: u32) -> Result<(), MapError> {
        Ok(())
    }

    /// Moves the pen to `(x, y)`. Leaves no mark.
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), MapError>;

    /// Lowers (`true`) or lifts (`false`) the pen.
    fn set_drawing(&mut self, on: bool) -> Result<(), MapError>;

    /// Writes `text` at the current pen position.
    fn write_text(&mut self, text: &str) -> Result<(), MapError>;

    /// Releases the drawing area. Does nothing by default.
    fn close(&mut self) -> Result<(), MapError> {
        Ok(())
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    MoveTo { x: f64, y: f64 },
    SetDrawing { on: bool },
    WriteText { text: String, at: PixelPoint },
}

/// Keeps every command in memory, in call order.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    position: PixelPoint,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current pen position.
    pub fn position(&self) -> PixelPoint {
        self.position
    }

    /// Text labels paired with where they were written.
    pub fn labels(&self) -> Vec<(&str, PixelPoint)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::WriteText { text, at } => Some((text.as_str(), *at)),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for CommandRecorder {
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), MapError> {
        self.position = PixelPoint::new(x, y);
        self.commands.push(DrawCommand::MoveTo { x, y });
        Ok(())
    }

    fn set_drawing(&mut self, on: bool) -> Result<(), MapError> {
        self.commands.push(DrawCommand::SetDrawing { on });
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), MapError> {
        self.commands.push(DrawCommand::WriteText {
            text: text.to_string(),
            at: self.position,
        });
        Ok(())
    }
}

/// Writes one line per command to any `Write` sink, e.g. stdout.
pub struct TextSurface<W: Write> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        TextSurface { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DrawSurface for TextSurface<W> {
    fn setup(&mut self, width: u32, height: u32) -> Result<(), MapError> {
        writeln!(self.out, "setup {} {}", width, height)?;
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), MapError> {
        writeln!(self.out, "move_to {:.2} {:.2}", x, y)?;
        Ok(())
    }

    fn set_drawing(&mut self, on: bool) -> Result<(), MapError> {
        writeln!(self.out, "{}", if on { "pen_down" } else { "pen_up" })?;
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), MapError> {
        writeln!(self.out, "write_text {:?}", text)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), MapError> {
        writeln!(self.out, "close")?;
        self.out.flush()?;
        Ok(())
    }
}
