//! Drawing surface used by the label renderer.

use crate::error::Result;
use crate::page::PageSize;
use crate::style::TextStyle;

/// The operations the renderer needs from a document backend. Coordinates
/// are points relative to the current origin, y growing upwards.
pub trait Canvas {
    /// Size for the current page and every page after it
    fn set_page_size(&mut self, size: PageSize);

    /// Push the graphics state (origin, colours)
    fn save_state(&mut self) -> Result<()>;

    /// Move the origin by `(dx, dy)` until the matching `restore_state`
    fn translate(&mut self, dx: f32, dy: f32);

    fn restore_state(&mut self);

    /// Draw one line of text with its baseline starting at `(x, y)`
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()>;

    /// Commit the current page; further drawing goes to a new page
    fn show_page(&mut self) -> Result<()>;

    /// Write out the finished document
    fn finalize(&mut self) -> Result<()>;
}
