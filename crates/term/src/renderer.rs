//! TerminalRenderer: writes rendered game frames to the terminal.
//!
//! The renderer remembers the frame it last showed. A frame with a new size
//! (or the first one) is painted whole; later frames only repaint the cells
//! that changed, and an unchanged frame writes nothing at all. Whether a
//! frame is drawn is decided by the driver's `FrameLoop`.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal, QueueableCommand,
};

use crate::core::{FrameLoop, LoopStep};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// What a single draw wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// The whole screen was cleared and repainted
    pub full: bool,
    /// Cells written to the terminal
    pub cells: usize,
}

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            shown: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.write_buf()?;
        tracing::debug!("terminal entered alternate screen");
        Ok(())
    }

    /// Restore the terminal. Safe to call after a failed `enter`.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.write_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// The terminal was resized: repaint everything on the next frame and
    /// resume a loop that stopped on the game-over screen.
    pub fn on_resize(&mut self, frames: &mut FrameLoop) {
        self.shown = None;
        frames.rearm();
    }

    /// Draw `fb` if the frame loop is still running, then report the frame
    /// to the loop. Returns `None` when the loop is stopped.
    pub fn present(
        &mut self,
        fb: &mut FrameBuffer,
        frames: &mut FrameLoop,
        game_over: bool,
    ) -> Result<Option<FrameStats>> {
        if frames.is_stopped() {
            return Ok(None);
        }
        let stats = self.draw_swap(fb)?;
        if frames.after_frame(game_over) == LoopStep::Stop {
            tracing::debug!(frames = frames.frames(), "frame loop stopped on game over");
        }
        Ok(Some(stats))
    }

    /// Draw a frame and keep it as the new reference.
    ///
    /// On return `fb` holds the previously shown frame, ready to be rendered
    /// into again.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<FrameStats> {
        self.buf.clear();
        let mut enc = SpanEncoder::new(&mut self.buf);
        let prev = self
            .shown
            .as_ref()
            .filter(|prev| prev.width() == fb.width() && prev.height() == fb.height());
        let full = prev.is_none();
        match prev {
            Some(prev) => enc.changed(prev, fb)?,
            None => enc.whole(fb)?,
        }
        let cells = enc.finish()?;

        if !self.buf.is_empty() {
            self.write_buf()?;
        }
        if full {
            tracing::debug!(width = fb.width(), height = fb.height(), "full redraw");
        }

        let mut prev = self
            .shown
            .take()
            .unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        prev.resize(fb.width(), fb.height());
        std::mem::swap(&mut prev, fb);
        self.shown = Some(prev);

        Ok(FrameStats { full, cells })
    }

    fn write_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Queues cell writes, skipping cursor moves and style changes the
/// terminal already has.
struct SpanEncoder<'a> {
    out: &'a mut Vec<u8>,
    cursor: Option<(u16, u16)>,
    style: Option<CellStyle>,
    cells: usize,
}

impl<'a> SpanEncoder<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            cursor: None,
            style: None,
            cells: 0,
        }
    }

    fn whole(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        for (i, cell) in fb.cells().iter().enumerate() {
            let (x, y) = position(fb, i);
            self.cell(x, y, *cell)?;
        }
        Ok(())
    }

    fn changed(&mut self, prev: &FrameBuffer, next: &FrameBuffer) -> Result<()> {
        let pairs = prev.cells().iter().zip(next.cells());
        for (i, (old, new)) in pairs.enumerate() {
            if old != new {
                let (x, y) = position(next, i);
                self.cell(x, y, *new)?;
            }
        }
        Ok(())
    }

    fn cell(&mut self, x: u16, y: u16, cell: Cell) -> Result<()> {
        if self.cursor != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
        }
        if self.style != Some(cell.style) {
            queue_style(self.out, cell.style)?;
            self.style = Some(cell.style);
        }
        self.out.queue(Print(cell.ch))?;
        self.cursor = Some((x.saturating_add(1), y));
        self.cells += 1;
        Ok(())
    }

    /// Reset attributes if anything was written; returns the cell count.
    fn finish(self) -> Result<usize> {
        if self.cells > 0 {
            self.out.queue(ResetColor)?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(self.cells)
    }
}

fn position(fb: &FrameBuffer, index: usize) -> (u16, u16) {
    let width = usize::from(fb.width().max(1));
    ((index % width) as u16, (index / width) as u16)
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetColors(Colors::new(color(style.fg), color(style.bg))))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR_ALL: &str = "\x1b[2J";

    fn renderer() -> TerminalRenderer<Vec<u8>> {
        TerminalRenderer::with_writer(Vec::new())
    }

    fn take_output(r: &mut TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut r.out)).unwrap()
    }

    fn frame(text: &str) -> FrameBuffer {
        let mut fb = FrameBuffer::new(text.chars().count() as u16, 1);
        fb.put_str(0, 0, text, CellStyle::default());
        fb
    }

    #[test]
    fn first_frame_is_painted_whole() {
        let mut r = renderer();
        let mut fb = frame("ab");
        let stats = r.draw_swap(&mut fb).unwrap();

        assert_eq!(stats, FrameStats { full: true, cells: 2 });
        let out = take_output(&mut r);
        assert!(out.contains(CLEAR_ALL));
        assert!(out.contains("ab"));
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut r = renderer();
        r.draw_swap(&mut frame("xyz")).unwrap();
        take_output(&mut r);

        let stats = r.draw_swap(&mut frame("xyz")).unwrap();
        assert_eq!(stats, FrameStats { full: false, cells: 0 });
        assert!(r.out.is_empty());
    }

    #[test]
    fn adjacent_changes_share_one_cursor_move() {
        let mut r = renderer();
        r.draw_swap(&mut frame(".....")).unwrap();
        take_output(&mut r);

        let stats = r.draw_swap(&mut frame(".XXX.")).unwrap();
        assert_eq!(stats.cells, 3);
        let out = take_output(&mut r);
        // MoveTo is 1-based: row 1, column 2.
        assert!(out.contains("\x1b[1;2H"));
        assert!(!out.contains("\x1b[1;3H"));
        assert!(out.contains("XXX"));
        assert!(!out.contains(CLEAR_ALL));
    }

    #[test]
    fn size_change_repaints_whole_frame() {
        let mut r = renderer();
        r.draw_swap(&mut frame("ab")).unwrap();
        take_output(&mut r);

        let stats = r.draw_swap(&mut frame("abc")).unwrap();
        assert!(stats.full);
        assert_eq!(stats.cells, 3);
        assert!(take_output(&mut r).contains(CLEAR_ALL));
    }

    #[test]
    fn caller_gets_previous_frame_back() {
        let mut r = renderer();
        let mut fb = frame("one");
        r.draw_swap(&mut fb).unwrap();
        assert_eq!(fb.width(), 3);
        assert_eq!(fb.row_text(0), "   ");
    }

    #[test]
    fn present_follows_frame_loop() {
        let mut r = renderer();
        let mut frames = FrameLoop::new();

        assert!(r.present(&mut frame("go"), &mut frames, false).unwrap().is_some());
        assert!(r.present(&mut frame("end"), &mut frames, true).unwrap().is_some());
        take_output(&mut r);

        // Stopped on the game-over frame: nothing more is written.
        assert!(r.present(&mut frame("zzz"), &mut frames, true).unwrap().is_none());
        assert!(r.out.is_empty());

        r.on_resize(&mut frames);
        let stats = r.present(&mut frame("end"), &mut frames, true).unwrap().unwrap();
        assert!(stats.full);
    }
}
