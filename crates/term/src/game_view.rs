//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{grade, GameSnapshot, HighScoreEntry, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceColor, BOARD_HEIGHT, BOARD_WIDTH};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything drawn besides the game itself
#[derive(Debug, Clone, Copy, Default)]
pub struct HudView<'a> {
    pub high_scores: &'a [HighScoreEntry],
    /// Name being typed for a pending high score
    pub name_prompt: Option<&'a str>,
    pub muted: bool,
    /// Short status line (saved, loaded, muted, ...)
    pub message: Option<&'a str>,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        hud: &HudView<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Locked cells.
        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(color) => {
                        self.draw_board_cell(fb, start_x, start_y, x as u16, y as u16, *color)
                    }
                    None => self.draw_empty_cell(fb, start_x, start_y, x as u16, y as u16),
                }
            }
        }

        if !snap.game_over() {
            if let Some(ghost) = snap.ghost {
                let ghost_style = CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG).dim();
                for (x, y) in visible_cells(&ghost) {
                    self.fill_cell_rect(fb, start_x, start_y, x, y, '░', ghost_style);
                }
            }
        }

        if let Some(current) = snap.current {
            for (x, y) in visible_cells(&current) {
                self.draw_board_cell(fb, start_x, start_y, x, y, current.color);
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x, start_y, frame_w);

        // Overlays.
        let mid_y = start_y.saturating_add(frame_h / 2);
        if snap.paused() {
            self.draw_centered(fb, start_x, frame_w, mid_y, "PAUSED");
            self.draw_centered(fb, start_x, frame_w, mid_y + 1, "P to resume");
        } else if snap.game_over() {
            self.draw_centered(fb, start_x, frame_w, mid_y, "GAME OVER");
            match hud.name_prompt {
                Some(name) => {
                    self.draw_name_prompt(fb, start_x, frame_w, mid_y + 2, name);
                }
                None => self.draw_centered(fb, start_x, frame_w, mid_y + 1, "R to restart"),
            }
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, hud: &HudView<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        color: PieceColor,
    ) {
        let style = CellStyle::new(piece_rgb(color), PLAY_BG).bold();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: &HudView<'_>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let dim = value.dim();

        let mut y = start_y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = snap.next {
            for (dx, dy) in next.shape.filled() {
                let px = panel_x + dx as u16 * self.cell_w;
                let py = y + dy as u16;
                let style = CellStyle::new(piece_rgb(next.color), SCREEN_BG).bold();
                fb.fill_rect(px, py, self.cell_w, 1, '█', style);
            }
        }
        y = y.saturating_add(5);

        fb.put_str(panel_x, y, "SOUND", label);
        fb.put_str(panel_x + 6, y, if hud.muted { "OFF" } else { "ON" }, value);
        y = y.saturating_add(1);
        if let Some(message) = hud.message {
            fb.put_str(panel_x, y, message, dim);
        }
        y = y.saturating_add(2);

        if hud.high_scores.is_empty() || y >= viewport.height {
            return;
        }
        fb.put_str(panel_x, y, "HIGH SCORES", label);
        y = y.saturating_add(1);
        for (rank, entry) in hud.high_scores.iter().enumerate() {
            if y >= viewport.height {
                break;
            }
            let mut x = panel_x;
            x += fb.put_u32(x, y, rank as u32 + 1, dim);
            fb.put_char(x, y, '.', dim);
            x += 2;
            let name: String = entry.name.chars().take(10).collect();
            fb.put_str(x, y, &name, value);
            x += 11;
            x += fb.put_u32(x, y, entry.score, value);
            fb.put_str(x + 1, y, grade(entry.score), label);
            y = y.saturating_add(1);
        }
    }

    fn draw_name_prompt(&self, fb: &mut FrameBuffer, start_x: u16, frame_w: u16, y: u16, name: &str) {
        self.draw_centered(fb, start_x, frame_w, y, "NEW HIGH SCORE");
        let field = format!("{name}_");
        self.draw_centered(fb, start_x, frame_w, y + 1, &field);
        self.draw_centered(fb, start_x, frame_w, y + 2, "ENTER save  ESC skip");
    }

    fn draw_centered(&self, fb: &mut FrameBuffer, start_x: u16, frame_w: u16, y: u16, text: &str) {
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(x, y, text, style);
    }
}

/// Board cells of `piece` that fall inside the visible grid
fn visible_cells(piece: &Piece) -> impl Iterator<Item = (u16, u16)> + '_ {
    piece.cells().filter_map(|(x, y)| {
        let inside = (0..BOARD_WIDTH as i16).contains(&x) && (0..BOARD_HEIGHT as i16).contains(&y);
        inside.then_some((x as u16, y as u16))
    })
}

pub fn piece_rgb(color: PieceColor) -> Rgb {
    match color {
        PieceColor::Cyan => Rgb::new(80, 220, 220),
        PieceColor::Blue => Rgb::new(80, 120, 220),
        PieceColor::Orange => Rgb::new(255, 165, 0),
        PieceColor::Yellow => Rgb::new(240, 220, 80),
        PieceColor::Green => Rgb::new(100, 220, 120),
        PieceColor::Purple => Rgb::new(200, 120, 220),
        PieceColor::Red => Rgb::new(220, 80, 80),
    }
}
