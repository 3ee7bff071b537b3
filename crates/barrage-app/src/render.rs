//! Rendering layer. All terminal output lives here.
//!
//! A renderer only ever sees a `GameStateSnapshot`; it has no way to reach
//! back into the simulation.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use thiserror::Error;

use barrage_core::enums::{GamePhase, ProjectileOwner};
use barrage_core::state::{FieldView, GameStateSnapshot};
use barrage_core::types::Aabb;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can draw snapshots.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, snapshot: &GameStateSnapshot) -> Result<(), RenderError>;

    /// Draw the mode selection screen shown before a session starts.
    fn render_title(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

// ── Colour palette ──

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Rows above the playfield (HUD + top border) and below it (border + hint).
const TOP_ROWS: u16 = 2;
const BOTTOM_ROWS: u16 = 2;

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub cols: u16,
    pub rows: u16,
}

impl Area {
    fn inner_cols(&self) -> u16 {
        self.cols.saturating_sub(2)
    }

    fn inner_rows(&self) -> u16 {
        self.rows.saturating_sub(TOP_ROWS + BOTTOM_ROWS)
    }
}

/// Map a field point to the terminal cell that shows it. `None` when the
/// point is outside the field or the terminal has no room for a playfield.
pub fn to_cell(field: &FieldView, area: Area, x: f64, y: f64) -> Option<(u16, u16)> {
    let (cols, rows) = (area.inner_cols(), area.inner_rows());
    if cols == 0 || rows == 0 {
        return None;
    }
    if !(0.0..field.width).contains(&x) || !(0.0..field.height).contains(&y) {
        return None;
    }
    let col = ((x / field.width * cols as f64) as u16).min(cols - 1);
    let row = ((y / field.height * rows as f64) as u16).min(rows - 1);
    Some((1 + col, TOP_ROWS + row))
}

fn centre(bounds: &Aabb) -> (f64, f64) {
    (
        bounds.min.x + bounds.size.width / 2.0,
        bounds.min.y + bounds.size.height / 2.0,
    )
}

/// Crossterm renderer that scales the field onto the terminal grid.
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Fixed size, or `None` to follow the live terminal size.
    area: Option<Area>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, area: None }
    }

    pub fn with_area(out: W, area: Area) -> Self {
        Self {
            out,
            area: Some(area),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn area(&self) -> Result<Area, RenderError> {
        match self.area {
            Some(area) => Ok(area),
            None => {
                let (cols, rows) = terminal::size()?;
                Ok(Area { cols, rows })
            }
        }
    }

    fn draw_border(&mut self, area: Area) -> Result<(), RenderError> {
        let inner = area.inner_cols() as usize;
        let bottom = area.rows.saturating_sub(BOTTOM_ROWS);

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, TOP_ROWS - 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
        for row in TOP_ROWS..bottom {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(area.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_hud(&mut self, snapshot: &GameStateSnapshot) -> Result<(), RenderError> {
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!(
            "SCORE {:>6}  ROUND {}",
            snapshot.score, snapshot.round
        )))?;

        self.out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
        for player in &snapshot.players {
            let lives = if player.is_alive() {
                "♥".repeat(player.lives as usize)
            } else {
                "OUT".to_string()
            };
            self.out
                .queue(Print(format!("  P{} {}", player.slot + 1, lives)))?;
        }
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        field: &FieldView,
        area: Area,
        bounds: &Aabb,
        glyph: char,
        color: Color,
    ) -> Result<(), RenderError> {
        let (x, y) = centre(bounds);
        if let Some((col, row)) = to_cell(field, area, x, y) {
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(color))?;
            self.out.queue(Print(glyph))?;
        }
        Ok(())
    }

    fn draw_centred(
        &mut self,
        area: Area,
        row: u16,
        text: &str,
        color: Color,
    ) -> Result<(), RenderError> {
        let col = (area.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn draw_game_over(&mut self, area: Area, score: u64) -> Result<(), RenderError> {
        let cy = area.rows / 2;
        self.draw_centred(area, cy.saturating_sub(1), "G A M E   O V E R", Color::Red)?;
        self.draw_centred(area, cy, &format!("Final score: {score}"), C_HUD_SCORE)?;
        self.draw_centred(area, cy + 1, "R : Restart   Q : Quit", C_HINT)?;
        Ok(())
    }

    fn finish(&mut self, area: Area) -> Result<(), RenderError> {
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, area.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &GameStateSnapshot) -> Result<(), RenderError> {
        let area = self.area()?;
        let field = snapshot.field;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_border(area)?;
        self.draw_hud(snapshot)?;

        for enemy in &snapshot.enemies {
            self.draw_glyph(&field, area, &enemy.bounds, enemy.glyph, C_ENEMY)?;
        }
        for projectile in &snapshot.projectiles {
            let [r, g, b] = projectile.color;
            let glyph = match projectile.owner {
                ProjectileOwner::Player(_) => '|',
                ProjectileOwner::Enemy => '!',
            };
            self.draw_glyph(&field, area, &projectile.bounds, glyph, Color::Rgb { r, g, b })?;
        }
        for player in snapshot.players.iter().filter(|p| p.is_alive()) {
            self.draw_glyph(&field, area, &player.bounds, player.glyph, C_PLAYER)?;
        }

        self.draw_centred(
            area,
            area.rows.saturating_sub(1),
            "P1 ← → SPACE   P2 A D W   P pause   Q quit",
            C_HINT,
        )?;

        if snapshot.phase == GamePhase::Terminated {
            self.draw_game_over(area, snapshot.score)?;
        }

        self.finish(area)
    }

    fn render_title(&mut self) -> Result<(), RenderError> {
        let area = self.area()?;
        let cy = area.rows / 2;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_centred(area, cy.saturating_sub(3), "★  B A R R A G E  ★", Color::Cyan)?;
        self.draw_centred(area, cy.saturating_sub(1), "[1] One player", Color::White)?;
        self.draw_centred(area, cy, "[2] Two players", Color::White)?;
        self.draw_centred(area, cy + 2, "P1 ← → SPACE   P2 A D W", C_HINT)?;
        self.draw_centred(area, cy + 3, "P pause   R restart   Q quit", C_HINT)?;

        self.finish(area)
    }
}
