//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! screen. No game logic is performed; this module only translates state
//! into terminal commands.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Print},
    terminal, QueueableCommand,
};
use num_type::color::Color;
use num_type::entities::TargetType;
use num_type::factory::Screen;
use num_type::screen::{GameStatus, MainScreen};
use num_type::target::Target;

// ── Colour palette ────────────────────────────────────────────────────────────

const BG: Color = Color::BLACK;
const C_HUD_SCORE: Color = Color::WHITE;
const C_HUD_LIVES: Color = Color::RED;
const C_INPUT: Color = Color::WHITE;
const C_HINT: Color = Color::rgb(110, 110, 110);

/// Opacity of the frame around targets that are not fading out.
const FRAME_OPACITY: f64 = 0.5;

fn term(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    screen: &MainScreen,
    now: u64,
    (width, height): (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, screen, width)?;
    draw_input_box(out, screen)?;

    for target in screen.targets() {
        if target.exists(now) {
            draw_target(out, target, now)?;
        }
    }

    draw_controls_hint(out, height)?;

    if let GameStatus::Finished { victory } = screen.status() {
        draw_game_over(out, screen, victory, (width, height))?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, screen: &MainScreen, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(term(C_HUD_SCORE)))?;
    out.queue(Print(format!("Score: {}", screen.score())))?;

    let hearts = "♥".repeat(screen.hp() as usize);
    let x = width.saturating_sub(hearts.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(style::SetForegroundColor(term(C_HUD_LIVES)))?;
    out.queue(Print(hearts))?;
    Ok(())
}

// ── Input box (board slot 0) ──────────────────────────────────────────────────

fn draw_input_box<W: Write>(out: &mut W, screen: &MainScreen) -> std::io::Result<()> {
    let board = screen.factory().board();
    let inner = board.width.saturating_sub(2) as usize;
    out.queue(style::SetForegroundColor(term(C_INPUT)))?;
    out.queue(cursor::MoveTo(board.x, board.y))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    out.queue(cursor::MoveTo(board.x, board.y + 1))?;
    out.queue(Print(format!("║ {:<w$}║", screen.collector.peek(), w = inner.saturating_sub(1))))?;
    out.queue(cursor::MoveTo(board.x, board.y + 2))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
    Ok(())
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// Three-row box. Timed targets burn their top border like a fuse; dying
/// animations fade into the background as their timer runs out.
fn draw_target<W: Write>(out: &mut W, target: &Target, now: u64) -> std::io::Result<()> {
    let p = target.placement();
    let inner = p.width.saturating_sub(2) as usize;
    let colors = target.colors();
    let left = target.calculate_time_percentage_left(now);

    let (frame, fill, text) = match target.target_type() {
        TargetType::DyingAnimation => (
            colors.frame.apply_opacity(BG, left),
            colors.bg.apply_opacity(BG, left),
            colors.text.apply_opacity(BG, left),
        ),
        _ => (colors.frame.apply_opacity(BG, FRAME_OPACITY), colors.bg, colors.text),
    };
    let lit = match target.target_type() {
        TargetType::Timed => ((inner as f64 * left).round() as usize).min(inner),
        _ => 0,
    };

    // top border / fuse
    out.queue(cursor::MoveTo(p.x, p.y))?;
    out.queue(style::SetForegroundColor(term(frame)))?;
    out.queue(Print("┌"))?;
    if lit > 0 {
        out.queue(style::SetForegroundColor(term(text)))?;
        out.queue(Print("━".repeat(lit)))?;
    }
    out.queue(style::SetForegroundColor(term(frame)))?;
    out.queue(Print(format!("{}┐", "─".repeat(inner - lit))))?;

    // value
    out.queue(cursor::MoveTo(p.x, p.y + 1))?;
    out.queue(Print("│"))?;
    out.queue(style::SetBackgroundColor(term(fill)))?;
    out.queue(style::SetForegroundColor(term(text)))?;
    out.queue(Print(format!("{:^w$}", target.value(), w = inner)))?;
    out.queue(style::SetBackgroundColor(style::Color::Reset))?;
    out.queue(style::SetForegroundColor(term(frame)))?;
    out.queue(Print("│"))?;

    out.queue(cursor::MoveTo(p.x, p.y + 2))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(term(C_HINT)))?;
    out.queue(Print(
        "0-9 : Type   ENTER : Shoot   BKSP : Erase   ESC : Clear / Surrender",
    ))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    screen: &MainScreen,
    victory: bool,
    (width, height): (u16, u16),
) -> std::io::Result<()> {
    let keeper = &screen.score_keeper;
    let (title, title_color) = if victory {
        ("VICTORY", Color::GREEN)
    } else {
        ("DEFEAT", Color::RED)
    };
    let lines = [
        format!("Final point score: {}", keeper.final_score()),
        format!("Total points gained: {}", keeper.points_gained),
        format!("Total points lost: {}", keeper.points_lost),
        format!("Total targets shot: {}", keeper.targets_shot),
        format!("Total targets timed out: {}", keeper.targets_timed_out),
        format!("Total misses: {}", keeper.misses),
        format!("Accuracy: {}%", keeper.accuracy),
        format!("Effectiveness: {}%", keeper.effectiveness),
        format!("Time played: {}", keeper.time_elapsed),
        String::new(),
        "Q - Quit".to_string(),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub((lines.len() as u16 + 2) / 2);

    out.queue(cursor::MoveTo(cx.saturating_sub(title.len() as u16 / 2), start_row))?;
    out.queue(style::SetForegroundColor(term(title_color)))?;
    out.queue(Print(title))?;

    out.queue(style::SetForegroundColor(term(Color::WHITE)))?;
    for (i, line) in lines.iter().enumerate() {
        let row = start_row + 2 + i as u16;
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        out.queue(Print(line))?;
    }
    Ok(())
}
