mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use num_type::clock::{Clock, SystemClock};
use num_type::config::GameConfig;
use num_type::factory::{Board, Tick};
use num_type::screen::MainScreen;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Left edge of the board and the row of the input box.
const BOARD_X: u16 = 2;
const BOARD_Y: u16 = 1;
/// Every target is a 3-row box, stacked without gaps.
const ROW_HEIGHT: u16 = 3;
const SPACER: u16 = 0;

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file only; the terminal belongs to the game.
fn setup_logging(config: &GameConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("Logging initialized: {}", path.display());
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits. Each frame drains input, updates every
/// target against one clock reading, then redraws.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> Result<()> {
    let clock = SystemClock::new();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (width, _) = terminal::size()?;
    let board = Board {
        x: BOARD_X,
        y: BOARD_Y,
        width: config.board_width.min(width.saturating_sub(2 * BOARD_X)).max(8),
        row_height: ROW_HEIGHT,
        spacer: SPACER,
    };
    let mut screen = MainScreen::new(config, board, &mut Tick::new(clock.now(), &mut rng));

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }

            let now = clock.now();
            if !screen.is_playing() {
                if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    return Ok(());
                }
                continue;
            }
            match code {
                KeyCode::Char(digit) if digit.is_ascii_digit() => screen.collector.collect(digit),
                KeyCode::Backspace => screen.collector.backspace(),
                KeyCode::Enter => screen.shoot(&mut Tick::new(now, &mut rng))?,
                KeyCode::Esc => screen.clear_or_surrender(now),
                _ => {}
            }
        }

        let now = clock.now();
        screen.update(&mut Tick::new(now, &mut rng))?;
        display::render(out, &screen, now, terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = GameConfig::from_env();
    setup_logging(&config)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx, &config);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!("game aborted: {err:#}");
    }
    result
}
