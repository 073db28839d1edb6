//! TETRODEMO - seven tetrominoes, four orientations, one bouncing shape
//!
//! Space cycles the shape, Left/Right step the orientation, q quits.

mod animation;
mod cell;
mod input;
mod rotation;
mod settings;
mod surface;
mod tetromino;
mod ui;

use animation::{Animation, WINDOW_HEIGHT, WINDOW_WIDTH};
use crossterm::{
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use input::InputHandler;
use ratatui::{Terminal, backend::CrosstermBackend};
use rotation::RotationTable;
use settings::{KeyTrigger, Settings};
use std::{
    io::{self, stdout},
    thread,
    time::{Duration, Instant},
};
use surface::{DisplayList, Surface};
use tetromino::{Rgba, ShapeLibrary};

/// Background the window is cleared to every frame
const CLEAR_COLOR: Rgba = Rgba::BLACK;

/// Get the tetrodemo temp directory, creating it if needed
fn tetrodemo_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("tetrodemo");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = tetrodemo_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file; stdout belongs to the terminal UI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "tetrodemo=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "TETRODEMO starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();
    if let Some(path) = Settings::settings_path() {
        if !path.exists() {
            match settings.save() {
                Ok(()) => tracing::info!("Wrote default settings to {}", path.display()),
                Err(e) => tracing::warn!("Could not write default settings: {}", e),
            }
        }
    }

    // Key releases are only reported with keyboard enhancement pushed
    let enhanced = settings.keys.trigger == KeyTrigger::Release
        && supports_keyboard_enhancement().unwrap_or_else(|e| {
            tracing::warn!("querying keyboard enhancement: {}", e);
            false
        });
    settings.keys.trigger = input::resolve_trigger(settings.keys.trigger, enhanced);

    let mut terminal = match setup_terminal(enhanced) {
        Ok(terminal) => terminal,
        Err(e) => {
            tracing::error!("creating terminal: {}", e);
            restore_terminal(enhanced);
            return Err(e);
        }
    };

    let result = run_demo(&mut terminal, &settings);

    restore_terminal(enhanced);
    if let Err(e) = &result {
        tracing::error!("demo loop failed: {}", e);
    }
    tracing::info!("TETRODEMO shutting down");

    result
}

fn setup_terminal(enhanced: bool) -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Best effort: leave the terminal usable even after a failure
fn restore_terminal(enhanced: bool) {
    if enhanced {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

fn run_demo(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, settings: &Settings) -> io::Result<()> {
    let library = ShapeLibrary::standard();
    let table = RotationTable::new(&library);
    let input = InputHandler::from_settings(settings);
    let mut anim = Animation::new(WINDOW_WIDTH, WINDOW_HEIGHT, library.len(), &settings.animation);
    let mut surface = DisplayList::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    let frame_duration = Duration::from_millis(settings.animation.frame_ms);

    let names: Vec<_> = library.iter().map(|shape| shape.name()).collect();
    tracing::debug!(
        "shapes [{}], frame budget {:?}, bevel {}",
        names.join(" "),
        frame_duration,
        settings.visual.bevel.name()
    );

    while anim.is_running() {
        let frame_start = Instant::now();

        // Drain input without blocking
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = input.handle_key(key) {
                    tracing::debug!("key {:?} -> {:?}", key.code, action);
                    anim.apply(action);
                }
            }
        }
        if !anim.is_running() {
            break;
        }

        let shape = anim.current(&table);
        surface.clear(CLEAR_COLOR);
        cell::draw_shape(&mut surface, anim.x, anim.y, anim.block_size, shape, settings.visual.bevel);
        surface.present();
        tracing::trace!("frame {}: {} draw commands", anim.frame(), surface.presented().commands().len());
        terminal.draw(|frame| ui::render_demo(frame, surface.presented(), &anim, shape, settings))?;

        anim.step();

        // Pad the frame out to the budget
        if let Some(delay) = frame_duration.checked_sub(frame_start.elapsed()) {
            thread::sleep(delay);
        }
    }

    tracing::info!("Quit after {} frames ({} presented)", anim.frame(), surface.frames());
    Ok(())
}
