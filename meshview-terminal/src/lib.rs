/// Terminal front-end for the mesh viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use meshview_core::{
    Command, Controller, FrameRenderer, FrameStats, Mesh, ModelSlots, Response, ViewState,
};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub mod input;
pub mod renderer;

pub use input::{command_for_key, command_for_mouse, KeyTracker, CONTROLS};
pub use renderer::Framebuffer;

/// Runtime options for [`TerminalApp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Framebuffer size in pixels, downsampled onto the terminal
    pub width: usize,
    pub height: usize,
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
        }
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    models: ModelSlots,
    view: ViewState,
    controller: Controller,
    renderer: FrameRenderer,
    framebuffer: Framebuffer,
    keys: KeyTracker,
    config: AppConfig,
    columns: u16,
    rows: u16,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    skip_reported: bool,
}

impl TerminalApp {
    pub fn new(models: ModelSlots, config: AppConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;

        Ok(Self {
            models,
            view: ViewState::new(),
            controller: Controller::new(),
            renderer: FrameRenderer::new(),
            framebuffer: Framebuffer::new(config.width, config.height),
            keys: KeyTracker::new(false),
            config,
            columns,
            rows,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            skip_reported: false,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        // Release events make held keys exact; without them KeyTracker falls
        // back to a timeout
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }
        self.keys = KeyTracker::new(enhanced);
        log::debug!("Keyboard release events: {}", enhanced);

        let result = self.main_loop();

        // Cleanup
        if enhanced {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs_f32(1.0 / self.config.fps.max(1) as f32);

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event before drawing
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?, frame_start);
            }

            self.update(frame_start);
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => {
                self.keys.record(&key, now);
                if let Some(command) = command_for_key(&key) {
                    self.dispatch(command);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(command) = command_for_mouse(&mouse, self.cell_size()) {
                    self.dispatch(command);
                }
            }
            Event::Resize(columns, rows) => {
                self.columns = columns;
                self.rows = rows;
            }
            Event::FocusLost => self.keys.clear(),
            _ => {}
        }
    }

    /// Framebuffer pixels covered by one terminal cell
    fn cell_size(&self) -> (f32, f32) {
        (
            self.framebuffer.width() as f32 / self.columns.max(1) as f32,
            self.framebuffer.height() as f32 / self.rows.max(1) as f32,
        )
    }

    fn dispatch(&mut self, command: Command) {
        match self.controller.apply(command, &mut self.view, &mut self.models) {
            Response::Continue => {}
            Response::Quit => self.running = false,
            Response::Snapshot => self.save_snapshot(),
            Response::ModelSwitched(_) => self.skip_reported = false,
        }
    }

    fn update(&mut self, now: Instant) {
        let held = self.keys.held(now);
        self.controller.tick(&held, &mut self.view);
    }

    fn save_snapshot(&self) {
        let path = snapshot_path(chrono::Local::now());
        match self.framebuffer.save_png(&path) {
            Ok(()) => log::info!("Screenshot saved as {}", path.display()),
            Err(e) => log::warn!("Failed to save screenshot {}: {}", path.display(), e),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let stats = self
            .renderer
            .render(&mut self.framebuffer, self.models.active(), &self.view);
        self.report_skipped(&stats);

        // Output to terminal
        let mut stdout = stdout();
        self.framebuffer.present(&mut stdout, self.columns, self.rows)?;

        // Draw UI overlay
        let lines = hud_lines(
            self.models.active(),
            self.models.active_index(),
            &self.view,
            self.fps,
        );
        for (row, line) in lines.iter().enumerate().take(self.rows as usize) {
            queue!(
                stdout,
                cursor::MoveTo(0, row as u16),
                SetBackgroundColor(TermColor::Black),
                SetForegroundColor(TermColor::Yellow),
                Print(line),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn report_skipped(&mut self, stats: &FrameStats) {
        if self.skip_reported {
            return;
        }
        if let Some(message) = skip_warning(&self.models.active().name, stats) {
            log::warn!("{}", message);
            self.skip_reported = true;
        }
    }
}

/// Warning text for a frame that had to leave elements out
pub fn skip_warning(model: &str, stats: &FrameStats) -> Option<String> {
    (stats.skipped > 0).then(|| {
        format!(
            "Model '{}': {} elements reference missing vertices and were skipped",
            model, stats.skipped
        )
    })
}

/// `screenshot_YYYYMMDD_HHMMSS.png` in the working directory
pub fn snapshot_path<Tz: chrono::TimeZone>(time: chrono::DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(time.format("screenshot_%Y%m%d_%H%M%S.png").to_string())
}

/// Status overlay text, one entry per line
pub fn hud_lines(mesh: &Mesh, slot: usize, view: &ViewState, fps: f32) -> Vec<String> {
    let on_off = |flag: bool| if flag { "On" } else { "Off" };
    vec![
        format!("Mode: {}", if view.wireframe { "Wireframe" } else { "Solid" }),
        format!("Model {}: {}", slot + 1, mesh.name),
        format!("Vertices: {}", mesh.vertices.len()),
        format!("Faces: {}", mesh.faces.len()),
        format!("Zoom: {:.1}", view.camera.distance),
        format!("Scale: {:.2}", view.camera.scale),
        format!("Rot Speed: {:.2}", view.rotation_speed),
        format!("FPS: {:.1}", fps),
        format!("Lighting: {}", on_off(view.lighting)),
        format!("Auto: {}", view.auto_mode.label()),
    ]
}
