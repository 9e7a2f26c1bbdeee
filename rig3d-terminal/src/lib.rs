/// Terminal front end: crossterm input and an ASCII rasterizer behind the core's render seam
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use eyre::WrapErr;
use rig3d_core::{
    Config, FrameComposer, InputEvent, Modifiers, PointerButton, SceneKind, Viewport,
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Size of one terminal cell in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

impl CellSize {
    /// Centre of a cell in virtual pixels.
    pub fn to_pixels(&self, column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 + 0.5) * self.width as f32,
            (row as f32 + 0.5) * self.height as f32,
        )
    }

    pub fn viewport(&self, columns: u16, rows: u16) -> Viewport {
        Viewport::new(
            columns as u32 * self.width.max(1),
            rows as u32 * self.height.max(1),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalOptions {
    pub fps: u32,
    pub cell: CellSize,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            cell: CellSize::default(),
        }
    }
}

/// What a terminal event means to the app.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Quit,
    Input(InputEvent),
    /// Terminal resized to this many cells
    Resize { columns: u16, rows: u16 },
}

/// Translate a crossterm event. Key releases and repeats are dropped.
pub fn map_event(event: &Event, cell: CellSize) -> Option<AppEvent> {
    match *event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(AppEvent::Quit),
            KeyCode::Char(c) => Some(AppEvent::Input(InputEvent::Key(c))),
            _ => None,
        },
        Event::Key(_) => None,
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }) => {
            let (x, y) = cell.to_pixels(column, row);
            let input = match kind {
                MouseEventKind::Down(button) => InputEvent::PointerDown {
                    x,
                    y,
                    button: pointer_button(button),
                    modifiers: Modifiers {
                        shift: modifiers.contains(KeyModifiers::SHIFT),
                        ctrl: modifiers.contains(KeyModifiers::CONTROL),
                    },
                },
                MouseEventKind::Drag(_) | MouseEventKind::Moved => InputEvent::PointerMove { x, y },
                MouseEventKind::Up(button) => InputEvent::PointerUp {
                    button: pointer_button(button),
                },
                _ => return None,
            };
            Some(AppEvent::Input(input))
        }
        Event::FocusLost => Some(AppEvent::Input(InputEvent::PointerLeave)),
        Event::Resize(columns, rows) => Some(AppEvent::Resize { columns, rows }),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    composer: FrameComposer,
    renderer: AsciiRenderer,
    options: TerminalOptions,
    running: bool,
    started: Instant,
    last_fps_update: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(kind: SceneKind, config: &Config, options: TerminalOptions) -> eyre::Result<Self> {
        let (columns, rows) = terminal::size().wrap_err("failed to query terminal size")?;
        let now = Instant::now();

        Ok(Self {
            composer: FrameComposer::new(kind, config, options.cell.viewport(columns, rows)),
            renderer: AsciiRenderer::new(columns as usize, rows as usize),
            options,
            running: true,
            started: now,
            last_fps_update: now,
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> eyre::Result<()> {
        terminal::enable_raw_mode().wrap_err("failed to enable raw mode")?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide
        )
        .wrap_err("failed to set up terminal")?;

        let result = self.main_loop();

        // Cleanup
        let restored = execute!(
            stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        terminal::disable_raw_mode().wrap_err("failed to disable raw mode")?;
        restored.wrap_err("failed to restore terminal")?;

        result
    }

    fn main_loop(&mut self) -> eyre::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.options.fps.max(1);
        tracing::info!(kind = ?self.composer.kind(), fps = self.options.fps, "render loop started");

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(&event);
            }

            self.composer
                .render(self.started.elapsed(), &mut self.renderer)
                .wrap_err("render pass failed")?;
            self.present()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_update).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_update).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_update = now;
            }
        }

        tracing::info!("render loop stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        match map_event(event, self.options.cell) {
            Some(AppEvent::Quit) => self.running = false,
            Some(AppEvent::Input(input)) => self.composer.handle_input(&input),
            Some(AppEvent::Resize { columns, rows }) => {
                self.renderer.resize(columns as usize, rows as usize);
                let viewport = self.options.cell.viewport(columns, rows);
                self.composer.handle_input(&InputEvent::Resize {
                    width: viewport.width,
                    height: viewport.height,
                });
            }
            None => {}
        }
    }

    fn present(&mut self) -> eyre::Result<()> {
        let mut stdout = stdout();
        self.renderer.present(&mut stdout)?;

        let hints = match self.composer.kind() {
            SceneKind::Figure => ",/. torso  w/e head  a/s d/f arms  z/x c/v legs  r reset  space walk",
            SceneKind::Moon => "l light  space orbit  0-3 surface",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "rig3d | FPS: {:.1} | drag=rotate shift=pan ctrl=zoom | {} | q quit",
                self.fps, hints
            )),
        )?;

        if let Some(warning) = self.renderer.warning() {
            queue!(
                stdout,
                cursor::MoveTo(0, 1),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Red),
                Print(warning),
            )?;
        }

        queue!(stdout, ResetColor)?;
        stdout.flush()?;
        Ok(())
    }
}
