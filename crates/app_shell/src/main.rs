mod input_map;

use anyhow::{Context, Result};
use body_catalog::{BodyCatalog, FocusLookup};
use camera::{CameraController, CursorHint, FocusState};
use glam::Vec2;
use input_map::ShellCommand;
use settings::{SettingsStore, UserSettings};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

const WINDOW_TITLE: &str = "Orrery";
/// A press and release closer than this (in pixels) counts as a click.
const CLICK_SLOP: f32 = 4.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings_store = SettingsStore::new().context("settings store init failed")?;
    let user_settings = match settings_store.load() {
        Ok(settings) => settings,
        Err(err) => {
            warn!("Using default settings (failed to load): {err}");
            UserSettings::default()
        }
    };
    // First run: write the defaults out so they can be edited.
    if !settings_store.path().exists() {
        if let Err(err) = settings_store.save(&user_settings) {
            warn!("Failed to write default settings: {err}");
        }
    }

    let catalog = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => BodyCatalog::load(&path)
            .with_context(|| format!("failed to load body catalog {}", path.display()))?,
        None => BodyCatalog::solar_system(),
    };
    info!("Loaded {} bodies", catalog.len());
    for body in catalog.bodies() {
        debug!(name = %body.name, radius = body.radius, color = %body.color, "catalog body");
    }

    let camera = CameraController::new(&user_settings.camera)
        .context("invalid camera settings")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = OrreryApp::new(user_settings, camera, catalog);
    event_loop.run_app(&mut app).context("event loop error")?;
    Ok(())
}

struct OrreryApp {
    window: Option<Window>,
    window_id: Option<WindowId>,
    user_settings: UserSettings,
    camera: CameraController,
    catalog: BodyCatalog,
    // Body the camera is flying to or resting at
    focused_body: Option<String>,
    // Last cursor position in physical pixels
    cursor: Vec2,
    // Where the primary button went down, for click detection
    press_origin: Option<Vec2>,
    cursor_hint: CursorHint,
    last_frame_time: Option<Instant>,
    current_fps: f32,
    fps_accum_time: f32,
    fps_frame_count: u32,
}

impl OrreryApp {
    fn new(user_settings: UserSettings, camera: CameraController, catalog: BodyCatalog) -> Self {
        Self {
            window: None,
            window_id: None,
            user_settings,
            camera,
            catalog,
            focused_body: None,
            cursor: Vec2::ZERO,
            press_origin: None,
            cursor_hint: CursorHint::Default,
            last_frame_time: None,
            current_fps: 0.0,
            fps_accum_time: 0.0,
            fps_frame_count: 0,
        }
    }

    fn focus_body(&mut self, name: &str) {
        let Some(target) = self.catalog.focus_target(name) else {
            warn!("no body named `{name}` in the catalog");
            return;
        };
        let color = self.catalog.find(name).map_or("", |body| body.color.as_str());
        match self.camera.request_focus(target) {
            Ok(()) => {
                info!(color, "Focusing {name}");
                self.focused_body = Some(name.to_string());
            }
            Err(err) => warn!("cannot focus {name}: {err}"),
        }
    }

    fn exit_focus(&mut self) {
        if self.camera.cancel_focus() {
            if let Some(name) = self.focused_body.take() {
                info!("Left {name}");
            }
        }
    }

    /// Pick the body under the cursor and fly to it.
    fn click(&mut self, position: Vec2) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let size = window.inner_size();
        let viewport = Vec2::new(size.width as f32, size.height as f32);
        let pose = self.camera.pose();
        let Some(ray) = pose.screen_ray(position, viewport, &self.user_settings.camera.lens)
        else {
            return;
        };
        let picked = self
            .catalog
            .pick(ray.origin, ray.direction)
            .map(|(body, _)| body.name.clone());
        if let Some(name) = picked {
            self.focus_body(&name);
        }
    }

    fn run_command(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::FocusBody(index) => {
                let name = self.catalog.get(index).map(|body| body.name.clone());
                if let Some(name) = name {
                    self.focus_body(&name);
                }
            }
            ShellCommand::ExitFocus => self.exit_focus(),
        }
    }

    /// Click detection and shell keys, ahead of the camera.
    fn handle_shell_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press_origin = Some(self.cursor),
                ElementState::Released => {
                    if let Some(origin) = self.press_origin.take() {
                        if origin.distance(self.cursor) <= CLICK_SLOP {
                            self.click(self.cursor);
                        }
                    }
                }
            },
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(command) = input_map::shell_command(code) {
                        self.run_command(command);
                    }
                }
            }
            _ => {}
        }
    }

    fn update_window_chrome(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        let hint = self.camera.cursor_hint();
        if hint != self.cursor_hint {
            window.set_cursor(input_map::cursor_icon(hint));
            self.cursor_hint = hint;
        }

        let status = match (self.camera.focus_state(), self.focused_body.as_deref()) {
            (FocusState::Approaching(_), Some(name)) => format!(" | flying to {name}"),
            (FocusState::Arrived(_), Some(name)) => format!(" | {name} (Esc to leave)"),
            _ => String::new(),
        };
        window.set_title(&format!(
            "{WINDOW_TITLE}{status} | {:.0} fps",
            self.current_fps
        ));
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop
            .create_window(WindowAttributes::default().with_title(WINDOW_TITLE.to_string()))
        {
            Ok(window) => window,
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        self.window_id = Some(window.id());
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if Some(window_id) != self.window_id {
            return;
        }

        self.handle_shell_input(&event);

        if let Some(input) = input_map::camera_event(&event, self.cursor) {
            if self.camera.handle_input(&input) {
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
        }

        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        // Optional FPS cap from settings (0 = uncapped).
        let fps_cap = self.user_settings.fps_cap.max(0.0);
        if fps_cap > 0.0 {
            let target = Duration::from_secs_f32(1.0 / fps_cap);
            if let Some(last) = self.last_frame_time {
                let elapsed = now - last;
                if elapsed < target {
                    let wait_until = last + target;
                    event_loop.set_control_flow(ControlFlow::WaitUntil(wait_until));
                    return;
                }
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(now + target));
        } else {
            event_loop.set_control_flow(ControlFlow::Poll);
        }

        let dt_secs = if let Some(last) = self.last_frame_time {
            let dt = (now - last).as_secs_f32();

            // FPS smoothing: accumulate over ~1s and update display once per second.
            if dt > 0.0 {
                self.fps_accum_time += dt;
                self.fps_frame_count += 1;
                if self.fps_accum_time >= 1.0 {
                    self.current_fps = self.fps_frame_count as f32 / self.fps_accum_time.max(1e-3);
                    self.fps_accum_time = 0.0;
                    self.fps_frame_count = 0;
                }
            }
            dt
        } else {
            0.016 // ~60fps default for first frame
        };
        self.last_frame_time = Some(now);

        if self.window.is_none() {
            return;
        }

        let update = self.camera.tick(dt_secs);
        if update.focus_arrived().is_some() {
            let name = self.focused_body.as_deref().unwrap_or("target");
            info!("Arrived at {name}");
        }

        self.update_window_chrome();
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
