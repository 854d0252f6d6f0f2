use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use tilecaster::{Camera, CameraConfig};

use crate::scaler::{ScaleLut, blit_nearest};

mod compositor;
mod demo;
mod scaler;

// per-tick speeds at the reference tick rate
const MOVE_SPEED: f64 = 0.06;
const ROT_SPEED: f64 = 0.03;

// internal frame height, width follows the window aspect
const FB_HEIGHT: usize = 240;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    camera: Camera,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal low-res buffer
    fb_small: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    tick_budget: Duration,
    tick_length: Duration,
}

impl App {
    fn new(camera: Camera) -> Self {
        let (fb_w, fb_h) = camera.viewport();
        let tick_length = Duration::from_secs_f64(1.0 / camera.config().target_tps as f64);
        Self {
            window: None,
            surface: None,
            camera,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb_small: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            tick_budget: Duration::ZERO,
            tick_length,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("tilecaster")
            .with_inner_size(LogicalSize::new(960.0, 720.0));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("failed to create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.rebuild_internal_fb_and_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        self.last_tick = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    use winit::event::ElementState;
                    match state {
                        ElementState::Pressed => {
                            if code == KeyCode::Escape {
                                event_loop.exit();
                            }
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return; // Minimized window, skip drawing
                };
                let dw = size.width as usize;

                if let Err(e) = surface.resize(nw, nh) {
                    log::error!("surface resize failed: {e}");
                    return;
                }

                self.camera.raycast();
                compositor::composite(&mut self.fb_small, &self.camera);

                let mut buf = match surface.buffer_mut() {
                    Ok(buf) => buf,
                    Err(e) => {
                        log::error!("surface buffer unavailable: {e}");
                        return;
                    }
                };
                blit_nearest(&mut buf, dw, &self.fb_small, self.fb_w, &self.scale_lut);
                if let Err(e) = buf.present() {
                    log::error!("present failed: {e}");
                }

                // Print FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    log::info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                window.request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_internal_fb_and_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    fn held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    /// Runs the fixed-rate movement ticks owed since the last frame.
    fn tick(&mut self) {
        let now = Instant::now();
        // cap to avoid huge jumps if the app was paused
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        self.tick_budget += dt;

        while self.tick_budget >= self.tick_length {
            self.tick_budget -= self.tick_length;

            if self.held(&[KeyCode::KeyW, KeyCode::ArrowUp]) {
                self.camera.move_forward(MOVE_SPEED);
            }
            if self.held(&[KeyCode::KeyS, KeyCode::ArrowDown]) {
                self.camera.move_forward(-MOVE_SPEED);
            }
            if self.held(&[KeyCode::KeyD]) {
                self.camera.strafe(MOVE_SPEED);
            }
            if self.held(&[KeyCode::KeyA]) {
                self.camera.strafe(-MOVE_SPEED);
            }
            if self.held(&[KeyCode::KeyQ, KeyCode::ArrowLeft]) {
                self.camera.rotate(ROT_SPEED);
            }
            if self.held(&[KeyCode::KeyE, KeyCode::ArrowRight]) {
                self.camera.rotate(-ROT_SPEED);
            }
        }
    }

    fn rebuild_internal_fb_and_lut(&mut self, dst_w: usize, dst_h: usize) {
        if dst_w == 0 || dst_h == 0 {
            return;
        }
        let aspect = dst_w as f32 / dst_h as f32;
        let target_w = ((FB_HEIGHT as f32 * aspect).round() as usize).max(80);

        if target_w != self.fb_w || FB_HEIGHT != self.fb_h {
            if let Err(e) = self.camera.resize(target_w, FB_HEIGHT) {
                log::error!("camera resize failed: {e}");
                return;
            }
            self.fb_w = target_w;
            self.fb_h = FB_HEIGHT;
            self.fb_small = vec![0u32; self.fb_w * self.fb_h];
        }

        self.scale_lut = ScaleLut::new(dst_w, dst_h, self.fb_w, self.fb_h);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let camera = Camera::new(
        CameraConfig::default(),
        FB_HEIGHT * 4 / 3,
        FB_HEIGHT,
        Arc::new(demo::map()?),
        Arc::new(demo::textures()?),
    )?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(camera);
    event_loop.run_app(&mut app)?;
    Ok(())
}
