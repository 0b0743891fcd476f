use std::time::{Duration, Instant};

use kiss3d::event::{Action, Event, Key, WindowEvent};
use kiss3d::window::Window;
use log::info;

use crate::camera::Camera;
use crate::math::geometry::Axis;
use crate::scene::SimulationParams;

// Key config, all in one place.
// Held keys, polled every frame:
const KEYS_TRANSLATE: [(Key, Axis, f64); 6] = [
    (Key::W, Axis::Y, 1.0),
    (Key::S, Axis::Y, -1.0),
    (Key::A, Axis::X, -1.0),
    (Key::D, Axis::X, 1.0),
    (Key::Q, Axis::Z, -1.0),
    (Key::E, Axis::Z, 1.0),
];
const KEYS_ROTATE: [(Key, Axis, f64); 6] = [
    (Key::Up, Axis::Y, 1.0),
    (Key::Down, Axis::Y, -1.0),
    (Key::Left, Axis::X, -1.0),
    (Key::Right, Axis::X, 1.0),
    (Key::R, Axis::Z, -1.0),
    (Key::F, Axis::Z, 1.0),
];
// Single presses:
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_CAMERA_RESET: Key = Key::Back;
const KEY_QUIT: Key = Key::Escape;

pub struct Controller {
    paused: bool,
    quit_requested: bool,
    translate_step: f64,
    rotate_step: f64,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    started: Instant,
    frames: usize,
    window: Duration,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        FpsCounter {
            started: Instant::now(),
            frames: 0,
            window,
            previous_fps: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.frames += 1;

        let elapsed = self.started.elapsed();
        if elapsed > self.window {
            self.previous_fps = self.frames as f64 / elapsed.as_secs_f64();
            self.started = Instant::now();
            self.frames = 0;
        }
    }
}

impl Controller {
    pub fn new(translate_step: f64, rotate_step: f64, paused: bool) -> Self {
        Controller {
            paused,
            quit_requested: false,
            translate_step,
            rotate_step,
            fps_counter: FpsCounter::new(Duration::from_secs(1)),
        }
    }

    /// Handles one-shot key presses. Timestep keys are ignored when there's
    /// no simulation to speed up.
    pub fn process_event(
        &mut self,
        event: Event,
        camera: &mut Camera,
        params: Option<&mut SimulationParams>,
    ) {
        self.handle_window_event(&event.value, camera, params);
    }

    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        camera: &mut Camera,
        params: Option<&mut SimulationParams>,
    ) {
        match event {
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                if let Some(params) = params {
                    params.timestep *= 2.0;
                    info!("Timestep is {}", params.timestep);
                }
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                if let Some(params) = params {
                    params.timestep /= 2.0;
                    info!("Timestep is {}", params.timestep);
                }
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_CAMERA_RESET, Action::Press, _) => {
                camera.reset();
            }
            WindowEvent::Key(KEY_QUIT, Action::Press, _) => {
                self.quit_requested = true;
            }
            _ => {}
        }
    }

    /// Moves the camera for every movement key currently held down. The new
    /// pose isn't applied until the caller commits it.
    pub fn poll_camera_keys(&self, window: &Window, camera: &mut Camera) {
        for &(key, axis, sign) in KEYS_TRANSLATE.iter() {
            if window.get_key(key) == Action::Press {
                camera.translate(axis, sign * self.translate_step);
            }
        }
        for &(key, axis, sign) in KEYS_ROTATE.iter() {
            if window.get_key(key) == Action::Press {
                camera.rotate(axis, sign * self.rotate_step);
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn wants_quit(&self) -> bool {
        self.quit_requested
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
