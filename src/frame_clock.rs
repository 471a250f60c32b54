use log::info;

// Timing input for one simulation tick: elapsed wall-clock milliseconds and a
// frame-rate-independent multiplier (1.0 when a frame lands exactly on the
// nominal rate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub delta_ms: f32,
    pub time_mult: f32,
}

impl FrameTiming {
    pub fn new(delta_ms: f32, nominal_fps: f64) -> FrameTiming {
        let nominal_frame_ms = 1000.0 / nominal_fps as f32;
        FrameTiming {
            delta_ms,
            time_mult: delta_ms / nominal_frame_ms,
        }
    }

    // Exact nominal-length frame, for deterministic simulation loops.
    pub fn fixed_step(nominal_fps: f64) -> FrameTiming {
        FrameTiming {
            delta_ms: 1000.0 / nominal_fps as f32,
            time_mult: 1.0,
        }
    }
}

static NATIVE_SLEEP_ACCURACY: std::time::Duration = std::time::Duration::from_micros(500);

// Paces a real-time loop at a nominal rate and measures the elapsed time of
// each iteration.
#[derive(Debug)]
pub struct FrameClock {
    iteration_start: std::time::Instant,
    iteration_duration: std::time::Duration,
    nominal_fps: f64,
}

impl FrameClock {
    pub fn new(fps: f64) -> FrameClock {
        FrameClock {
            iteration_start: std::time::Instant::now(),
            iteration_duration: std::time::Duration::from_secs_f64(1.0 / fps),
            nominal_fps: fps,
        }
    }

    fn high_resolution_sleep_until(done: &std::time::Instant) {
        let now = std::time::Instant::now();
        let system_sleep_until = done.checked_sub(NATIVE_SLEEP_ACCURACY).unwrap_or(now);
        if now < system_sleep_until {
            std::thread::sleep(system_sleep_until.duration_since(now));
        }
    }

    pub fn tick(&mut self) -> FrameTiming {
        let sleep_until = self.iteration_start + self.iteration_duration;
        FrameClock::high_resolution_sleep_until(&sleep_until);
        let now = std::time::Instant::now();
        if now > sleep_until + NATIVE_SLEEP_ACCURACY {
            let overslept_by = now - sleep_until;
            info!("Over time budget by: {:?}", overslept_by);
        }
        let delta_t = self.iteration_start.elapsed();
        self.iteration_start = std::time::Instant::now();
        FrameTiming::new(delta_t.as_secs_f64() as f32 * 1000.0, self.nominal_fps)
    }
}
