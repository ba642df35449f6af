use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Fixed-timestep clock. Wall-clock time feeds an accumulator that the main
/// loop drains in `fixed_dt` slices, so simulation (camera scrolling) advances
/// by a deterministic amount per step regardless of render frame rate.
pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    last_instant: Instant,
    pub real_dt: f64,
    pub frame_count: u64,
    pub steps_this_frame: u32,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            last_instant: Instant::now(),
            real_dt: 0.0,
            frame_count: 0,
            steps_this_frame: 0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms — capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests drive the accumulator directly instead of sleeping.
    fn step_count(time: &mut TimeState, simulated_dt: f64) -> u32 {
        time.accumulator += simulated_dt;
        time.steps_this_frame = 0;
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn one_sixtieth_second_yields_one_step() {
        let mut time = TimeState::new();
        assert_eq!(step_count(&mut time, 1.0 / 60.0), 1);
    }

    #[test]
    fn long_frame_yields_multiple_steps() {
        let mut time = TimeState::new();
        assert_eq!(step_count(&mut time, 4.0 / 60.0), 4);
    }

    #[test]
    fn short_frame_carries_remainder_forward() {
        let mut time = TimeState::new();
        assert_eq!(step_count(&mut time, 0.5 / 60.0), 0);
        // The half-slice left over plus another half completes a step.
        assert_eq!(step_count(&mut time, 0.5 / 60.0), 1);
    }

    #[test]
    fn steps_this_frame_tracks_consumed_slices() {
        let mut time = TimeState::new();
        step_count(&mut time, 3.0 / 60.0);
        assert_eq!(time.steps_this_frame, 3);
    }
}
