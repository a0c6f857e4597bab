//! Fixed-rate frame loop
//!
//! Runs one closure per frame and sleeps out the rest of the frame budget.
//! A frame that overruns is not caught up; the next one simply starts late.

use std::time::{Duration, Instant};

/// What the frame callback wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

pub struct FrameScheduler {
    frame_dur: Duration,
    frame_limit: Option<u64>,
    frames_run: u64,
}

impl FrameScheduler {
    pub fn new(frame_dur: Duration) -> Self {
        Self {
            frame_dur,
            frame_limit: None,
            frames_run: 0,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    /// Stop after `frames` callbacks even if the callback never asks to
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_dur
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Drive `frame` until it returns [`Control::Stop`], errors, or the
    /// frame limit is reached. The callback receives the frame index.
    pub fn run<E>(
        &mut self,
        mut frame: impl FnMut(u64) -> Result<Control, E>,
    ) -> Result<(), E> {
        loop {
            if self.frame_limit.is_some_and(|limit| self.frames_run >= limit) {
                return Ok(());
            }
            let frame_start = Instant::now();

            let control = frame(self.frames_run)?;
            self.frames_run += 1;
            if control == Control::Stop {
                return Ok(());
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_dur {
                std::thread::sleep(self.frame_dur - elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_frame_limit() {
        let mut sched = FrameScheduler::new(Duration::ZERO).with_frame_limit(5);
        let mut seen = Vec::new();
        sched
            .run(|i| {
                seen.push(i);
                Ok::<_, ()>(Control::Continue)
            })
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(sched.frames_run(), 5);
    }

    #[test]
    fn test_stops_when_asked() {
        let mut sched = FrameScheduler::new(Duration::ZERO);
        sched
            .run(|i| Ok::<_, ()>(if i == 2 { Control::Stop } else { Control::Continue }))
            .unwrap();
        assert_eq!(sched.frames_run(), 3);
    }

    #[test]
    fn test_error_ends_loop() {
        let mut sched = FrameScheduler::new(Duration::ZERO).with_frame_limit(10);
        let result = sched.run(|i| if i == 1 { Err("boom") } else { Ok(Control::Continue) });
        assert_eq!(result, Err("boom"));
        assert_eq!(sched.frames_run(), 1);
    }

    #[test]
    fn test_fps_to_duration() {
        let sched = FrameScheduler::from_fps(50);
        assert_eq!(sched.frame_duration(), Duration::from_millis(20));
    }
}
