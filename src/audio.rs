//! Sound effects
//!
//! Effects are synthesized up front with fundsp into plain sample buffers.
//! Playback goes through rodio when the `audio` feature is enabled; without
//! it, or without an output device, the game stays silent.

use fundsp::prelude::*;

use crate::game::GameEvent;

pub const SAMPLE_RATE: u32 = 44_100;

/// Linear ramp from `a` to `b` over `secs`, then holds `b`
fn ramp(a: f32, b: f32, secs: f32, t: f32) -> f32 {
    a + (b - a) * (t / secs).min(1.0)
}

fn render(mut node: impl AudioUnit, secs: f32) -> Vec<f32> {
    node.set_sample_rate(SAMPLE_RATE as f64);
    node.allocate();
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n).map(|_| node.get_mono()).collect()
}

/// Short falling blip for a hit
pub fn hit_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| ramp(520.0, 180.0, 0.15, t));
    let gain = lfo(|t: f32| ramp(0.2, 0.0, 0.18, t));
    render((freq >> square()) * gain, 0.18)
}

/// Long sawtooth slide for being caught
pub fn caught_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| ramp(400.0, 60.0, 0.8, t));
    let gain = lfo(|t: f32| ramp(0.2, 0.0, 0.9, t));
    render((freq >> saw()) * gain, 0.9)
}

/// Pre-rendered effects, played on game events
pub struct Sounds {
    hit: Vec<f32>,
    caught: Vec<f32>,
    out: Option<output::Output>,
}

impl Sounds {
    /// Render the effects and open the output device
    pub fn new() -> Self {
        Self {
            hit: hit_samples(),
            caught: caught_samples(),
            out: output::Output::open(),
        }
    }

    /// Silent instance, nothing is ever opened
    pub fn muted() -> Self {
        Self {
            hit: Vec::new(),
            caught: Vec::new(),
            out: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.out.is_some()
    }

    pub fn on_event(&self, event: GameEvent) {
        let Some(out) = &self.out else {
            return;
        };
        match event {
            GameEvent::Hit { .. } => out.play(&self.hit),
            GameEvent::Caught { .. } => out.play(&self.caught),
            GameEvent::Started => {}
        }
    }
}

#[cfg(feature = "audio")]
mod output {
    use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

    use super::SAMPLE_RATE;

    pub struct Output {
        // Dropping the stream stops all playback
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    log::info!("audio output opened");
                    Some(Self {
                        _stream: stream,
                        handle,
                    })
                }
                Err(e) => {
                    log::warn!("no audio output, running silent: {}", e);
                    None
                }
            }
        }

        pub fn play(&self, samples: &[f32]) {
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
                    sink.detach(); // Play in background
                }
                Err(e) => log::warn!("sound dropped: {}", e),
            }
        }
    }
}

#[cfg(not(feature = "audio"))]
mod output {
    pub struct Output;

    impl Output {
        pub fn open() -> Option<Self> {
            log::info!("built without the `audio` feature, running silent");
            None
        }

        pub fn play(&self, _samples: &[f32]) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_lengths() {
        assert_eq!(hit_samples().len(), (SAMPLE_RATE as f32 * 0.18) as usize);
        assert_eq!(caught_samples().len(), (SAMPLE_RATE as f32 * 0.9) as usize);
    }

    #[test]
    fn test_effects_are_audible_and_bounded() {
        for samples in [hit_samples(), caught_samples()] {
            let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            assert!(peak > 0.01, "effect is silent");
            assert!(peak <= 0.25, "effect clips: {peak}");
        }
    }

    #[test]
    fn test_effects_fade_out() {
        let caught = caught_samples();
        let tail = &caught[caught.len() - 100..];
        assert!(tail.iter().all(|s| s.abs() < 0.01));
    }

    #[test]
    fn test_muted_ignores_events() {
        let sounds = Sounds::muted();
        assert!(!sounds.is_live());
        sounds.on_event(GameEvent::Hit { health: 2 });
    }
}
