use std::{cell::Cell, rc::Rc, time::Instant};

use poll_promise::Promise;
use reeldeck::{MediaElement, MediaEvent, PlayAttempt, PlayError};

/// Nominal clip length until real metadata is available.
pub const DEFAULT_CLIP_SECS: f64 = 30.0;

/// Whether the viewer interacted with the window yet. Playback with sound
/// is refused until then, like browsers do.
#[derive(Debug, Clone, Default)]
pub struct UserActivation(Rc<Cell<bool>>);

impl UserActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&self) {
        self.0.set(true);
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }
}

/// A media element driven by the frame clock instead of a decoder.
pub struct ClockMedia {
    paused: bool,
    time: f64,
    duration: f64,
    volume: f32,
    muted: bool,
    rate: f32,
    looping: bool,
    loaded: bool,
    last_tick: Option<Instant>,
    activation: UserActivation,
    events: Vec<MediaEvent>,
}

impl ClockMedia {
    pub fn new(duration: f64, activation: UserActivation) -> Self {
        Self {
            paused: true,
            time: 0.0,
            duration: duration.max(0.0),
            volume: 1.0,
            muted: true,
            rate: 1.0,
            looping: true,
            loaded: false,
            last_tick: None,
            activation,
            events: Vec::new(),
        }
    }

    /// Advances the playhead to `now`.
    pub fn tick(&mut self, now: Instant) {
        if !self.loaded {
            self.loaded = true;
            self.events.push(MediaEvent::LoadedMetadata);
        }

        let last = self.last_tick.replace(now);
        if self.paused || self.duration <= 0.0 {
            return;
        }

        let Some(last) = last else {
            return;
        };

        let advanced = now.saturating_duration_since(last).as_secs_f64() * self.rate as f64;
        if advanced <= 0.0 {
            return;
        }

        self.time += advanced;
        if self.time >= self.duration {
            if self.looping {
                self.time %= self.duration;
            } else {
                self.time = self.duration;
                self.paused = true;
                self.events.push(MediaEvent::Pause);
                self.events.push(MediaEvent::Ended);
            }
        }
        self.events.push(MediaEvent::TimeUpdate);
    }
}

impl MediaElement for ClockMedia {
    fn play(&mut self) -> PlayAttempt {
        if !self.muted && !self.activation.is_active() {
            return Promise::from_ready(Err(PlayError::NotAllowed));
        }

        if self.paused {
            if self.time >= self.duration {
                self.time = 0.0;
            }
            self.paused = false;
            self.events.push(MediaEvent::Play);
        }

        Promise::from_ready(Ok(()))
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(MediaEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration);
        self.events.push(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        if self.loaded {
            self.duration
        } else {
            0.0
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        if self.volume != volume {
            self.volume = volume;
            self.events.push(MediaEvent::VolumeChange);
        }
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.events.push(MediaEvent::VolumeChange);
        }
    }

    fn playback_rate(&self) -> f32 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f32) {
        if self.rate != rate {
            self.rate = rate;
            self.events.push(MediaEvent::RateChange);
        }
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }
}
