use poll_promise::{Promise, Sender};

use crate::{
    playback::{MediaElement, MediaEvent, PlayAttempt},
    PlayError,
};

/// In-memory media element whose play attempts settle synchronously
/// unless `deferred` is set.
pub struct FakeMedia {
    pub paused: bool,
    pub time: f64,
    pub duration: f64,
    pub volume: f32,
    pub muted: bool,
    pub rate: f32,
    pub events: Vec<MediaEvent>,
    /// rejects any attempt made while unmuted
    pub block_unmuted: bool,
    pub fail_next: Option<PlayError>,
    pub deferred: bool,
    /// rates above this are capped
    pub max_rate: Option<f32>,
    pub play_calls: usize,
    pending: Vec<Sender<Result<(), PlayError>>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self {
            paused: true,
            time: 0.0,
            duration: 30.0,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            events: Vec::new(),
            block_unmuted: false,
            fail_next: None,
            deferred: false,
            max_rate: None,
            play_calls: 0,
            pending: Vec::new(),
        }
    }

    pub fn playing() -> Self {
        Self {
            paused: false,
            ..Self::new()
        }
    }

    /// Lets every deferred attempt succeed.
    pub fn settle(&mut self) {
        for sender in std::mem::take(&mut self.pending) {
            self.start();
            sender.send(Ok(()));
        }
    }

    fn start(&mut self) {
        if self.paused {
            self.paused = false;
            self.events.push(MediaEvent::Play);
        }
    }
}

impl MediaElement for FakeMedia {
    fn play(&mut self) -> PlayAttempt {
        self.play_calls += 1;

        if let Some(err) = self.fail_next.take() {
            return Promise::from_ready(Err(err));
        }

        if self.block_unmuted && !self.muted {
            return Promise::from_ready(Err(PlayError::NotAllowed));
        }

        if self.deferred {
            let (sender, promise) = Promise::new();
            self.pending.push(sender);
            return promise;
        }

        self.start();
        Promise::from_ready(Ok(()))
    }

    fn pause(&mut self) {
        for sender in std::mem::take(&mut self.pending) {
            sender.send(Err(PlayError::Aborted));
        }

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
        self.time = time;
        self.events.push(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        self.duration
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
        self.rate = self.max_rate.map_or(rate, |max| rate.min(max));
        self.events.push(MediaEvent::RateChange);
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }
}
