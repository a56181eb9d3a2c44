use tracing::{debug, warn};

use crate::{
    playback::{MediaElement, MediaEvent, PlayAttempt},
    PlayError,
};

/// What the controls overlay shows for one video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub is_muted: bool,
    pub playback_rate: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_muted: true,
            playback_rate: 1.0,
        }
    }
}

impl PlaybackState {
    pub fn read(element: &impl MediaElement) -> Self {
        let duration = element.duration();
        Self {
            is_playing: !element.is_paused(),
            current_time: element.current_time(),
            duration: if duration.is_finite() { duration } else { 0.0 },
            volume: element.volume(),
            is_muted: element.is_muted(),
            playback_rate: element.playback_rate(),
        }
    }

    /// Played fraction, for progress bars.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.current_time / self.duration).clamp(0.0, 1.0) as f32
    }
}

struct PendingPlay {
    attempt: PlayAttempt,
    retried: bool,
}

/// State a [`VideoControl`] keeps between frames. Lives next to the
/// element it mirrors and goes away with it.
pub struct ControlState {
    playback: PlaybackState,
    seeking: bool,
    last_volume: f32,
    pending: Option<PendingPlay>,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            playback: PlaybackState::default(),
            seeking: false,
            last_volume: 1.0,
            pending: None,
        }
    }
}

impl ControlState {
    pub fn bound_to(element: &impl MediaElement) -> Self {
        let playback = PlaybackState::read(element);
        let last_volume = if playback.volume > 0.0 {
            playback.volume
        } else {
            1.0
        };

        Self {
            playback,
            last_volume,
            ..Self::default()
        }
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn last_volume(&self) -> f32 {
        self.last_volume
    }

    pub fn has_pending_play(&self) -> bool {
        self.pending.is_some()
    }
}

/// Control surface for a single mounted element. Without an element every
/// operation is a no-op.
pub struct VideoControl<'a, E> {
    element: Option<&'a mut E>,
    state: &'a mut ControlState,
}

impl<'a, E: MediaElement> VideoControl<'a, E> {
    pub fn new(element: Option<&'a mut E>, state: &'a mut ControlState) -> Self {
        Self { element, state }
    }

    pub fn is_bound(&self) -> bool {
        self.element.is_some()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state.playback
    }

    pub fn is_seeking(&self) -> bool {
        self.state.seeking
    }

    /// Mirrors the notifications the element queued since the last frame.
    pub fn sync_events(&mut self) {
        let Some(element) = self.element.as_deref_mut() else {
            return;
        };

        let playback = &mut self.state.playback;
        for event in element.take_events() {
            match event {
                MediaEvent::Play => playback.is_playing = true,
                MediaEvent::Pause | MediaEvent::Ended => playback.is_playing = false,
                MediaEvent::TimeUpdate => {
                    if !self.state.seeking {
                        playback.current_time = element.current_time();
                    }
                }
                MediaEvent::LoadedMetadata => *playback = PlaybackState::read(&*element),
                MediaEvent::VolumeChange => {
                    playback.volume = element.volume();
                    playback.is_muted = element.is_muted();
                }
                MediaEvent::RateChange => playback.playback_rate = element.playback_rate(),
            }
        }
    }

    /// Settles the play attempt started by [`Self::play`], if any.
    pub fn poll(&mut self) {
        let Some(PendingPlay { attempt, retried }) = self.state.pending.take() else {
            return;
        };

        match attempt.try_take() {
            Err(attempt) => self.state.pending = Some(PendingPlay { attempt, retried }),

            Ok(Ok(())) => {}

            Ok(Err(PlayError::NotAllowed)) if !retried => {
                warn!("playback not allowed with sound, retrying muted");
                if let Some(element) = self.element.as_deref_mut() {
                    element.set_muted(true);
                    self.state.pending = Some(PendingPlay {
                        attempt: element.play(),
                        retried: true,
                    });
                }
                self.mirror_volume();
            }

            Ok(Err(err)) => warn!("play failed: {err}"),
        }
    }

    pub fn play(&mut self) {
        let last_volume = self.state.last_volume;
        let Some(element) = self.element.as_deref_mut() else {
            return;
        };

        if element.is_muted() {
            unmute(element, last_volume);
        }

        self.state.pending = Some(PendingPlay {
            attempt: element.play(),
            retried: false,
        });
        self.mirror_volume();
    }

    pub fn pause(&mut self) {
        if let Some(element) = self.element.as_deref_mut() {
            element.pause();
        }
    }

    pub fn toggle_play(&mut self) {
        let Some(paused) = self.element.as_deref().map(|e| e.is_paused()) else {
            return;
        };

        if paused {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Starts or continues a scrub. Time updates from the element are
    /// ignored until [`Self::end_seek`].
    pub fn seek(&mut self, time: f64) {
        let Some(element) = self.element.as_deref_mut() else {
            return;
        };

        if !time.is_finite() {
            return;
        }

        let time = time.max(0.0);
        self.state.seeking = true;
        element.set_current_time(time);
        self.state.playback.current_time = time;
    }

    pub fn end_seek(&mut self) {
        self.state.seeking = false;
    }

    pub fn set_volume(&mut self, volume: f32) {
        let Some(element) = self.element.as_deref_mut() else {
            return;
        };

        if volume.is_nan() {
            return;
        }

        let volume = volume.clamp(0.0, 1.0);
        element.set_volume(volume);
        if volume > 0.0 {
            element.set_muted(false);
            self.state.last_volume = volume;
        } else {
            element.set_muted(true);
        }
        self.mirror_volume();
    }

    pub fn toggle_mute(&mut self) {
        let Some(muted) = self.element.as_deref().map(|e| e.is_muted()) else {
            return;
        };
        self.set_muted(!muted);
    }

    pub fn set_muted(&mut self, muted: bool) {
        let last_volume = self.state.last_volume;
        let Some(element) = self.element.as_deref_mut() else {
            return;
        };

        if muted {
            element.set_muted(true);
        } else {
            unmute(element, last_volume);
        }
        self.mirror_volume();
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        let Some(element) = self.element.as_deref_mut() else {
            return;
        };

        if !rate.is_finite() || rate <= 0.0 {
            debug!("ignoring playback rate {rate}");
            return;
        }

        element.set_playback_rate(rate);
        self.state.playback.playback_rate = element.playback_rate();
    }

    fn mirror_volume(&mut self) {
        if let Some(element) = self.element.as_deref() {
            self.state.playback.volume = element.volume();
            self.state.playback.is_muted = element.is_muted();
        }
    }
}

fn unmute(element: &mut impl MediaElement, last_volume: f32) {
    if element.volume() <= 0.0 {
        element.set_volume(last_volume);
    }
    element.set_muted(false);
}

/// `MM:SS`, minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_owned();
    }

    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
