use poll_promise::Promise;

use crate::PlayError;

/// Settles once the element actually started playing, or refused to.
pub type PlayAttempt = Promise<Result<(), PlayError>>;

/// Change notifications a media element queues up for its observers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MediaEvent {
    Play,
    Pause,
    TimeUpdate,
    LoadedMetadata,
    VolumeChange,
    RateChange,
    Ended,
}

/// A playable video surface. Times are in seconds, volume is `0.0..=1.0`.
pub trait MediaElement {
    fn play(&mut self) -> PlayAttempt;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, time: f64);

    /// 0 until metadata is known
    fn duration(&self) -> f64;

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn is_muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn playback_rate(&self) -> f32;

    fn set_playback_rate(&mut self, rate: f32);

    /// Drains the notifications queued since the last call.
    fn take_events(&mut self) -> Vec<MediaEvent>;
}
