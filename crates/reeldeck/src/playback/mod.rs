mod control;
mod media;
mod mounted;
mod visibility;

#[cfg(test)]
pub(crate) mod fake;

pub use control::{format_time, ControlState, PlaybackState, VideoControl};
pub use media::{MediaElement, MediaEvent, PlayAttempt};
pub use mounted::MountedMedia;
pub use visibility::{IntersectionEntry, IntersectionWatcher, VisibilityPlayback};
