pub mod api;
mod args;
pub mod carousel;
mod config;
mod error;
pub mod input;
pub mod paging;
pub mod playback;
mod reel;
mod result;
pub mod storage;
mod throttle;

pub use api::ApiClient;
pub use args::Args;
pub use carousel::{InteractionController, PreloadWindow, SlotKind, Transform};
pub use config::{
    ConfigHandler, FeedConfig, DEFAULT_FETCH_THRESHOLD, DEFAULT_PAGE_SIZE, DEFAULT_PRELOAD_RADIUS,
    DEFAULT_SWIPE_DISTANCE, DEFAULT_SWIPE_VELOCITY, DEFAULT_THROTTLE_MS,
    DEFAULT_VISIBILITY_THRESHOLD,
};
pub use error::{Error, PlayError};
pub use input::{FeedInput, InputChannel, ListenerHandle, NavKey};
pub use paging::{
    HttpVideoSource, PageLoader, PageOutcome, PagedVideoStore, VideoRecord, VideoSource,
};
pub use playback::{
    format_time, MediaElement, MediaEvent, MountedMedia, PlayAttempt, PlaybackState,
    VideoControl, VisibilityPlayback,
};
pub use reel::Reel;
pub use result::Result;
pub use storage::{DataPath, DataPathType, Directory};
pub use throttle::Throttle;

// export libs
pub use poll_promise;
