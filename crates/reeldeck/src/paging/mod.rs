mod record;
mod source;
mod store;

pub use record::{FileLocation, FileUrls, RawVideoEntry, VideoRecord};
pub use source::{HttpVideoSource, PageFetch, PageRequest, PageResponse, VideoSource};
pub use store::{PageLoader, PageOutcome, PagedVideoStore};
