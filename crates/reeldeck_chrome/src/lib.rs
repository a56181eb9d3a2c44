mod app;
mod controls;
pub mod media;
mod notice;
pub mod setup;

pub use app::ReelApp;
pub use notice::{Notices, NOTICE_TTL};
