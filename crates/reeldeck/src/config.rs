use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    carousel::SwipeThresholds,
    storage::{write_file, DataPath, DataPathType, Directory},
    Result,
};

const CONFIG_FILE: &str = "feed.json";

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080/jeecg-boot";
const DEFAULT_LIST_PATH: &str = "/video/dyVideo/list";
const DEFAULT_STATIC_PATH: &str = "/sys/common/static";
const DEFAULT_LANG: &str = "en";
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_FETCH_THRESHOLD: usize = 3;
pub const DEFAULT_PRELOAD_RADIUS: usize = 2;
pub const DEFAULT_THROTTLE_MS: u64 = 200;
pub const DEFAULT_SWIPE_DISTANCE: f32 = 50.0;
pub const DEFAULT_SWIPE_VELOCITY: f32 = 0.3;
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.8;
const DEFAULT_TRANSITION_MS: u64 = 400;

/// Tunables of the swipe feed. Missing fields fall back to their defaults
/// so older config files keep loading.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub api_base: String,
    pub list_path: String,
    pub static_path: String,
    pub lang: String,
    pub page_size: u32,
    pub fetch_threshold: usize,
    pub preload_radius: usize,
    pub throttle_ms: u64,
    pub swipe_distance: f32,
    pub swipe_velocity: f32,
    pub visibility_threshold: f32,
    pub transition_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            list_path: DEFAULT_LIST_PATH.to_owned(),
            static_path: DEFAULT_STATIC_PATH.to_owned(),
            lang: DEFAULT_LANG.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            fetch_threshold: DEFAULT_FETCH_THRESHOLD,
            preload_radius: DEFAULT_PRELOAD_RADIUS,
            throttle_ms: DEFAULT_THROTTLE_MS,
            swipe_distance: DEFAULT_SWIPE_DISTANCE,
            swipe_velocity: DEFAULT_SWIPE_VELOCITY,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            transition_ms: DEFAULT_TRANSITION_MS,
        }
    }
}

impl FeedConfig {
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn swipe_thresholds(&self) -> SwipeThresholds {
        SwipeThresholds {
            distance: self.swipe_distance,
            velocity: self.swipe_velocity,
        }
    }

    /// Base url that relative file paths are resolved against.
    pub fn static_base(&self) -> String {
        format!(
            "{}{}",
            self.api_base.trim_end_matches('/'),
            self.static_path
        )
    }

    /// Page size of zero would never terminate paging.
    pub fn sanitized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self.visibility_threshold = self.visibility_threshold.clamp(0.0, 1.0);
        self
    }
}

/// Loads and saves [`FeedConfig`] under the settings directory.
pub struct ConfigHandler {
    directory: Directory,
    current: Option<FeedConfig>,
}

impl ConfigHandler {
    pub fn new(path: &DataPath) -> Self {
        Self {
            directory: Directory::new(path.path(DataPathType::Setting)),
            current: None,
        }
    }

    pub fn load(mut self) -> Self {
        match self.directory.get_file(CONFIG_FILE) {
            Ok(contents) => match serde_json::from_str::<FeedConfig>(&contents) {
                Ok(config) => {
                    self.current = Some(config.sanitized());
                }
                Err(err) => {
                    error!("Invalid feed config format ({err}). Using defaults");
                    self.current = Some(FeedConfig::default());
                }
            },
            Err(_) => {
                info!("No feed config found, writing defaults");
                self.current = Some(FeedConfig::default());
                if let Err(err) = self.save() {
                    error!("could not write default feed config: {err}");
                }
            }
        }

        self
    }

    pub fn config(&self) -> FeedConfig {
        self.current.clone().unwrap_or_default()
    }

    pub fn config_mut(&mut self) -> &mut FeedConfig {
        self.current.get_or_insert_with(FeedConfig::default)
    }

    pub fn save(&self) -> Result<()> {
        let config = self.config();
        let serialized = serde_json::to_string_pretty(&config)?;
        write_file(&self.directory.file_path, CONFIG_FILE, &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tmp_path() -> (tempfile::TempDir, DataPath) {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = DataPath::new(tmp.path());
        (tmp, path)
    }

    #[test]
    fn missing_config_writes_defaults() {
        let (_tmp, path) = tmp_path();
        let handler = ConfigHandler::new(&path).load();
        assert_eq!(handler.config(), FeedConfig::default());

        let dir = Directory::new(path.path(DataPathType::Setting));
        assert!(dir.has_file(CONFIG_FILE));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let (_tmp, path) = tmp_path();
        let dir = path.path(DataPathType::Setting);
        write_file(&dir, CONFIG_FILE, r#"{ "page_size": 10, "lang": "zh" }"#).expect("write");

        let config = ConfigHandler::new(&path).load().config();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.lang, "zh");
        assert_eq!(config.fetch_threshold, DEFAULT_FETCH_THRESHOLD);
        assert_eq!(config.throttle_ms, DEFAULT_THROTTLE_MS);
    }

    #[test]
    fn garbage_config_falls_back() {
        let (_tmp, path) = tmp_path();
        let dir = path.path(DataPathType::Setting);
        write_file(&dir, CONFIG_FILE, "not json at all").expect("write");

        let config = ConfigHandler::new(&path).load().config();
        assert_eq!(config, FeedConfig::default());
    }

    #[test]
    fn save_round_trips_changes() {
        let (_tmp, path) = tmp_path();
        let mut handler = ConfigHandler::new(&path).load();
        handler.config_mut().api_base = "https://videos.example.com".to_owned();
        handler.save().expect("save");

        let reloaded = ConfigHandler::new(&path).load().config();
        assert_eq!(reloaded.api_base, "https://videos.example.com");
    }

    #[test]
    fn zero_page_size_is_sanitized() {
        let config = FeedConfig {
            page_size: 0,
            visibility_threshold: 3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.visibility_threshold, 1.0);
    }

    #[test]
    fn static_base_joins_without_double_slash() {
        let config = FeedConfig {
            api_base: "https://api.example.com/".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            config.static_base(),
            "https://api.example.com/sys/common/static"
        );
    }
}
