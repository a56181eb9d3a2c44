use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// A playable entry of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub cover_url: Option<String>,
}

impl VideoRecord {
    pub fn is_playable(&self) -> bool {
        !self.id.is_empty() && !self.url.is_empty()
    }
}

/// An entry as it arrives from the list endpoint, before its file location
/// is decoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideoEntry {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,

    /// Either JSON text or an already structured [`FileLocation`].
    #[serde(rename = "filePath", default)]
    pub file_path: Option<Value>,

    #[serde(rename = "thumbnailPath", default, deserialize_with = "de_opt_string")]
    pub thumbnail_path: Option<String>,
}

impl RawVideoEntry {
    /// Reads one entry of a page. An entry that is not an object yields an
    /// empty entry, which decodes to an unplayable record.
    pub fn from_value(value: &Value) -> Self {
        RawVideoEntry::deserialize(value).unwrap_or_else(|err| {
            warn!("malformed video entry ({err}): {value}");
            RawVideoEntry::default()
        })
    }
}

/// Deserializes a list of entries without letting one bad entry fail the
/// whole list.
pub(crate) fn de_entries<'de, D>(deserializer: D) -> Result<Vec<RawVideoEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().map(RawVideoEntry::from_value).collect())
}

/// Location descriptor embedded in each raw entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileLocation {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub path_cover: Option<String>,
}

impl FileLocation {
    /// Accepts JSON text or a structured object. Anything else is treated
    /// as a missing location.
    pub fn from_value(value: &Value) -> Result<Option<Self>, serde_json::Error> {
        match value {
            Value::String(text) => serde_json::from_str::<Option<FileLocation>>(text),
            Value::Object(_) => FileLocation::deserialize(value).map(Some),
            _ => Ok(None),
        }
    }
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Turns stored file paths into fetchable urls.
#[derive(Debug, Clone, Default)]
pub struct FileUrls {
    static_base: Option<String>,
}

impl FileUrls {
    pub fn new(static_base: impl Into<String>) -> Self {
        Self {
            static_base: Some(static_base.into()),
        }
    }

    /// Leaves every path untouched.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Absolute urls are returned as is. Relative paths are joined onto the
    /// static file base. Serialized lists (`[...]`) are not paths and
    /// resolve to an empty string.
    pub fn resolve(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() || path.starts_with("http") {
            return path.to_owned();
        }

        if path.contains('[') {
            return String::new();
        }

        match &self.static_base {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_owned(),
        }
    }

    fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.resolve(p)).filter(|p| !p.is_empty())
    }
}

impl RawVideoEntry {
    /// Decodes the entry. Malformed location data never fails, it produces
    /// a record with an empty url that [`VideoRecord::is_playable`] rejects.
    pub fn decode(&self, files: &FileUrls) -> VideoRecord {
        let id = self.id.clone().unwrap_or_default();

        let location = match self.file_path.as_ref().map(FileLocation::from_value) {
            Some(Ok(location)) => location,
            Some(Err(err)) => {
                warn!(
                    "could not parse filePath of video '{id}': {err} (raw: {:?})",
                    self.file_path
                );
                None
            }
            None => None,
        };

        let (path, cover) = location
            .map(|loc| (loc.path, loc.path_cover))
            .unwrap_or_default();

        VideoRecord {
            url: files.resolve_opt(path.as_deref()).unwrap_or_default(),
            cover_url: files.resolve_opt(cover.as_deref()),
            thumbnail_url: files.resolve_opt(self.thumbnail_path.as_deref()),
            id,
        }
    }
}
