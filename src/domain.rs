pub mod gesture;
pub mod review_queue;

pub use gesture::{
    GestureClassifier, GesturePhase, GestureSample, GestureSignal, Polarity, SwipeDirection,
    SwipeFeedback, SwipeThreshold,
};
pub use review_queue::{AdvanceResult, ReviewQueue};

use crate::error::CatalogError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of media an item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Maps a file extension to a media kind, `None` for anything that isn't media
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "heic" | "heif" | "tif"
            | "tiff" | "avif" | "dng" => Some(MediaKind::Photo),

            "mp4" | "mov" | "m4v" | "avi" | "mkv" | "webm" | "3gp" => Some(MediaKind::Video),

            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Photo => "Photo",
            MediaKind::Video => "Video",
        }
    }
}

/// Discrete outcome of reviewing one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Delete,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Keep => "KEEP",
            Decision::Delete => "DELETE",
        }
    }
}

/// One unit under review.
///
/// `id` identifies the item in the storage collaborator and is unique within a
/// session. `locator` is what the presentation layer uses to fetch pixels; the
/// engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub id: String,
    pub locator: String,
    pub name: String,
    pub kind: MediaKind,
    pub created: Option<DateTime<Utc>>,
}

impl ReviewItem {
    /// Builds an item with no metadata beyond its identity
    pub fn new(id: impl Into<String>, locator: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            locator: locator.into(),
            kind: MediaKind::Photo,
            created: None,
        }
    }

    /// Reads an item from a file on disk. Returns `Ok(None)` for non-media files.
    pub fn from_path(path: &Path) -> io::Result<Option<Self>> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let kind = match MediaKind::from_extension(extension) {
            Some(kind) => kind,
            None => return Ok(None),
        };

        let metadata = fs::metadata(path)?;
        let created: Option<DateTime<Utc>> = metadata.modified().ok().map(Into::into);

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Some(ReviewItem {
            id: path.display().to_string(),
            locator: format!("file://{}", path.display()),
            name,
            kind,
            created,
        }))
    }
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No items have been loaded yet (or the session was reset)
    Loading,
    /// Items remain; `cursor` is the index of the current item
    Reviewing { cursor: usize },
    /// Every loaded item has been decided
    Complete,
    /// A load finished but produced no items
    Empty,
}

/// Aggregate counts projected from the review queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub total: usize,
    pub kept: usize,
    pub deleted: usize,
    pub remaining: usize,
}

/// Source of the ordered item sequence a session reviews
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    async fn list_items(&self) -> Result<Vec<ReviewItem>, CatalogError>;
}

/// Options for listing media in a directory
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Include files whose names start with '.'
    pub show_hidden: bool,
    /// Oldest first instead of newest first
    pub reverse: bool,
    /// Maximum number of items returned
    pub limit: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            reverse: false,
            limit: 1000,
        }
    }
}

/// Lists photos and videos in a single directory.
///
/// # Behavior
/// - Only files with a photo or video extension are returned
/// - Hidden files are skipped unless `show_hidden` is set
/// - Does not recurse into subdirectories
/// - Ordered by modification time, newest first, then truncated to `limit`
/// - Entries that cannot be read are skipped; an unreadable directory is an error
pub fn discover_media(
    dir_path: &Path,
    options: &CatalogOptions,
) -> Result<Vec<ReviewItem>, CatalogError> {
    let entries =
        fs::read_dir(dir_path).map_err(|e| CatalogError::from_io(dir_path.to_path_buf(), e))?;

    let mut items = Vec::new();

    for entry_result in entries {
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        if !options.show_hidden && file_name.starts_with('.') {
            continue;
        }

        match fs::metadata(&path) {
            Ok(m) if m.is_file() => {}
            _ => continue,
        }

        match ReviewItem::from_path(&path) {
            Ok(Some(item)) => items.push(item),
            Ok(None) | Err(_) => continue,
        }
    }

    items.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.name.cmp(&b.name)));

    if options.reverse {
        items.reverse();
    }

    items.truncate(options.limit);

    Ok(items)
}

/// Catalog backed by one directory on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    pub directory: PathBuf,
    pub options: CatalogOptions,
}

impl DirectoryCatalog {
    pub fn new(directory: impl Into<PathBuf>, options: CatalogOptions) -> Self {
        Self {
            directory: directory.into(),
            options,
        }
    }
}

#[async_trait]
impl MediaCatalog for DirectoryCatalog {
    async fn list_items(&self) -> Result<Vec<ReviewItem>, CatalogError> {
        if !self.directory.is_dir() {
            return Err(CatalogError::NotADirectory {
                path: self.directory.clone(),
            });
        }

        let directory = self.directory.clone();
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || discover_media(&directory, &options))
            .await
            .map_err(|e| CatalogError::Io {
                path: self.directory.clone(),
                source: io::Error::other(format!("catalog task failed: {}", e)),
            })?
    }
}
