use crate::url::{extension_from_url, UrlParts};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Header written when `metadata.tsv` is first created
const METADATA_HEADER: &str = "url\tpath\tcontent_type\n";

/// File names are cut off past this many bytes; collisions are accepted
const MAX_FILE_NAME_LEN: usize = 240;

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Errors that can occur while writing the corpus
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to prepare output directory {path}: {source}")]
    Prepare {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to append metadata: {0}")]
    Metadata(std::io::Error),
}

/// How a fetched body is filed in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Html,
    Binary,
}

impl ArtifactKind {
    /// Classifies a response by its `Content-Type` header
    ///
    /// Anything claiming `text/html`, and anything with no content type at
    /// all, is treated as HTML; the rest is binary.
    pub fn classify(content_type: &str) -> ArtifactKind {
        if content_type.is_empty() || content_type.to_lowercase().contains("text/html") {
            ArtifactKind::Html
        } else {
            ArtifactKind::Binary
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            ArtifactKind::Html => "html",
            ArtifactKind::Binary => "file",
        }
    }

    fn subdir(self) -> &'static str {
        match self {
            ArtifactKind::Html => "html",
            ArtifactKind::Binary => "files",
        }
    }
}

/// Derives the on-disk file name for a canonical URL
///
/// The name is `{prefix}__{host}{path with / as _}`, with the extension
/// appended unless already present, runs of characters outside
/// `[A-Za-z0-9._-]` collapsed to a single `_`, and the whole name truncated
/// to 240 bytes.
pub fn sanitize_file_name(parts: &UrlParts, extension: &str, prefix: &str) -> String {
    let path = if parts.path.is_empty() || parts.path == "/" {
        "/index"
    } else {
        parts.path.as_str()
    };
    let safe = path.replace('/', "_");
    let mut file_name = format!("{}__{}{}", prefix, parts.host, safe);
    if !extension.is_empty() && !file_name.contains(extension) {
        file_name.push_str(extension);
    }
    let mut file_name = INVALID_CHARS.replace_all(&file_name, "_").into_owned();
    file_name.truncate(MAX_FILE_NAME_LEN);
    file_name
}

/// Filesystem writer plus metadata appender
///
/// One instance is shared by all workers; artifact writes are whole-file and
/// independent, metadata appends serialize on the file-handle lock.
pub struct Sink {
    html_dir: PathBuf,
    files_dir: PathBuf,
    metadata: Mutex<File>,
}

impl Sink {
    /// Creates the output layout under `raw_output`
    ///
    /// Creates `html/` and `files/`, and `metadata.tsv` with its header row
    /// if the log does not exist yet.
    pub fn new(raw_output: &std::path::Path) -> Result<Sink, SinkError> {
        let html_dir = raw_output.join("html");
        let files_dir = raw_output.join("files");
        for dir in [raw_output, html_dir.as_path(), files_dir.as_path()] {
            std::fs::create_dir_all(dir).map_err(|source| SinkError::Prepare {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let metadata_path = raw_output.join("metadata.tsv");
        let fresh = !metadata_path.exists();
        let mut metadata = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&metadata_path)
            .map_err(|source| SinkError::Prepare {
                path: metadata_path.clone(),
                source,
            })?;
        if fresh {
            metadata
                .write_all(METADATA_HEADER.as_bytes())
                .map_err(SinkError::Metadata)?;
        }

        Ok(Sink {
            html_dir,
            files_dir,
            metadata: Mutex::new(metadata),
        })
    }

    /// Writes one fetched artifact and records its metadata row
    ///
    /// Returns the recorded path, relative to the `raw_output` root.
    /// Collisions overwrite the earlier artifact; the metadata log keeps
    /// both rows.
    pub fn persist(
        &self,
        url: &str,
        parts: &UrlParts,
        body: &[u8],
        content_type: &str,
    ) -> Result<String, SinkError> {
        let kind = ArtifactKind::classify(content_type);
        let extension = match kind {
            ArtifactKind::Html => ".html".to_string(),
            ArtifactKind::Binary => {
                let ext = extension_from_url(url);
                if ext.is_empty() {
                    ".bin".to_string()
                } else {
                    ext
                }
            }
        };
        let file_name = sanitize_file_name(parts, &extension, kind.prefix());

        let dir = match kind {
            ArtifactKind::Html => &self.html_dir,
            ArtifactKind::Binary => &self.files_dir,
        };
        let full_path = dir.join(&file_name);
        std::fs::write(&full_path, body).map_err(|source| SinkError::Artifact {
            path: full_path.clone(),
            source,
        })?;

        let relative = format!("{}/{}", kind.subdir(), file_name);
        let line = format!("{}\t{}\t{}\n", url, relative, content_type.to_lowercase());
        let mut metadata = self.metadata.lock().expect("metadata lock poisoned");
        metadata
            .write_all(line.as_bytes())
            .map_err(SinkError::Metadata)?;

        Ok(relative)
    }
}
