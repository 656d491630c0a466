//! Source and output file handling

use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;
use crate::domain::model::{DownloadedVideo, SourceFile};

/// Extensions accepted as video sources
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "wmv", "flv", "mpg", "mpeg", "ts", "3gp", "ogv",
];

pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map_or(false, |ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

impl SourceFile {
    /// Read a video file into memory, keeping only its file name
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        if !is_video_path(path) {
            return Err(DomainError::BadArgs(format!(
                "Not a video file: {}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| DomainError::BadArgs(format!("No file name in {}", path.display())))?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(SourceFile::new(file_name, bytes))
    }
}

/// Where a downloaded result lands: `explicit` if given, else the
/// service's file name inside `output_dir`
pub fn output_path(video: &DownloadedVideo, output_dir: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            // Service names are not trusted to stay inside the output dir
            let name = Path::new(&video.filename)
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "processed-video.mp4".into());
            output_dir.join(name)
        }
    }
}

pub async fn write_output(video: &DownloadedVideo, path: &Path) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    tokio::fs::write(path, &video.bytes)
        .await
        .map_err(|e| DomainError::FsFail(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(filename: &str) -> DownloadedVideo {
        DownloadedVideo {
            filename: filename.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_video_extension_filter() {
        assert!(is_video_path(Path::new("clip.MP4")));
        assert!(is_video_path(Path::new("/tmp/a/b.webm")));
        assert!(!is_video_path(Path::new("notes.txt")));
        assert!(!is_video_path(Path::new("mp4")));
    }

    #[tokio::test]
    async fn test_load_keeps_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.mov");
        std::fs::write(&path, b"moov").unwrap();

        let file = SourceFile::load(&path).await.unwrap();
        assert_eq!(file.file_name, "holiday.mov");
        assert_eq!(file.bytes, b"moov");
    }

    #[tokio::test]
    async fn test_load_rejects_non_video_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("readme.txt");
        std::fs::write(&text, b"hi").unwrap();

        assert!(matches!(SourceFile::load(&text).await, Err(DomainError::BadArgs(_))));
        assert!(matches!(
            SourceFile::load(dir.path().join("gone.mp4")).await,
            Err(DomainError::FsFail(_))
        ));
    }

    #[test]
    fn test_output_path_strips_directories_from_service_name() {
        let dir = Path::new("/out");
        assert_eq!(
            output_path(&video("../../etc/clip.mp4"), dir, None),
            PathBuf::from("/out/clip.mp4")
        );
        assert_eq!(
            output_path(&video("clip.mp4"), dir, Some(Path::new("mine.mp4"))),
            PathBuf::from("mine.mp4")
        );
    }

    #[tokio::test]
    async fn test_write_output_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clip.mp4");
        write_output(&video("clip.mp4"), &path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
