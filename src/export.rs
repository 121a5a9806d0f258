//! Saving a blog to disk.

use crate::blog::Blog;
use crate::error::BlogGenError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `blog` as Markdown (see [`Blog::to_markdown`]) to `path`.
///
/// The text goes to a sibling `<name>.tmp` first and is renamed into place,
/// so readers never see a half-written file. Missing parent directories are
/// created.
pub async fn write_markdown(blog: &Blog, path: impl AsRef<Path>) -> Result<(), BlogGenError> {
    let path = path.as_ref();
    let failed = |source: std::io::Error| BlogGenError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(failed)?;
    }

    let tmp = temp_sibling(path);
    let markdown = blog.to_markdown();
    if let Err(e) = tokio::fs::write(&tmp, &markdown).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(failed(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(failed(e));
    }

    info!("Wrote {} bytes to {}", markdown.len(), path.display());
    Ok(())
}

/// Write `blog` into `dir` under [`Blog::download_filename`]. Returns the
/// full path written.
pub async fn write_markdown_in(blog: &Blog, dir: impl AsRef<Path>) -> Result<PathBuf, BlogGenError> {
    let path = dir.as_ref().join(blog.download_filename());
    write_markdown(blog, &path).await?;
    Ok(path)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
