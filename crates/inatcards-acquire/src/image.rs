use crate::client::InatClient;
use anyhow::{Context, Result};
use inatcards_model::{normalize_name, Taxon};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How many `{name}.{index}.{ext}` slots are tried before giving up.
pub const MAX_SLOTS: usize = 10;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no file extension known for content type '{0}'")]
    UnknownContentType(String),

    #[error("response for {0} has no Content-Type header")]
    MissingContentType(String),
}

/// Raw photo bytes as served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl FetchedImage {
    pub fn extension(&self) -> Result<&'static str, ImageError> {
        extension_for(&self.content_type)
    }
}

/// File extension for an image content type. Media-type parameters are ignored.
pub fn extension_for(content_type: &str) -> Result<&'static str, ImageError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        _ => Err(ImageError::UnknownContentType(content_type.to_string())),
    }
}

impl InatClient {
    pub async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        let response = self
            .http()
            .get(url)
            .send()
            .await
            .context("Failed to fetch image")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ImageError::MissingContentType(url.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .context("Failed to read image body")?
            .to_vec();

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }

    /// Fetch every photo of `taxon` and save it under `dest_dir`.
    ///
    /// Returns the paths written; photos with no free slot are left out.
    pub async fn download_taxon_images(&self, taxon: &Taxon, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

        let mut written = Vec::new();
        for url in &taxon.images {
            let image = self.fetch_image(url).await?;
            if let Some(path) = save_image(dest_dir, &taxon.name, &image)? {
                written.push(path);
            }
        }

        tracing::info!(
            taxon = %taxon.name,
            images = taxon.images.len(),
            saved = written.len(),
            "Downloaded taxon images"
        );
        Ok(written)
    }
}

/// Write `image` to the first free `{dest_dir}/{name}.{index}.{ext}`.
///
/// Files are created exclusively and never overwritten. When all
/// [`MAX_SLOTS`] indices are taken the image is dropped and `Ok(None)` is
/// returned.
pub fn save_image(dest_dir: &Path, name: &str, image: &FetchedImage) -> Result<Option<PathBuf>> {
    let ext = image.extension()?;
    let stem = normalize_name(name);

    for index in 0..MAX_SLOTS {
        let path = dest_dir.join(format!("{stem}.{index}.{ext}"));
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", path.display()))
            }
        };

        write_or_discard(file, &path, &image.bytes)?;
        tracing::info!(path = %path.display(), bytes = image.bytes.len(), "Saved image");
        return Ok(Some(path));
    }

    tracing::debug!(name = %stem, "All image slots taken, dropping image");
    Ok(None)
}

/// Write `bytes` into the freshly created `path`, removing the file again if
/// the write fails so the slot stays free.
fn write_or_discard(mut file: impl Write, path: &Path, bytes: &[u8]) -> Result<()> {
    let written = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);

    if let Err(e) = written {
        if let Err(remove) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), "Failed to remove partial image: {remove}");
        }
        return Err(e).with_context(|| format!("Failed to write {}", path.display()));
    }
    Ok(())
}
