use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Resolve the detection model file, downloading it on first use.
///
/// Resolution order:
/// 1. Explicit override path (from the `--model` flag); missing is an error.
/// 2. User cache directory (platform-specific).
/// 3. Download from `url` into the cache.
pub fn resolve(
    name: &str,
    url: &str,
    override_path: Option<&Path>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = override_path {
        if !path.exists() {
            return Err(ModelResolveError::NotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }

    let cache_dir = model_cache_dir()?;
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("downloading detection model {name} from {url}");
    download(url, &cached_path)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory, e.g.
/// `~/.cache/anonymiser/models/` on Linux.
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("anonymiser").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|e| ModelResolveError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
