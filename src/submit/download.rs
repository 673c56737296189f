//! Artifact downloads.
//!
//! Saves the files named by a result's download links into a local directory.

use crate::error::{DubshError, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Local file name for an artifact URL.
///
/// Prefers the `path` query parameter (the backend serves files as
/// `/download?path=NAME`), then the last path segment. Only the final
/// component is kept, so a link can never name a file outside the target
/// directory.
pub fn artifact_file_name(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "path")
        .map(|(_, value)| value.into_owned());
    let from_path = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string);

    from_query
        .into_iter()
        .chain(from_path)
        .find_map(|candidate| last_component(&candidate))
}

fn last_component(candidate: &str) -> Option<String> {
    candidate
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .map(str::to_string)
}

/// Sibling file a download is streamed into before it takes its final name.
fn part_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    output_path.with_file_name(name)
}

/// Download `url` into `dir`, returning the written path.
///
/// Fails without touching the disk if the target file already exists. The
/// body lands in `NAME.part` first and is renamed once complete, so a failed
/// transfer never leaves a file under the final name.
pub async fn save_artifact(
    client: &reqwest::Client,
    url: &Url,
    dir: &Path,
    progress: bool,
) -> Result<PathBuf> {
    let name = artifact_file_name(url).ok_or_else(|| DubshError::Download {
        message: format!("Cannot derive a file name from {url}"),
    })?;
    let output_path = dir.join(&name);
    if output_path.exists() {
        return Err(DubshError::Download {
            message: format!("{} already exists", output_path.display()),
        });
    }

    fs::create_dir_all(dir).map_err(|e| DubshError::Download {
        message: format!("Failed to create {}: {e}", dir.display()),
    })?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| DubshError::Download {
            message: format!("Failed to start download: {e}"),
        })?;

    if !response.status().is_success() {
        return Err(DubshError::Download {
            message: format!("{url} returned status {}", response.status()),
        });
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            // SAFETY: hardcoded template string, always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        pb.set_message(name.clone());
        Some(pb)
    } else {
        None
    };

    // A stale part file from an interrupted run is overwritten.
    let part = part_path(&output_path);
    let written = write_part(response, &part, pb.as_ref()).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(&part) {
            log::warn!("Failed to remove partial download: {remove_err}");
        }
        return Err(e);
    }

    if output_path.exists() {
        if let Err(remove_err) = fs::remove_file(&part) {
            log::warn!("Failed to remove partial download: {remove_err}");
        }
        return Err(DubshError::Download {
            message: format!("{} already exists", output_path.display()),
        });
    }
    fs::rename(&part, &output_path).map_err(|e| DubshError::Download {
        message: format!("Failed to move download to {}: {e}", output_path.display()),
    })?;

    log::debug!("Saved {url} to {}", output_path.display());
    Ok(output_path)
}

async fn write_part(
    response: reqwest::Response,
    part: &Path,
    pb: Option<&ProgressBar>,
) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(part)
        .map_err(|e| DubshError::Download {
            message: format!("Failed to create {}: {e}", part.display()),
        })?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DubshError::Download {
            message: format!("Failed to read download chunk: {e}"),
        })?;
        file.write_all(&chunk).map_err(|e| DubshError::Download {
            message: format!("Failed to write {}: {e}", part.display()),
        })?;
        if let Some(pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }
    file.flush().map_err(|e| DubshError::Download {
        message: format!("Failed to write {}: {e}", part.display()),
    })
}
