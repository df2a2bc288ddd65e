//! Runs the `yt-dlp` binary into a temporary directory and returns the file.
//! The child is killed if the provider timeout drops this future.

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use std::process::Stdio;

use crate::domain::types::ProviderResult;

pub(super) async fn download(binary: &str, url: &str) -> Result<ProviderResult> {
    let dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let output = dir.path().join("reel.mp4");

    let result = tokio::process::Command::new(binary)
        .arg(url)
        .arg("--output")
        .arg(&output)
        .args(["--format", "mp4", "--no-playlist", "--quiet"])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed to spawn {binary}"))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        bail!("{binary} exited with {}: {}", result.status, stderr.trim());
    }

    let data = tokio::fs::read(&output)
        .await
        .with_context(|| format!("{binary} failed to download file"))?;
    Ok(ProviderResult::RawBytes(Bytes::from(data)))
}
