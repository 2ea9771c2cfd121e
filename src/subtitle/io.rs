use super::srt::{format_srt, parse_srt};
use super::Track;
use crate::error::{Result, SubfixError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a fixed track is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Replace the input, keeping the previous version as `<file>.bak`.
    InPlace,
    /// Write to a separate file, replacing whatever is there.
    Path(PathBuf),
}

pub fn load_track(path: &Path) -> Result<Track> {
    let content = fs::read_to_string(path)?;
    let track = parse_srt(&content)?;
    debug!("Loaded {} subtitles from {}", track.len(), path.display());
    Ok(track)
}

/// Save `track` for the input at `input`. Returns the path written.
pub fn save_track(track: &Track, input: &Path, target: &OutputTarget) -> Result<PathBuf> {
    let content = format_srt(track);
    let written = match target {
        OutputTarget::InPlace => {
            save_in_place(&content, input)?;
            input.to_path_buf()
        }
        OutputTarget::Path(path) => {
            save_to(&content, path)?;
            path.clone()
        }
    };
    info!("Subtitles written to {}", written.display());
    Ok(written)
}

/// `fixed.<name>` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("fixed.{}", name.to_string_lossy()));
    output
}

pub fn backup_path(input: &Path) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    input.with_file_name(name)
}

// The original is only touched once the new content is fully on disk.
fn save_in_place(content: &str, input: &Path) -> Result<()> {
    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SubfixError::write(dir, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| SubfixError::write(temp.path(), e))?;

    let backup = backup_path(input);
    remove_if_exists(&backup)?;
    fs::rename(input, &backup).map_err(|e| SubfixError::write(&backup, e))?;
    temp.persist(input)
        .map_err(|e| SubfixError::write(input, e.error))?;
    debug!("Previous version kept at {}", backup.display());
    Ok(())
}

fn save_to(content: &str, path: &Path) -> Result<()> {
    remove_if_exists(path)?;
    fs::write(path, content).map_err(|e| SubfixError::write(path, e))
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SubfixError::write(path, e)),
    }
}
