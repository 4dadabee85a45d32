
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tokio::process::Command;

/// Candidate external players, tried in order. The first one present on PATH
/// wins.
const PLAYER_CANDIDATES: &[&str] = &["ffplay", "afplay", "aplay", "paplay", "play"];

pub fn find_player() -> Option<PathBuf> {
    PLAYER_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

fn player_command(player: &Path, file: &Path) -> Command {
    let mut command = Command::new(player);
    if player.file_stem().is_some_and(|stem| stem == "ffplay") {
        command.args(["-nodisp", "-autoexit", "-loglevel", "quiet"]);
    }
    command.arg(file);
    command
}

/// Plays one audio file through the external player and waits for the child
/// to exit. A failed or missing player is downgraded to a warning — playback
/// is best-effort and never fails the command.
pub async fn play_file(path: &Path) -> anyhow::Result<()> {
    let Some(player) = find_player() else {
        log::warn!(
            "no audio player found on PATH (tried {}); skipping playback",
            PLAYER_CANDIDATES.join(", ")
        );
        return Ok(());
    };

    log::info!("Playing {} with {}", path.display(), player.display());
    match player_command(&player, path).status().await {
        Ok(status) if status.success() => {}
        Ok(status) => log::warn!("audio player exited with {status}"),
        Err(e) => log::warn!("failed to run audio player: {e}"),
    }
    Ok(())
}

/// Extracts every file entry of a zip archive into `dir` and returns the
/// extracted paths in lexical entry-name order. The engine names batch
/// entries so that this order recovers the input order.
pub fn extract_archive(archive_path: &Path, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();

    let mut extracted = Vec::with_capacity(names.len());
    for name in names {
        let mut entry = archive.by_name(&name)?;
        if entry.is_dir() {
            continue;
        }
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("skipping archive entry with unsafe name: {name}");
            continue;
        };
        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;
        extracted.push(target);
    }

    Ok(extracted)
}

/// Extracts a batch archive into a scoped temporary directory and plays each
/// entry in name-sorted order. The directory is removed afterwards no matter
/// how extraction or playback went; removal failures are logged, not raised.
pub async fn play_archive(path: &Path) -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let entries = extract_archive(path, dir.path())?;
    log::info!("Extracted {} entries from {}", entries.len(), path.display());

    for entry in &entries {
        play_file(entry).await?;
    }

    if let Err(e) = dir.close() {
        log::warn!("failed to remove temporary directory: {e}");
    }
    Ok(())
}
