//! Save slots on disk: one pretty-printed JSON file per slot.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use rebellion_core::state::SaveSnapshot;

/// Everything written to a save slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub slot_name: String,
    /// Seed the run was started with.
    pub seed: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub snapshot: SaveSnapshot,
}

/// Slot summary for listing saves without keeping full snapshots around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub slot_name: String,
    pub timestamp: u64,
    pub stage_index: usize,
    pub wave_index: usize,
    pub score: u64,
    pub refugees: u32,
}

pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn save_path(dir: &Path, slot: &str) -> Result<PathBuf> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        bail!("invalid save slot name '{slot}'");
    }
    Ok(dir.join(format!("{slot}.json")))
}

/// Write a save file. Returns the path written.
pub fn save_to_file(dir: &Path, save: &SaveFile) -> Result<PathBuf> {
    let path = save_path(dir, &save.slot_name)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating save directory {}", dir.display()))?;
    let json = serde_json::to_string_pretty(save).context("failed serializing save data")?;
    fs::write(&path, json).with_context(|| format!("failed writing {}", path.display()))?;
    log::info!("saved slot {} to {}", save.slot_name, path.display());
    Ok(path)
}

pub fn load_from_file(dir: &Path, slot: &str) -> Result<SaveFile> {
    let path = save_path(dir, slot)?;
    let json =
        fs::read_to_string(&path).with_context(|| format!("failed reading {}", path.display()))?;
    let save: SaveFile = serde_json::from_str(&json)
        .with_context(|| format!("failed parsing save {}", path.display()))?;
    Ok(save)
}

/// All readable saves in `dir`, newest first. Unreadable files are skipped.
pub fn list_saves(dir: &Path) -> Vec<SaveMetadata> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut saves: Vec<SaveMetadata> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| {
            let json = fs::read_to_string(&path).ok()?;
            match serde_json::from_str::<SaveFile>(&json) {
                Ok(save) => Some(SaveMetadata {
                    slot_name: save.slot_name,
                    timestamp: save.timestamp,
                    stage_index: save.snapshot.stage_index,
                    wave_index: save.snapshot.wave_index,
                    score: save.snapshot.score,
                    refugees: save.snapshot.refugees,
                }),
                Err(err) => {
                    log::debug!("skipping {}: {err}", path.display());
                    None
                }
            }
        })
        .collect();
    saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    saves
}

pub fn delete_save(dir: &Path, slot: &str) -> Result<()> {
    let path = save_path(dir, slot)?;
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("failed deleting {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebellion_core::components::Health;
    use rebellion_core::enums::AmmoType;

    fn make_save(slot: &str, stage: usize, timestamp: u64) -> SaveFile {
        SaveFile {
            slot_name: slot.to_string(),
            seed: 42,
            timestamp,
            snapshot: SaveSnapshot {
                score: 1200,
                refugees: 35,
                unlocked_ammo: vec![AmmoType::Sabot, AmmoType::Emp],
                selected_ammo: AmmoType::Emp,
                rockets: 7,
                max_rockets: 20,
                gun_count: 2,
                health: Health::full(100.0, 100.0, 100.0),
                stage_index: stage,
                wave_index: 1,
            },
        }
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let save = make_save("slot1", 1, 1000);
        let path = save_to_file(dir.path(), &save).unwrap();
        assert!(path.ends_with("slot1.json"));

        let loaded = load_from_file(dir.path(), "slot1").unwrap();
        assert_eq!(loaded, save);
    }

    #[test]
    fn load_missing_slot_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_file(dir.path(), "nothing").is_err());
    }

    #[test]
    fn slot_names_cannot_escape_dir() {
        let dir = tempfile::tempdir().unwrap();
        let save = make_save("../evil", 0, 1);
        assert!(save_to_file(dir.path(), &save).is_err());
        assert!(load_from_file(dir.path(), "").is_err());
    }

    #[test]
    fn list_saves_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_saves(&dir.path().join("missing")).is_empty());
        assert!(list_saves(dir.path()).is_empty());
    }

    #[test]
    fn list_saves_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        save_to_file(dir.path(), &make_save("early", 0, 1000)).unwrap();
        save_to_file(dir.path(), &make_save("late", 2, 2000)).unwrap();
        fs::write(dir.path().join("junk.json"), "not a save").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let saves = list_saves(dir.path());
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[0].slot_name, "late");
        assert_eq!(saves[0].stage_index, 2);
        assert_eq!(saves[1].slot_name, "early");
    }

    #[test]
    fn delete_save_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        save_to_file(dir.path(), &make_save("gone", 0, 5)).unwrap();
        delete_save(dir.path(), "gone").unwrap();
        assert!(load_from_file(dir.path(), "gone").is_err());
        // Deleting an empty slot is fine.
        delete_save(dir.path(), "gone").unwrap();
    }

    #[test]
    fn deleted_slot_drops_out_of_listing() {
        let dir = tempfile::tempdir().unwrap();
        save_to_file(dir.path(), &make_save("keep", 1, 10)).unwrap();
        save_to_file(dir.path(), &make_save("drop", 0, 20)).unwrap();
        delete_save(dir.path(), "drop").unwrap();

        let saves = list_saves(dir.path());
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].slot_name, "keep");
        assert_eq!(saves[0].score, 1200);
        assert!(delete_save(dir.path(), "../keep").is_err());
    }
}
