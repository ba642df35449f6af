use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Deserialize, Clone)]
pub struct BackdropFile {
    pub version: String,
    pub backdrop_id: String,
    pub layers: Vec<BackdropLayer>,
}

/// One scrolling image plus its parallax speed. The order of layers in the
/// file is the draw order: first entry is the farthest background, last is
/// the foreground. Rendering never re-sorts them.
#[derive(Debug, Deserialize, Clone)]
pub struct BackdropLayer {
    pub id: String,
    pub asset: String,
    pub speed: f32,
}

pub struct BackdropWatcher {
    backdrop_path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl BackdropWatcher {
    pub fn new(backdrop_path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&backdrop_path);
        Self {
            backdrop_path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.backdrop_path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

pub fn load_backdrop_from_path(backdrop_path: &Path) -> Result<BackdropFile, String> {
    let raw = fs::read_to_string(backdrop_path).map_err(|e| {
        format!(
            "Failed to read backdrop file {}: {e}",
            backdrop_path.display()
        )
    })?;
    let backdrop: BackdropFile = serde_json::from_str(&raw).map_err(|e| {
        format!(
            "Failed to parse backdrop JSON {}: {e}",
            backdrop_path.display()
        )
    })?;
    validate_backdrop(&backdrop)?;
    Ok(backdrop)
}

fn validate_backdrop(backdrop: &BackdropFile) -> Result<(), String> {
    if backdrop.layers.is_empty() {
        return Err("Backdrop validation failed: layers array is empty".to_string());
    }

    let mut layer_ids = HashSet::new();
    for layer in &backdrop.layers {
        if !layer_ids.insert(layer.id.clone()) {
            return Err(format!(
                "Backdrop validation failed: duplicate layer id '{}'",
                layer.id
            ));
        }
        if !(0.0..=1.0).contains(&layer.speed) {
            return Err(format!(
                "Backdrop validation failed: layer '{}' speed {} is outside [0, 1]",
                layer.id, layer.speed
            ));
        }
        if layer.asset.is_empty() {
            return Err(format!(
                "Backdrop validation failed: layer '{}' has an empty asset path",
                layer.id
            ));
        }
    }

    Ok(())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}
