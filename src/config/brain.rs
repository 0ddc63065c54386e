use crate::domain::model::Brain;
use crate::utils::error::{DreamError, Result};
use std::path::{Path, PathBuf};

/// 讀取 brain 檔案（{"intent": ..., "style": ...}）
pub fn load_brain<P: AsRef<Path>>(path: P) -> Result<Brain> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DreamError::InvalidBrain {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| DreamError::InvalidBrain {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Brain files in `dir` whose name starts with `prefix` and ends in `.json`, sorted by name.
pub fn discover_brains<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut brains = Vec::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string);

        if let (true, Some(stem)) = (is_json, stem) {
            if stem.starts_with(prefix) {
                brains.push((stem, path));
            }
        }
    }

    brains.sort_by(|a, b| a.0.cmp(&b.0));
    tracing::debug!(
        "Discovered {} brain files in {}",
        brains.len(),
        dir.as_ref().display()
    );
    Ok(brains)
}
