use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{LabelError, LabelResult},
    layout::grid::{LabelGridPlanner, RejectedPathPolicy},
    render::raster::validate_dpi,
};

/// Default raster resolution.
pub const DEFAULT_DPI: u32 = 150;

/// Settings for planning and rendering sheets.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    /// Directory every asset must live under.
    pub base_dir: PathBuf,
    /// Raster resolution for PNG output.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// How rejected paths are reported.
    #[serde(default)]
    pub rejected_paths: RejectedPathPolicy,
    /// Worker threads for batch planning; `None` uses rayon's default.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_dpi() -> u32 {
    DEFAULT_DPI
}

impl SheetConfig {
    /// Config with defaults for everything but the base directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            dpi: DEFAULT_DPI,
            rejected_paths: RejectedPathPolicy::default(),
            threads: None,
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_reader<R: Read>(r: R) -> LabelResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| LabelError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON config file.
    ///
    /// A relative `base_dir` is taken relative to the config file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> LabelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LabelError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if cfg.base_dir.is_relative()
            && let Some(dir) = path.parent()
        {
            cfg.base_dir = dir.join(&cfg.base_dir);
        }
        Ok(cfg)
    }

    /// Check value ranges.
    pub fn validate(&self) -> LabelResult<()> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(LabelError::config("base_dir must be non-empty"));
        }
        validate_dpi(self.dpi).map_err(|e| LabelError::config(e.to_string()))?;
        if self.threads == Some(0) {
            return Err(LabelError::config("threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// Planner confined to `base_dir` with this config's policies.
    pub fn planner(&self) -> LabelGridPlanner {
        LabelGridPlanner::new(&self.base_dir).rejected_paths(self.rejected_paths)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
