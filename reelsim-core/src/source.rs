//! Where script variants come from
//!
//! Script generation itself happens in an external generative service. The
//! core only needs its output, so the seam is a trait that yields variants.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::ingest::parse_variants;
use crate::timeline::ScriptVariant;

const SAMPLE_SCRIPTS_JSON: &str = include_str!("../samples/sample_scripts.json");

/// Producer of script variants
pub trait ScriptSource {
    fn load_variants(&self) -> Result<Vec<ScriptVariant>>;
}

/// Variants stored as generator JSON on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScriptSource for JsonFileSource {
    fn load_variants(&self) -> Result<Vec<ScriptVariant>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let variants = parse_variants(&contents)?;
        debug!(path = %self.path.display(), count = variants.len(), "loaded script variants");
        Ok(variants)
    }
}

/// The two demo scripts bundled with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleScripts;

impl ScriptSource for SampleScripts {
    fn load_variants(&self) -> Result<Vec<ScriptVariant>> {
        parse_variants(SAMPLE_SCRIPTS_JSON)
    }
}
