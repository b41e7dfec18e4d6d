use anyhow::{Context, Result};
use constitution_model::Section;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk constitution: `{ "id": ..., "sections": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstitutionFile {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ConstitutionFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let file: ConstitutionFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid constitution file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            sections = file.sections.len(),
            "Loaded constitution"
        );
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
        Ok(())
    }
}
