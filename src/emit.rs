//! Generated artifacts and emission seam
//!
//! Generation produces ordered [`Artifact`] line sequences; persisting them is
//! the emitter's job, reduced here to "append lines, write file". Each
//! artifact carries a SHA256 checksum so a regeneration run can be verified
//! byte-identical, and a [`GenerationManifest`] records the full output of a
//! run.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::Result;

/// SHA256 checksum over an artifact's rendered contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{hash:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated output file: a name and an ordered list of statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub lines: Vec<String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        self.lines.extend(lines);
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Rendered file contents: lines joined with a trailing newline.
    pub fn contents(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn checksum(&self) -> Checksum {
        Checksum::from_bytes(self.contents().as_bytes())
    }
}

/// Header lines for every generated file. Deliberately timestamp-free:
/// regeneration must be byte-identical.
pub fn banner(package: &str) -> Vec<String> {
    vec![
        format!("// Generated by packwright for package '{package}' - DO NOT EDIT"),
        "// Regenerate with `packwright generate`.".to_string(),
        String::new(),
    ]
}

/// Record of one generation run: every artifact name with its checksum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationManifest {
    pub package: String,
    pub artifacts: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub lines: usize,
    pub checksum: Checksum,
}

impl GenerationManifest {
    pub fn new(package: &str, artifacts: &[Artifact]) -> Self {
        Self {
            package: package.to_string(),
            artifacts: artifacts
                .iter()
                .map(|a| ManifestEntry {
                    name: a.name.clone(),
                    lines: a.lines.len(),
                    checksum: a.checksum(),
                })
                .collect(),
        }
    }
}

/// Write all artifacts plus the manifest under `out_dir`.
pub fn write_artifacts(
    out_dir: impl AsRef<Path>,
    manifest: &GenerationManifest,
    artifacts: &[Artifact],
) -> Result<()> {
    let out = out_dir.as_ref();
    fs::create_dir_all(out)?;
    for artifact in artifacts {
        fs::write(out.join(&artifact.name), artifact.contents())?;
        info!(artifact = %artifact.name, lines = artifact.lines.len(), "wrote artifact");
    }
    fs::write(
        out.join("manifest.json"),
        serde_json::to_string_pretty(manifest)?,
    )?;
    Ok(())
}
