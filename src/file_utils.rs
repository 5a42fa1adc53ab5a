use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// @module: File naming and artifact staging

/// Fallback slug for text without any usable characters
const EMPTY_SLUG: &str = "untitled";

/// Staging subdirectory holding files replaced by a commit
const BACKUP_DIR: &str = ".replaced";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Lowercase ASCII slug, words joined by underscores
    pub fn slugify(text: &str) -> String {
        let slug = text
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("_");

        if slug.is_empty() { EMPTY_SLUG.to_string() } else { slug }
    }

    // @generates: Run identifier, first 8 hex digits of SHA-256(premise, title)
    pub fn run_id(premise: &str, title: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(premise.as_bytes());
        hasher.update([0u8]);
        hasher.update(title.as_bytes());
        let digest = hasher.finalize();
        digest.iter().take(4).map(|b| format!("{:02x}", b)).collect()
    }

    // @generates: Document file name
    pub fn document_file_name(title: &str, run_id: &str, extension: &str) -> String {
        format!("{}_{}_screenplay.{}", Self::slugify(title), run_id, extension)
    }

    // @generates: Portrait file name
    pub fn portrait_file_name(title: &str, run_id: &str, character: &str) -> String {
        format!("{}_{}_{}.png", Self::slugify(title), run_id, Self::slugify(character))
    }
}

/// Artifacts written to a hidden directory inside the output directory and
/// moved into place together on `commit`.
///
/// Dropping an uncommitted stage removes everything written to it.
pub struct ArtifactStage {
    staging: TempDir,
    output_dir: PathBuf,
    files: Vec<String>,
}

impl ArtifactStage {
    /// Open a staging directory inside `output_dir`, creating it if needed
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        FileManager::ensure_dir(&output_dir)?;

        let staging = tempfile::Builder::new()
            .prefix(".screenwright-")
            .tempdir_in(&output_dir)
            .with_context(|| format!("Failed to create staging directory in {:?}", output_dir))?;

        Ok(Self {
            staging,
            output_dir,
            files: Vec::new(),
        })
    }

    /// Stage one file
    pub fn add(&mut self, file_name: &str, data: &[u8]) -> Result<()> {
        if self.files.iter().any(|f| f == file_name) {
            return Err(anyhow!("Artifact staged twice: {}", file_name));
        }
        let path = self.staging.path().join(file_name);
        fs::write(&path, data).with_context(|| format!("Failed to write artifact: {:?}", path))?;
        self.files.push(file_name.to_string());
        Ok(())
    }

    /// Names of the staged files, in staging order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Move every staged file into the output directory.
    ///
    /// Existing files are only replaced when `overwrite` is set; the check runs
    /// for all files before any is moved. If a move fails, files already moved
    /// are taken back and replaced files restored.
    pub fn commit(self, overwrite: bool) -> Result<Vec<PathBuf>> {
        if !overwrite {
            if let Some(existing) = self
                .files
                .iter()
                .map(|f| self.output_dir.join(f))
                .find(|path| path.exists())
            {
                return Err(anyhow!("Output file already exists: {:?}", existing));
            }
        }

        let mut moves = CommitLog::default();
        if let Err(e) = self.move_into_place(&mut moves) {
            moves.roll_back();
            return Err(e);
        }

        self.staging
            .close()
            .context("Failed to remove staging directory")?;
        Ok(moves.written.into_iter().map(|(_, to)| to).collect())
    }

    fn move_into_place(&self, moves: &mut CommitLog) -> Result<()> {
        let backup_dir = self.staging.path().join(BACKUP_DIR);
        for file_name in &self.files {
            let from = self.staging.path().join(file_name);
            let to = self.output_dir.join(file_name);

            if to.exists() {
                FileManager::ensure_dir(&backup_dir)?;
                let backup = backup_dir.join(file_name);
                fs::rename(&to, &backup).with_context(|| format!("Failed to set aside {:?}", to))?;
                moves.replaced.push((backup, to.clone()));
            }

            fs::rename(&from, &to).with_context(|| format!("Failed to move {:?} to {:?}", from, to))?;
            debug!("Wrote {:?}", to);
            moves.written.push((from, to));
        }
        Ok(())
    }
}

/// Renames done by a commit, in order
#[derive(Default)]
struct CommitLog {
    /// (staged, target)
    written: Vec<(PathBuf, PathBuf)>,
    /// (backup, original)
    replaced: Vec<(PathBuf, PathBuf)>,
}

impl CommitLog {
    fn roll_back(&self) {
        for (staged, target) in self.written.iter().rev() {
            if let Err(e) = fs::rename(target, staged) {
                warn!("Could not take back {:?}: {}", target, e);
            }
        }
        for (backup, original) in self.replaced.iter().rev() {
            if let Err(e) = fs::rename(backup, original) {
                warn!("Could not restore {:?}: {}", original, e);
            }
        }
    }
}
