/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;

use screenwright::file_utils::{ArtifactStage, FileManager};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("present.txt");
    fs::write(&path, "content")?;

    assert!(FileManager::file_exists(&path));
    assert!(!FileManager::dir_exists(&path));
    Ok(())
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensureDir_withNestedPath_shouldCreateAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Document and portrait names share the title slug and run id
#[test]
fn test_fileNames_sameRun_shouldSharePrefix() {
    let run_id = FileManager::run_id("A lighthouse keeper", "Last Light");

    let document = FileManager::document_file_name("Last Light", &run_id, "txt");
    let portrait = FileManager::portrait_file_name("Last Light", &run_id, "MARA");

    let prefix = format!("last_light_{}_", run_id);
    assert!(document.starts_with(&prefix));
    assert!(portrait.starts_with(&prefix));
    assert!(document.ends_with("_screenplay.txt"));
    assert!(portrait.ends_with("_mara.png"));
}

/// Different premises with the same title get different run ids
#[test]
fn test_runId_differentPremise_shouldDiffer() {
    assert_ne!(
        FileManager::run_id("A lighthouse keeper", "Last Light"),
        FileManager::run_id("A lighthouse buyer", "Last Light")
    );
}

/// Nothing reaches the output directory before commit
#[test]
fn test_artifactStage_beforeCommit_shouldOnlyHoldStagingDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut stage = ArtifactStage::new(temp_dir.path())?;
    stage.add("doc.txt", b"body")?;

    let names = common::files_in(&temp_dir)?;
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with(".screenwright-"));

    let written = stage.commit(false)?;
    assert_eq!(written, vec![temp_dir.path().join("doc.txt")]);
    assert_eq!(common::files_in(&temp_dir)?, vec!["doc.txt".to_string()]);
    Ok(())
}
