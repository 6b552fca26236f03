//! End-to-end pipeline tests: sandbox, gate, engine, persistence.

use std::path::Path;

use tempfile::TempDir;

use warden_engine::{
    EditOperation, EditStatus, MutateError, MutationOptions, Mutator, MutatorConfig,
};
use warden_types::ReasonCode;

fn mutator_for(root: &Path) -> Mutator {
    Mutator::new(MutatorConfig {
        roots: vec![root.to_path_buf()],
        require_absolute: true,
        options: MutationOptions::default(),
    })
    .expect("root set should construct")
}

fn literal(old: &str, new: &str) -> EditOperation {
    EditOperation::Literal {
        old: old.to_string(),
        new: new.to_string(),
    }
}

#[tokio::test]
async fn test_mutation_persists_and_reports() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "foo foo\n").unwrap();

    let mutator = mutator_for(dir.path());
    let report = mutator
        .mutate_file(&file, &[literal("foo", "bar")], false)
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].status, EditStatus::MultipleMatches);
    assert_eq!(report.outcomes[0].match_count, 2);
    assert_eq!(report.final_content, "bar bar\n");
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "bar bar\n");
}

#[tokio::test]
async fn test_dry_run_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "foo\n").unwrap();

    let mutator = mutator_for(dir.path());
    let report = mutator
        .mutate_file(&file, &[literal("foo", "bar")], true)
        .await
        .unwrap();

    // The report shows the change; the file does not.
    assert_eq!(report.final_content, "bar\n");
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "foo\n");
}

#[tokio::test]
async fn test_path_outside_roots_is_terminal() {
    let dir = TempDir::new().unwrap();
    let mutator = mutator_for(dir.path());

    let err = mutator
        .mutate_file(Path::new("/etc/passwd"), &[literal("root", "x")], true)
        .await
        .unwrap_err();

    assert!(matches!(err, MutateError::SandboxRejected { .. }));
    assert_eq!(err.reason_code(), ReasonCode::PathOutsideSandbox);
    assert!(!err.advice().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_terminal() {
    let dir = TempDir::new().unwrap();
    let mutator = mutator_for(dir.path());
    let missing = dir.path().join("missing.txt");

    let err = mutator
        .mutate_file(&missing, &[literal("a", "b")], true)
        .await
        .unwrap_err();

    assert_eq!(err.reason_code(), ReasonCode::PathNotFound);
}

#[tokio::test]
async fn test_binary_file_is_terminal() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("blob.dat");
    std::fs::write(&file, b"\x00\x01\x02\x03").unwrap();

    let mutator = mutator_for(dir.path());
    let err = mutator
        .mutate_file(&file, &[literal("a", "b")], true)
        .await
        .unwrap_err();

    assert_eq!(err.reason_code(), ReasonCode::BinaryOrExecutable);
}

#[tokio::test]
async fn test_non_utf8_file_is_rejected_not_corrupted() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("latin1.txt");
    // Latin-1 content; a lossy decode would rewrite 0xE9 on the first line
    // even though the edit only targets the second.
    std::fs::write(&file, b"caf\xe9\nalpha\n").unwrap();

    let mutator = mutator_for(dir.path());
    let err = mutator
        .mutate_file(&file, &[literal("alpha", "beta")], false)
        .await
        .unwrap_err();

    assert_eq!(err.reason_code(), ReasonCode::BinaryOrExecutable);
    assert_eq!(std::fs::read(&file).unwrap(), b"caf\xe9\nalpha\n");
}

#[tokio::test]
async fn test_write_invalidates_classifier_cache() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "foo\n").unwrap();

    let mutator = mutator_for(dir.path());
    mutator
        .mutate_file(&file, &[literal("foo", "bar")], false)
        .await
        .unwrap();

    // The gate's check cached a verdict during the request; the write must
    // have dropped it so the next classification sees the new content.
    assert!(mutator.gate().cache().is_empty());
}

#[tokio::test]
async fn test_patch_conflict_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "current content\n").unwrap();

    let patch = "\
@@ -1,1 +1,1 @@
-stale content
+new content
";
    let mutator = mutator_for(dir.path());
    let report = mutator
        .mutate_file(
            &file,
            &[EditOperation::DiffPatch {
                patch: patch.to_string(),
            }],
            false,
        )
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].status, EditStatus::Failed);
    assert_eq!(report.outcomes[0].reason, Some(ReasonCode::PatchConflict));
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "current content\n"
    );
}

#[tokio::test]
async fn test_partial_failure_still_persists_successful_edits() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "alpha\n").unwrap();

    let mutator = mutator_for(dir.path());
    let report = mutator
        .mutate_file(
            &file,
            &[literal("missing", "x"), literal("alpha", "beta")],
            false,
        )
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].status, EditStatus::NoMatch);
    assert_eq!(report.outcomes[1].status, EditStatus::Success);
    assert_eq!(report.aggregate_status(), EditStatus::NoMatch);
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "beta\n");
}

#[tokio::test]
async fn test_report_serializes_for_transport() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "foo\n").unwrap();

    let mutator = mutator_for(dir.path());
    let report = mutator
        .mutate_file(&file, &[literal("foo", "bar")], true)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "success");
    assert_eq!(json["outcomes"][0]["kind"], "literal");
    assert_eq!(json["final_content"], "bar\n");
    assert_eq!(json["formatting"]["line_ending"], "lf");
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_escape_is_rejected() {
    let root = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let target = outside.path().join("secret.txt");
    std::fs::write(&target, "secret\n").unwrap();

    let link = root.path().join("innocent.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let mutator = mutator_for(root.path());
    let err = mutator
        .mutate_file(&link, &[literal("secret", "leaked")], false)
        .await
        .unwrap_err();

    assert_eq!(err.reason_code(), ReasonCode::PathOutsideSandbox);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "secret\n");
}
