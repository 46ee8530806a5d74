use std::collections::{BTreeMap, BTreeSet};

use super::*;
use crate::fixtures::{record, write_zip};

const ROM_A: &[u8] = b"galaga program rom, bank A";
const ROM_B: &[u8] = b"galaga graphics rom, bank B";

fn required(records: &[FileRecord]) -> BTreeMap<String, FileRecord> {
    records.iter().map(|r| (r.name.clone(), r.clone())).collect()
}

#[test]
fn test_missing_archive_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut req = required(&[record("a.bin", ROM_A)]);
    let outcome = match_archive(&dir.path().join("galaga.zip"), &mut req, ExtraMembers::Reject).unwrap();
    assert_eq!(outcome, ArchiveOutcome::NotFound);
    assert_eq!(req.len(), 1);
}

#[test]
fn test_full_match_empties_requirements() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", ROM_A), ("b.bin", ROM_B)]);

    let mut req = required(&[record("a.bin", ROM_A), record("b.bin", ROM_B)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap();
    match outcome {
        ArchiveOutcome::Matched { matched, complete } => {
            assert!(complete);
            assert_eq!(matched.len(), 2);
        }
        other => panic!("Expected Matched, got {:?}", other),
    }
    assert!(req.is_empty());
}

#[test]
fn test_partial_match_shrinks_requirements() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galagao.zip");
    write_zip(&path, &[("a.bin", ROM_A)]);

    let mut req = required(&[record("a.bin", ROM_A), record("b.bin", ROM_B)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap();
    assert_eq!(
        outcome,
        ArchiveOutcome::Matched {
            matched: vec!["a.bin".to_string()],
            complete: false,
        }
    );
    assert_eq!(req.keys().collect::<Vec<_>>(), vec!["b.bin"]);
}

#[test]
fn test_unexpected_member_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", ROM_A), ("readme.txt", &b"hello"[..])]);

    let mut req = required(&[record("a.bin", ROM_A)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap();
    assert!(matches!(
        outcome,
        ArchiveOutcome::Mismatch {
            reason: MemberRejection::Unexpected,
            ..
        }
    ));
    assert_eq!(req.len(), 1, "rejected pass must not touch requirements");
}

#[test]
fn test_unexpected_member_allowed_for_ancestor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", ROM_A), ("b.bin", ROM_B)]);

    let mut req = required(&[record("b.bin", ROM_B)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Allow).unwrap();
    assert!(matches!(outcome, ArchiveOutcome::Matched { complete: true, .. }));
}

#[test]
fn test_skip_list_tolerates_only_named_members() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", ROM_A), ("b.bin", ROM_B)]);

    let clone_members: BTreeSet<String> = ["b.bin".to_string()].into();
    let mut req = required(&[record("a.bin", ROM_A)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Skip(&clone_members)).unwrap();
    assert!(matches!(outcome, ArchiveOutcome::Matched { complete: true, .. }));

    let other: BTreeSet<String> = ["c.bin".to_string()].into();
    let mut req = required(&[record("a.bin", ROM_A)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Skip(&other)).unwrap();
    assert_eq!(
        outcome,
        ArchiveOutcome::Mismatch {
            member: "b.bin".into(),
            reason: MemberRejection::Unexpected,
        }
    );
    assert_eq!(req.len(), 1);
}

#[test]
fn test_wrong_digest_same_size_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    let corrupt: Vec<u8> = ROM_A.iter().map(|b| b ^ 0x01).collect();
    write_zip(&path, &[("a.bin", corrupt.as_slice())]);

    // Same name and size, CRC unchecked so the SHA-1 decides
    let mut rec = record("a.bin", ROM_A);
    rec.expected_crc32 = None;
    let mut req = required(&[rec]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap();
    assert_eq!(
        outcome,
        ArchiveOutcome::Mismatch {
            member: "a.bin".to_string(),
            reason: MemberRejection::Checksum(MismatchKind::Sha1),
        }
    );
}

#[test]
fn test_wrong_size_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", &ROM_A[..10])]);

    let mut req = required(&[record("a.bin", ROM_A)]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap();
    assert!(matches!(
        outcome,
        ArchiveOutcome::Mismatch {
            reason: MemberRejection::Checksum(MismatchKind::Size),
            ..
        }
    ));
}

#[test]
fn test_wrong_crc_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", ROM_A)]);

    let rec = record("a.bin", ROM_A).with_crc32("00000000");
    let mut req = required(&[rec]);
    let outcome = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap();
    assert!(matches!(
        outcome,
        ArchiveOutcome::Mismatch {
            reason: MemberRejection::Checksum(MismatchKind::Crc32),
            ..
        }
    ));
}

#[test]
fn test_corrupt_archive_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    std::fs::write(&path, b"this is not a zip file").unwrap();

    let mut req = required(&[record("a.bin", ROM_A)]);
    let err = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap_err();
    assert!(matches!(err, ResolveError::Archive { .. }));
}

#[test]
fn test_malformed_sha1_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.zip");
    write_zip(&path, &[("a.bin", ROM_A)]);

    let mut rec = record("a.bin", ROM_A);
    rec.expected_sha1 = "xyz".to_string();
    let mut req = required(&[rec]);
    let err = match_archive(&path, &mut req, ExtraMembers::Reject).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_archive_path() {
    assert_eq!(
        archive_path(Path::new("/roms/b"), "galaga"),
        PathBuf::from("/roms/b/galaga.zip")
    );
}
