use romshelf_dat::GameEntry;

use super::*;
use crate::fixtures::{disk_record, record, sha1_of, write_disk_image, write_zip};

const DKONG: &[u8] = b"donkey kong program";
const DKONGJR: &[u8] = b"donkey kong junior program";

fn fixture(dir: &std::path::Path) -> (Arc<GameCatalog>, Arc<SearchList>) {
    write_zip(&dir.join("dkong.zip"), &[("c_5et_g.bin", DKONG)]);
    std::fs::write(dir.join("radarscp.zip"), b"definitely not a zip").unwrap();
    let digest = sha1_of(b"kinst drive");
    write_disk_image(&dir.join("kinst").join("kinst.chd"), 5, 84, &digest);

    let catalog: GameCatalog = [
        GameEntry::new("dkong", None, None).with_archive_member(record("c_5et_g.bin", DKONG)),
        GameEntry::new("dkongjr", None, None).with_archive_member(record("djr1-c.5b", DKONGJR)),
        GameEntry::new("radarscp", None, None).with_archive_member(record("trs2c5fc", b"rs")),
        GameEntry::new("kinst", None, None).with_disk_image(disk_record("kinst", &digest)),
    ]
    .into_iter()
    .collect();
    (Arc::new(catalog), Arc::new(SearchList::new([dir])))
}

#[test]
fn test_check_one_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, dirs) = fixture(dir.path());
    let resolver = Resolver::new(&catalog, &dirs);

    assert_eq!(
        check_one(&resolver, "dkong").outcome,
        CheckOutcome::Found {
            archive: Some(dir.path().join("dkong.zip")),
            disks: vec![],
        }
    );
    assert_eq!(check_one(&resolver, "dkongjr").outcome, CheckOutcome::NotFound);
    assert!(matches!(
        check_one(&resolver, "radarscp").outcome,
        CheckOutcome::Error(_)
    ));
    assert_eq!(
        check_one(&resolver, "kinst").outcome,
        CheckOutcome::Found {
            archive: None,
            disks: vec![(
                "kinst".to_string(),
                dir.path().join("kinst").join("kinst.chd")
            )],
        }
    );
    assert!(matches!(
        check_one(&resolver, "nosuchgame").outcome,
        CheckOutcome::Error(msg) if msg.contains("nosuchgame")
    ));
}

#[test]
fn test_summarize() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, dirs) = fixture(dir.path());
    let resolver = Resolver::new(&catalog, &dirs);

    let lines = check_sequential(&resolver, &catalog.all_names());
    let summary = summarize(&lines);
    assert_eq!(
        summary,
        CheckSummary {
            found: 2,
            not_found: 1,
            errors: 1,
        }
    );
    assert_eq!(summary.total(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, dirs) = fixture(dir.path());
    let all = catalog.all_names();

    let sequential = {
        let fresh: GameCatalog = catalog.entries().cloned().collect();
        check_sequential(&Resolver::new(&fresh, &dirs), &all)
    };
    let concurrent = check_all(catalog, dirs, all, 3).await;

    assert_eq!(concurrent, sequential);
}

#[tokio::test]
async fn test_single_job_keeps_given_order() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, dirs) = fixture(dir.path());
    let order = vec!["kinst".to_string(), "dkong".to_string()];

    let lines = check_all(catalog, dirs, order, 1).await;
    let got: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(got, vec!["kinst", "dkong"]);
}
