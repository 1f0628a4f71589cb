use dutylog_core::{
    load_records, DateKey, JsonRecordRepository, RecordRepository, StoreError,
};
use std::path::{Path, PathBuf};

const IVANOV: &str = "Иванов Иван (10А)";
const PETROV: &str = "Петров Петр (10А)";

fn date(value: &str) -> DateKey {
    DateKey::parse(value).unwrap()
}

fn records_path(dir: &Path) -> PathBuf {
    dir.join("data").join("records.json")
}

fn statuses(repo: &JsonRecordRepository, day: &str, identity: &str) -> Vec<String> {
    repo.get_day(&date(day))
        .get(identity)
        .cloned()
        .unwrap_or_default()
}

#[test]
fn scenario_mark_twice_then_delete_down_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonRecordRepository::open(records_path(dir.path())).unwrap();
    let day = date("2024-05-01");

    repo.mark_status(&day, IVANOV, "Late").unwrap();
    repo.mark_status(&day, IVANOV, "ForgotShoes").unwrap();
    let record = repo.get_day(&day);
    assert_eq!(record.len(), 1);
    assert_eq!(record[IVANOV], vec!["Late", "ForgotShoes"]);

    repo.delete_status(&day, IVANOV, "Late").unwrap();
    assert_eq!(repo.get_day(&day)[IVANOV], vec!["ForgotShoes"]);

    repo.delete_status(&day, IVANOV, "ForgotShoes").unwrap();
    assert!(repo.get_day(&day).is_empty());
    assert!(repo.dates().is_empty());

    let on_disk = load_records(records_path(dir.path())).unwrap();
    assert!(on_disk.day(&day).is_none());
    let raw = std::fs::read_to_string(records_path(dir.path())).unwrap();
    assert!(!raw.contains("2024-05-01"));
}

#[test]
fn marking_appends_without_deduplicating() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonRecordRepository::open(records_path(dir.path())).unwrap();
    let day = date("2024-05-01");

    repo.mark_status(&day, IVANOV, "A").unwrap();
    repo.mark_status(&day, IVANOV, "B").unwrap();
    repo.mark_status(&day, PETROV, "A").unwrap();
    repo.mark_status(&day, PETROV, "A").unwrap();

    assert_eq!(statuses(&repo, "2024-05-01", IVANOV), vec!["A", "B"]);
    assert_eq!(statuses(&repo, "2024-05-01", PETROV), vec!["A", "A"]);
}

#[test]
fn edit_and_delete_touch_only_the_first_match() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonRecordRepository::open(records_path(dir.path())).unwrap();
    let day = date("2024-05-01");
    for status in ["A", "B", "A"] {
        repo.mark_status(&day, IVANOV, status).unwrap();
    }

    repo.edit_status(&day, IVANOV, "A", "C").unwrap();
    assert_eq!(statuses(&repo, "2024-05-01", IVANOV), vec!["C", "B", "A"]);

    repo.mark_status(&day, PETROV, "A").unwrap();
    repo.mark_status(&day, PETROV, "B").unwrap();
    repo.mark_status(&day, PETROV, "A").unwrap();
    repo.delete_status(&day, PETROV, "A").unwrap();
    assert_eq!(statuses(&repo, "2024-05-01", PETROV), vec!["B", "A"]);
}

#[test]
fn occurrence_targets_a_later_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonRecordRepository::open(records_path(dir.path())).unwrap();
    let day = date("2024-05-01");
    for status in ["A", "B", "A"] {
        repo.mark_status(&day, IVANOV, status).unwrap();
    }

    repo.edit_status_at(&day, IVANOV, "A", 1, "C").unwrap();
    assert_eq!(statuses(&repo, "2024-05-01", IVANOV), vec!["A", "B", "C"]);

    repo.delete_status_at(&day, IVANOV, "A", 0).unwrap();
    assert_eq!(statuses(&repo, "2024-05-01", IVANOV), vec!["B", "C"]);

    let err = repo.delete_status_at(&day, IVANOV, "B", 1).unwrap_err();
    assert!(matches!(err, StoreError::RecordNotFound { .. }));
}

#[test]
fn deleting_last_status_cascades_only_as_far_as_needed() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonRecordRepository::open(records_path(dir.path())).unwrap();
    let day = date("2024-05-01");
    repo.mark_status(&day, IVANOV, "Late").unwrap();
    repo.mark_status(&day, PETROV, "Late").unwrap();

    repo.delete_status(&day, IVANOV, "Late").unwrap();
    let record = repo.get_day(&day);
    assert!(!record.contains_key(IVANOV));
    assert_eq!(record[PETROV], vec!["Late"]);
    assert_eq!(repo.dates(), vec![day.clone()]);

    repo.delete_status(&day, PETROV, "Late").unwrap();
    assert!(repo.dates().is_empty());
    assert!(repo.book().is_normalized());
}

#[test]
fn missing_targets_are_record_not_found_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    let mut repo = JsonRecordRepository::open(&path).unwrap();
    let day = date("2024-05-01");
    repo.mark_status(&day, IVANOV, "Late").unwrap();
    let before_disk = std::fs::read_to_string(&path).unwrap();
    let before_memory = repo.book().clone();

    let misses = [
        repo.edit_status(&date("2024-05-02"), IVANOV, "Late", "X"),
        repo.edit_status(&day, PETROV, "Late", "X"),
        repo.edit_status(&day, IVANOV, "Absent", "X"),
        repo.delete_status(&date("2024-05-02"), IVANOV, "Late"),
        repo.delete_status(&day, PETROV, "Late"),
        repo.delete_status(&day, IVANOV, "Absent"),
    ];
    for result in misses {
        let err = result.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { .. }), "{err}");
    }

    assert_eq!(repo.book(), &before_memory);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before_disk);
}

#[test]
fn blank_identity_is_no_student_selected() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    let mut repo = JsonRecordRepository::open(&path).unwrap();

    for identity in ["", "   "] {
        let err = repo
            .mark_status(&date("2024-05-01"), identity, "Late")
            .unwrap_err();
        assert!(matches!(err, StoreError::NoStudentSelected));
    }
    assert!(!path.exists());
}

#[test]
fn get_day_on_empty_date_is_empty_and_never_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    let repo = JsonRecordRepository::open(&path).unwrap();

    assert!(repo.get_day(&date("2024-05-01")).is_empty());
    assert!(repo.day_entries(&date("2024-05-01")).is_empty());
    assert!(!path.exists());
}

#[test]
fn reopening_reproduces_the_same_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    let mut repo = JsonRecordRepository::open(&path).unwrap();
    let first = date("2024-05-01");
    let second = date("2024-05-02");

    repo.mark_status(&first, IVANOV, "Late").unwrap();
    repo.mark_status(&first, IVANOV, "Late").unwrap();
    repo.mark_status(&first, PETROV, "ForgotPass").unwrap();
    repo.mark_status(&second, IVANOV, "LostPass").unwrap();
    repo.edit_status(&first, PETROV, "ForgotPass", "ForgotShoes")
        .unwrap();
    repo.delete_status(&second, IVANOV, "LostPass").unwrap();
    repo.mark_status(&second, PETROV, "свободный текст").unwrap();

    let reopened = JsonRecordRepository::open(&path).unwrap();
    assert_eq!(reopened.book(), repo.book());
    assert_eq!(statuses(&reopened, "2024-05-01", IVANOV), vec!["Late", "Late"]);

    let before = std::fs::read_to_string(&path).unwrap();
    reopened.save().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn failed_save_keeps_previous_state_in_memory_and_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let path = records_path(dir.path());
    let mut repo = JsonRecordRepository::open(&path).unwrap();
    let day = date("2024-05-01");
    repo.mark_status(&day, IVANOV, "Late").unwrap();

    // Replace the data directory with a plain file so every write fails.
    std::fs::remove_dir_all(&data_dir).unwrap();
    std::fs::write(&data_dir, b"not a directory").unwrap();

    let err = repo.mark_status(&day, IVANOV, "ForgotShoes").unwrap_err();
    assert!(err.is_write_failure(), "{err}");
    assert_eq!(statuses(&repo, "2024-05-01", IVANOV), vec!["Late"]);

    let err = repo.delete_status(&day, IVANOV, "Late").unwrap_err();
    assert!(err.is_write_failure(), "{err}");
    assert_eq!(statuses(&repo, "2024-05-01", IVANOV), vec!["Late"]);

    assert!(repo.save().unwrap_err().is_write_failure());
}

#[test]
fn corrupt_document_is_refused_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{\"2024-05-01\": {\"Иванов Иван (10А)\": \"Late\"}}").unwrap();

    let err = JsonRecordRepository::open(&path).err().unwrap();
    assert!(err.is_corrupt_storage(), "{err}");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\"2024-05-01\": {\"Иванов Иван (10А)\": \"Late\"}}"
    );
}

#[test]
fn legacy_document_with_empty_containers_is_normalized_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{
    "2024-04-30": {},
    "2024-05-01": {
        "Иванов Иван (10А)": [],
        "Петров Петр (10А)": ["Опоздал", "Опоздал"]
    }
}"#,
    )
    .unwrap();

    let repo = JsonRecordRepository::open(&path).unwrap();
    assert!(repo.book().is_normalized());
    assert_eq!(repo.dates(), vec![date("2024-05-01")]);
    assert_eq!(
        statuses(&repo, "2024-05-01", PETROV),
        vec!["Опоздал", "Опоздал"]
    );
}

#[test]
fn navigating_past_year_9999_never_writes_an_unloadable_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = records_path(dir.path());
    let mut repo = JsonRecordRepository::open(&path).unwrap();
    let day = date("9999-12-31").next_day();
    assert_eq!(day.as_str(), "9999-12-31");

    repo.mark_status(&day, IVANOV, "Опоздал").unwrap();
    drop(repo);

    let reopened = JsonRecordRepository::open(&path).unwrap();
    assert_eq!(statuses(&reopened, "9999-12-31", IVANOV), vec!["Опоздал"]);
}
