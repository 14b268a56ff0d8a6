use mf_archive::*;
use mf_core::ForcingVariable;

fn sample_archive() -> MemoryArchive {
    MemoryArchive::from_fn("hours since 2007-01-01 00:00:00", 48, |var, row| {
        var.index() as f64 * 1000.0 + row as f64
    })
}

#[test]
fn save_and_open_json_archive() {
    let temp_dir = std::env::temp_dir().join("mf_archive_test");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();
    let path = temp_dir.join("forcing.json");

    let memory = sample_archive();
    JsonArchive::from_archive(&memory).unwrap().save(&path).unwrap();

    let archive = open_archive(&path).unwrap();
    assert_eq!(archive.row_count(), 48);
    assert_eq!(archive.time_units(), "hours since 2007-01-01 00:00:00");

    for var in ForcingVariable::ALL {
        let rows = archive.read_rows(var, 10..13).unwrap();
        let base = var.index() as f64 * 1000.0;
        assert_eq!(rows, vec![base + 10.0, base + 11.0, base + 12.0]);
    }
}

#[test]
fn uppercase_extension_is_accepted() {
    let temp_dir = std::env::temp_dir().join("mf_archive_test_upper");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();
    let path = temp_dir.join("FORCING.JSON");

    JsonArchive::from_archive(&sample_archive())
        .unwrap()
        .save(&path)
        .unwrap();

    assert!(open_archive(&path).is_ok());
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("mf_archive_does_not_exist.json");
    let _ = std::fs::remove_file(&path);

    let err = open_archive(&path).err().unwrap();
    assert!(matches!(err, ArchiveError::Io(_)));
}
