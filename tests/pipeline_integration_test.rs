use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use zippack::{ArchiveError, PackOptions, Pipeline};

/// Creates `count` files with distinct, compressible contents and returns
/// their paths.
fn make_input_files(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("file_{i}.dat"));
            let body = format!("contents of file {i}\n").repeat(200 + i * 37);
            fs::write(&path, body).unwrap();
            path
        })
        .collect()
}

/// Reads every entry of a ZIP as `(name, raw stored payload)`.
fn read_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut payload = Vec::new();
        entry.read_to_end(&mut payload).unwrap();
        entries.push((entry.name().to_string(), payload));
    }
    entries
}

fn inflate(data: &[u8]) -> Vec<u8> {
    let mut decoder = flate2::read::DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn n_inputs_produce_n_round_tripping_entries() {
    let source = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let inputs = make_input_files(source.path(), 8);
    let archive_path = out_dir.path().join("out.zip");

    let report = Pipeline::new(PackOptions::default())
        .run(&inputs, &archive_path)
        .unwrap();

    assert_eq!(report.inputs, 8);
    assert_eq!(report.entries_written, 8);

    let entries = read_entries(&archive_path);
    assert_eq!(entries.len(), 8);

    let names: HashSet<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names.len(), 8, "every entry name present exactly once");

    for (name, payload) in &entries {
        let original = fs::read(source.path().join(name)).unwrap();
        assert_eq!(inflate(payload), original, "round-trip failed for {name}");
    }
}

#[test]
fn unreadable_inputs_are_skipped_not_fatal() {
    let source = tempfile::tempdir().unwrap();
    let mut inputs = make_input_files(source.path(), 4);
    inputs.push(source.path().join("does_not_exist.dat"));
    inputs.push(source.path().join("also_missing.dat"));
    let archive_path = source.path().join("out.zip");

    let report = Pipeline::new(PackOptions::default())
        .run(&inputs, &archive_path)
        .unwrap();

    assert_eq!(report.inputs, 6);
    assert_eq!(report.entries_written, 4);
    assert_eq!(report.skipped(), 2);
    assert_eq!(read_entries(&archive_path).len(), 4);
}

#[test]
fn zero_inputs_produce_empty_valid_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("empty.zip");

    let report = Pipeline::new(PackOptions::default())
        .run(&[], &archive_path)
        .unwrap();

    assert_eq!(report.inputs, 0);
    assert_eq!(report.entries_written, 0);
    assert!(read_entries(&archive_path).is_empty());
}

#[test]
fn progress_is_monotone_and_ends_at_100() {
    let source = tempfile::tempdir().unwrap();
    let inputs = make_input_files(source.path(), 6);
    let archive_path = source.path().join("out.zip");

    let reports = Arc::new(Mutex::new(Vec::<f32>::new()));
    let sink = Arc::clone(&reports);
    Pipeline::new(PackOptions::default())
        .with_progress(move |pct| sink.lock().unwrap().push(pct))
        .run(&inputs, &archive_path)
        .unwrap();

    let reports = reports.lock().unwrap();
    assert!(!reports.is_empty());
    assert!(reports.len() <= 6, "at most one report per input");
    assert!(
        reports.windows(2).all(|w| w[0] <= w[1]),
        "progress must be non-decreasing: {reports:?}"
    );
    assert_eq!(*reports.last().unwrap(), 100.0);
}

#[test]
fn progress_reaches_100_even_with_unreadable_inputs() {
    let source = tempfile::tempdir().unwrap();
    let mut inputs = make_input_files(source.path(), 3);
    inputs.push(source.path().join("missing.dat"));
    let archive_path = source.path().join("out.zip");

    let reports = Arc::new(Mutex::new(Vec::<f32>::new()));
    let sink = Arc::clone(&reports);
    Pipeline::new(PackOptions::default())
        .with_progress(move |pct| sink.lock().unwrap().push(pct))
        .run(&inputs, &archive_path)
        .unwrap();

    assert_eq!(*reports.lock().unwrap().last().unwrap(), 100.0);
}

#[test]
fn repeated_runs_yield_identical_entry_sets() {
    let source = tempfile::tempdir().unwrap();
    let inputs = make_input_files(source.path(), 10);
    let pipeline = Pipeline::new(PackOptions::default());

    let mut snapshots = Vec::new();
    for run in 0..3 {
        let archive_path = source.path().join(format!("out_{run}.zip"));
        pipeline.run(&inputs, &archive_path).unwrap();

        let mut entries = read_entries(&archive_path);
        entries.sort();
        snapshots.push(entries);
    }

    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(snapshots[1], snapshots[2]);
}

#[test]
fn single_worker_thread_still_drains_everything() {
    let source = tempfile::tempdir().unwrap();
    let inputs = make_input_files(source.path(), 5);
    let archive_path = source.path().join("out.zip");

    let report = Pipeline::new(PackOptions {
        level: 1,
        threads: 1,
    })
    .run(&inputs, &archive_path)
    .unwrap();

    assert_eq!(report.entries_written, 5);
}

#[test]
fn unwritable_output_fails_before_spawning() {
    let source = tempfile::tempdir().unwrap();
    let inputs = make_input_files(source.path(), 2);
    let bogus = source.path().join("no_such_dir").join("out.zip");

    let calls = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&calls);
    let err = Pipeline::new(PackOptions::default())
        .with_progress(move |_| *sink.lock().unwrap() += 1)
        .run(&inputs, &bogus)
        .unwrap_err();

    assert!(matches!(err, ArchiveError::ArchiveCreate { .. }));
    assert!(!bogus.exists());
    assert_eq!(*calls.lock().unwrap(), 0, "no worker ever ran");
}

#[test]
fn empty_input_file_gets_an_entry() {
    let source = tempfile::tempdir().unwrap();
    let empty = source.path().join("empty.bin");
    fs::write(&empty, b"").unwrap();
    let archive_path = source.path().join("out.zip");

    Pipeline::new(PackOptions::default())
        .run(&[empty], &archive_path)
        .unwrap();

    let entries = read_entries(&archive_path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "empty.bin");
    assert_eq!(inflate(&entries[0].1), Vec::<u8>::new());
}

#[test]
fn duplicate_base_names_produce_duplicate_entries() {
    let source = tempfile::tempdir().unwrap();
    let dir_a = source.path().join("a");
    let dir_b = source.path().join("b");
    fs::create_dir(&dir_a).unwrap();
    fs::create_dir(&dir_b).unwrap();
    let first = dir_a.join("same.txt");
    let second = dir_b.join("same.txt");
    fs::write(&first, "from a").unwrap();
    fs::write(&second, "from b").unwrap();
    let archive_path = source.path().join("out.zip");

    let report = Pipeline::new(PackOptions::default())
        .run(&[first, second], &archive_path)
        .unwrap();
    assert_eq!(report.entries_written, 2);

    let entries = read_entries(&archive_path);
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|(name, _)| name == "same.txt"));

    let mut bodies: Vec<Vec<u8>> = entries.iter().map(|(_, p)| inflate(p)).collect();
    bodies.sort();
    assert_eq!(bodies, vec![b"from a".to_vec(), b"from b".to_vec()]);
}

#[test]
fn one_pipeline_value_supports_concurrent_runs() {
    let source = tempfile::tempdir().unwrap();
    let inputs = make_input_files(source.path(), 6);
    let pipeline = Arc::new(Pipeline::new(PackOptions::default()));

    let mut handles = Vec::new();
    for run in 0..4 {
        let pipeline = Arc::clone(&pipeline);
        let inputs = inputs.clone();
        let archive_path = source.path().join(format!("parallel_{run}.zip"));
        handles.push(std::thread::spawn(move || {
            let report = pipeline.run(&inputs, &archive_path).unwrap();
            assert_eq!(report.entries_written, 6);
            archive_path
        }));
    }

    let mut baseline: Option<Vec<(String, Vec<u8>)>> = None;
    for handle in handles {
        let path = handle.join().unwrap();
        let mut entries = read_entries(&path);
        entries.sort();
        match &baseline {
            None => baseline = Some(entries),
            Some(expected) => assert_eq!(&entries, expected),
        }
    }
}
