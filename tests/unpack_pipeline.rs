mod common;

use protein_pipeline::{PipelineError, UnpackConfig, unpack};
use tempfile::tempdir;

use common::{RAW_HEADER, memory_client, object_text, write_file};

#[test]
fn combined_table_has_every_qualifying_row() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write_file(root, "train/data-0.csv", "A,PF1,a,A,F1\nB,PF1,b,B,F1\n");
    write_file(root, "train/data-00001-of-00002", "C,PF2,c,C,F2\n");
    write_file(root, "test/split.csv", "D,PF3,d,D,F3\n");
    write_file(root, "dev/data-0", "E,PF4,e,E,F4\nF,PF4,f,F,F4\n");
    write_file(root, "dev/LICENSE", "not data\n");

    let client = memory_client(&["staging"]);
    let summary = unpack(
        &client,
        &UnpackConfig::new(root, "staging", "combined.csv"),
    )
    .unwrap();
    assert_eq!(summary.files, 4);
    assert_eq!(summary.rows, 6);

    let text = object_text(&client, "staging", "combined.csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], RAW_HEADER);
    assert_eq!(lines.len(), 7);
    let first_fields: Vec<&str> = lines[1..]
        .iter()
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(first_fields, vec!["A", "B", "C", "D", "E", "F"]);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    for idx in (0..12).rev() {
        write_file(
            root,
            &format!("train/data-{idx:02}"),
            &format!("SEQ{idx},PF{idx},n{idx},S-{idx},F{idx}\n"),
        );
    }
    write_file(root, "test/b.csv", "X,PFX,x,X,FX\n");
    write_file(root, "test/a.csv", "Y,PFY,y,Y,FY\n");

    let client = memory_client(&["staging"]);
    unpack(&client, &UnpackConfig::new(root, "staging", "first.csv")).unwrap();
    unpack(&client, &UnpackConfig::new(root, "staging", "second.csv")).unwrap();

    let first = client.get_object("staging", "first.csv").unwrap();
    let second = client.get_object("staging", "second.csv").unwrap();
    assert_eq!(first, second);

    let text = String::from_utf8(first.to_vec()).unwrap();
    assert!(text.lines().nth(1).unwrap().starts_with("SEQ0,"));
    assert!(text.lines().nth(13).unwrap().starts_with("Y,"));
}

#[test]
fn missing_input_dir_is_filesystem_error() {
    let temp = tempdir().unwrap();
    let client = memory_client(&["staging"]);
    let err = unpack(
        &client,
        &UnpackConfig::new(temp.path().join("nope"), "staging", "combined.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Filesystem { .. }));
}

#[test]
fn empty_input_dir_is_empty_input_error() {
    let temp = tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("train")).unwrap();
    let client = memory_client(&["staging"]);
    let err = unpack(
        &client,
        &UnpackConfig::new(temp.path(), "staging", "combined.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput(_)));
    assert!(client.get_object("staging", "combined.csv").is_err());
}

#[test]
fn upload_to_missing_bucket_is_store_error() {
    let temp = tempdir().unwrap();
    write_file(temp.path(), "train/a.csv", "A,P,a,A,F\n");
    let client = memory_client(&["staging"]);
    let err = unpack(
        &client,
        &UnpackConfig::new(temp.path(), "raw", "combined.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::StoreAccess { ref bucket, .. } if bucket == "raw"));
}
