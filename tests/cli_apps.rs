mod common;

use std::fs;
use std::path::Path;

use protein_pipeline::apps::{run_curate, run_unpack};
use tempfile::tempdir;

use common::{AMINO_VOCAB, RAW_HEADER, write_file};

fn args(flags: &[&str]) -> impl Iterator<Item = String> {
    flags
        .iter()
        .map(|flag| flag.to_string())
        .collect::<Vec<_>>()
        .into_iter()
}

fn setup(root: &Path) {
    write_file(root, "input/train/data-0.csv", "MSEQ,PF001,seq1,M-S-E-Q,FAM1\n");
    fs::create_dir_all(root.join("buckets/staging")).unwrap();
    fs::create_dir_all(root.join("buckets/curated")).unwrap();
    write_file(root, "vocab.txt", &(AMINO_VOCAB.join("\n") + "\n"));
}

fn curate_args<'a>(root: &'a str, vocab: &'a str, input_file: &'a str) -> Vec<&'a str> {
    vec![
        "--bucket_staging",
        "staging",
        "--bucket_curated",
        "curated",
        "--input_file",
        input_file,
        "--output_file",
        "tokens.csv",
        "--tokenizer_file",
        vocab,
        "--max_length",
        "4",
        "--local_store_root",
        root,
    ]
}

#[test]
fn both_jobs_run_from_command_line_flags() {
    let temp = tempdir().unwrap();
    setup(temp.path());
    let input = temp.path().join("input");
    let buckets = temp.path().join("buckets");
    let vocab = temp.path().join("vocab.txt");

    run_unpack(args(&[
        "--input_dir",
        input.to_str().unwrap(),
        "--bucket_name",
        "staging",
        "--output_file_name",
        "combined.csv",
        "--local_store_root",
        buckets.to_str().unwrap(),
    ]))
    .unwrap();

    let combined = fs::read_to_string(buckets.join("staging/combined.csv")).unwrap();
    assert_eq!(combined, format!("{RAW_HEADER}\nMSEQ,PF001,seq1,M-S-E-Q,FAM1\n"));

    run_curate(args(&curate_args(
        buckets.to_str().unwrap(),
        vocab.to_str().unwrap(),
        "combined.csv",
    )))
    .unwrap();

    let curated = fs::read_to_string(buckets.join("curated/tokens.csv")).unwrap();
    assert_eq!(
        curated,
        "family_accession,sequence_name,aligned_sequence,family_id,token_0,token_1,token_2,token_3\n\
         PF001,seq1,M-S-E-Q,FAM1,5,6,7,8\n"
    );
}

#[test]
fn curate_command_fails_without_sequence_column() {
    let temp = tempdir().unwrap();
    setup(temp.path());
    write_file(temp.path(), "buckets/staging/bad.csv", "sequence_name,family_id\nseq1,FAM1\n");
    let buckets = temp.path().join("buckets");
    let vocab = temp.path().join("vocab.txt");

    let result = run_curate(args(&curate_args(
        buckets.to_str().unwrap(),
        vocab.to_str().unwrap(),
        "bad.csv",
    )));
    assert!(result.is_err());
    assert!(!buckets.join("curated/tokens.csv").exists());
}

#[test]
fn help_flag_exits_cleanly() {
    assert!(run_unpack(args(&["--help"])).is_ok());
    assert!(run_curate(args(&["--help"])).is_ok());
}
