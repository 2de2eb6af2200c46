mod common;

use protein_pipeline::{CurateConfig, UnpackConfig, curate_with_tokenizer, unpack};
use tempfile::tempdir;

use common::{RAW_HEADER, amino_tokenizer, memory_client, object_text, write_file};

#[test]
fn single_row_flows_from_raw_files_to_curated_tokens() {
    let temp = tempdir().unwrap();
    write_file(temp.path(), "train/data-0.csv", "MSEQ,PF001,seq1,M-S-E-Q,FAM1\n");

    let client = memory_client(&["staging", "curated"]);
    unpack(
        &client,
        &UnpackConfig::new(temp.path(), "staging", "combined.csv"),
    )
    .unwrap();

    let combined = object_text(&client, "staging", "combined.csv");
    assert_eq!(
        combined,
        format!("{RAW_HEADER}\nMSEQ,PF001,seq1,M-S-E-Q,FAM1\n")
    );

    let config = CurateConfig::new("staging", "curated", "combined.csv", "curated.csv");
    curate_with_tokenizer(&client, &config, |cfg| amino_tokenizer(cfg.max_length)).unwrap();

    let curated = object_text(&client, "curated", "curated.csv");
    let mut lines = curated.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    let row: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert!(lines.next().is_none());

    assert_eq!(header.len(), 4 + 1024);
    assert_eq!(
        header[..4],
        ["family_accession", "sequence_name", "aligned_sequence", "family_id"]
    );
    assert_eq!(row[..4], ["PF001", "seq1", "M-S-E-Q", "FAM1"]);
    assert_eq!(row[4..8], ["5", "6", "7", "8"]);
    assert!(row[8..].iter().all(|cell| *cell == "0"));
    assert_eq!(row.len(), 1028);
}

#[test]
fn local_store_root_backs_both_stages() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("input");
    let buckets = temp.path().join("buckets");
    write_file(&input, "dev/data-1", "QE,PF9,s9,Q-E,FAM9\n");
    std::fs::create_dir_all(buckets.join("staging")).unwrap();
    std::fs::create_dir_all(buckets.join("curated")).unwrap();

    let store = protein_pipeline::StoreConfig::default().with_local_root(&buckets);
    let client = protein_pipeline::ObjectStoreClient::from_config(&store).unwrap();
    unpack(&client, &UnpackConfig::new(&input, "staging", "combined.csv")).unwrap();
    assert!(buckets.join("staging/combined.csv").is_file());

    let config =
        CurateConfig::new("staging", "curated", "combined.csv", "tokens.csv").with_max_length(4);
    let summary =
        curate_with_tokenizer(&client, &config, |cfg| amino_tokenizer(cfg.max_length)).unwrap();
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.columns, 8);

    let curated = std::fs::read_to_string(buckets.join("curated/tokens.csv")).unwrap();
    assert_eq!(
        curated,
        "family_accession,sequence_name,aligned_sequence,family_id,token_0,token_1,token_2,token_3\n\
         PF9,s9,Q-E,FAM9,8,7,0,0\n"
    );
}
