#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use protein_pipeline::{
    InMemoryBucketProvider, ObjectStoreClient, PipelineError, SequenceTokenizer, VocabTokenizer,
};

pub const RAW_HEADER: &str = "sequence,family_accession,sequence_name,aligned_sequence,family_id";

/// Vocabulary mapping `M→5, S→6, E→7, Q→8` with `<pad>` at id 0 and no special tokens.
pub const AMINO_VOCAB: [&str; 9] = ["<pad>", "<unk>", "A", "C", "D", "M", "S", "E", "Q"];

pub fn write_file(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

pub fn memory_client(buckets: &[&str]) -> ObjectStoreClient {
    let provider = InMemoryBucketProvider::with_buckets(buckets.iter().copied());
    ObjectStoreClient::new(Arc::new(provider)).unwrap()
}

pub fn amino_tokenizer(max_length: usize) -> Result<Box<dyn SequenceTokenizer>, PipelineError> {
    Ok(Box::new(VocabTokenizer::new(AMINO_VOCAB, max_length)?))
}

pub fn object_text(client: &ObjectStoreClient, bucket: &str, key: &str) -> String {
    let bytes = client.get_object(bucket, key).unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
