use crate::splits::SplitFolder;

/// Column names shared by the raw, staging, and curated tables.
pub mod schema {
    /// Column holding the raw biological sequence.
    pub const SEQUENCE_COLUMN: &str = "sequence";
    /// Fixed positional schema imposed on headerless raw files.
    pub const RAW_COLUMNS: [&str; 5] = [
        SEQUENCE_COLUMN,
        "family_accession",
        "sequence_name",
        "aligned_sequence",
        "family_id",
    ];
    /// Prefix for generated token columns (`token_0`, `token_1`, ...).
    pub const TOKEN_COLUMN_PREFIX: &str = "token_";
}

/// Constants used by the unpacker directory scan.
pub mod unpack {
    use super::SplitFolder;

    /// Canonical subfolder processing order.
    pub const SPLIT_ORDER: [SplitFolder; 3] =
        [SplitFolder::Train, SplitFolder::Test, SplitFolder::Dev];
    /// Extension that admits a file into the scan.
    pub const CSV_EXTENSION: &str = ".csv";
    /// Filename fragment that admits a file into the scan regardless of extension.
    pub const DATA_FILE_MARKER: &str = "data-";
}

/// Constants used by the curator.
pub mod curate {
    /// Fixed number of token columns emitted per row.
    pub const MAX_TOKEN_LENGTH: usize = 1024;
    /// Tokenizer used when no model is given on the command line.
    pub const DEFAULT_TOKENIZER_MODEL: &str = "facebook/esm2_t6_8M_UR50D";
    /// Padding id used when a tokenizer does not declare one.
    pub const FALLBACK_PAD_ID: u32 = 0;
}

/// Constants used by tokenizer resolution.
pub mod tokenizer {
    /// Serialized fast-tokenizer file name on the hub.
    pub const TOKENIZER_JSON_FILE: &str = "tokenizer.json";
    /// Plain vocabulary file name on the hub (one token per line).
    pub const VOCAB_FILE: &str = "vocab.txt";
    /// Accepted spellings of the sequence-start token.
    pub const CLS_TOKENS: [&str; 3] = ["<cls>", "[CLS]", "<s>"];
    /// Accepted spellings of the sequence-end token.
    pub const EOS_TOKENS: [&str; 3] = ["<eos>", "[SEP]", "</s>"];
    /// Accepted spellings of the padding token.
    pub const PAD_TOKENS: [&str; 3] = ["<pad>", "[PAD]", "<|pad|>"];
    /// Accepted spellings of the unknown token.
    pub const UNK_TOKENS: [&str; 3] = ["<unk>", "[UNK]", "<|unk|>"];
}

/// Constants used by object-store configuration.
pub mod store {
    /// Endpoint of the local store emulator used during development.
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:4566";
    /// Region passed to the S3 client when none is configured.
    pub const DEFAULT_REGION: &str = "us-east-1";
    /// Environment variable consulted for an endpoint override.
    pub const ENDPOINT_ENV: &str = "AWS_ENDPOINT_URL";
    /// Suffix given to staged temporary files.
    pub const TEMPFILE_SUFFIX: &str = ".csv";
}
