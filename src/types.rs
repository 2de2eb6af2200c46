/// Object-store bucket name.
/// Examples: `raw`, `staging`, `curated`
pub type BucketName = String;
/// Object key inside a bucket.
/// Examples: `combined.csv`, `curated/pfam_tokens.csv`
pub type ObjectKey = String;
/// Pretrained tokenizer identifier resolved through the model hub.
/// Example: `facebook/esm2_t6_8M_UR50D`
pub type ModelId = String;
/// Integer index into a tokenizer vocabulary.
pub type TokenId = u32;
/// Table column name.
/// Examples: `sequence`, `family_accession`, `token_17`
pub type ColumnName = String;
/// Single CSV cell value.
/// Examples: `MSEQ`, `PF001.13`, `M-S-E-Q`
pub type CellValue = String;
