//! Sequence tokenization to fixed-length id vectors.
//!
//! Two tokenizer families are supported:
//! - [`HubTokenizer`] wraps a serialized `tokenizer.json` (`tokenizers` crate).
//! - [`VocabTokenizer`] reads a plain `vocab.txt` (one token per line, id = line index)
//!   and splits sequences greedily into vocabulary entries. Protein language models such
//!   as ESM-2 publish only this file.
//!
//! Both produce the natural tokenization (special tokens included, body truncated so the
//! total fits `max_length`). [`encode_fixed`] then right-pads with the tokenizer's pad id.

use std::collections::HashMap;
use std::path::Path;

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use crate::constants::curate::FALLBACK_PAD_ID;
use crate::constants::tokenizer::{
    CLS_TOKENS, EOS_TOKENS, PAD_TOKENS, TOKENIZER_JSON_FILE, UNK_TOKENS, VOCAB_FILE,
};
use crate::errors::PipelineError;
use crate::types::TokenId;

/// A tokenizer bound to a maximum output length.
pub trait SequenceTokenizer {
    /// Token ids for `text`, special tokens included, never longer than `max_length()`.
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, PipelineError>;
    /// Id used to right-pad sequences.
    fn pad_id(&self) -> TokenId;
    /// Fixed output length.
    fn max_length(&self) -> usize;
}

/// Exactly `max_length()` ids: truncated natural tokenization followed by padding.
pub fn encode_fixed(
    tokenizer: &dyn SequenceTokenizer,
    text: &str,
) -> Result<Vec<TokenId>, PipelineError> {
    let max_length = tokenizer.max_length();
    let mut ids = tokenizer.encode(text)?;
    ids.truncate(max_length);
    ids.resize(max_length, tokenizer.pad_id());
    Ok(ids)
}

/// `tokenizers`-backed tokenizer loaded from a `tokenizer.json`.
pub struct HubTokenizer {
    inner: Tokenizer,
    pad_id: TokenId,
    max_length: usize,
}

impl HubTokenizer {
    /// Configure `tokenizer` to truncate at `max_length`; padding is applied by [`encode_fixed`].
    pub fn new(mut tokenizer: Tokenizer, max_length: usize) -> Result<Self, PipelineError> {
        let pad_id = tokenizer
            .get_padding()
            .map(|padding| padding.pad_id)
            .or_else(|| {
                PAD_TOKENS
                    .iter()
                    .find_map(|token| tokenizer.token_to_id(token))
            })
            .unwrap_or_else(|| {
                warn!(
                    "[protein_pipeline:tokenizer] no padding token declared; padding with id {FALLBACK_PAD_ID}"
                );
                FALLBACK_PAD_ID
            });
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|err| {
                PipelineError::Configuration(format!("invalid truncation settings: {err}"))
            })?;
        tokenizer.with_padding(None);
        Ok(Self {
            inner: tokenizer,
            pad_id,
            max_length,
        })
    }

    /// Load a serialized tokenizer file.
    pub fn from_file(path: &Path, max_length: usize) -> Result<Self, PipelineError> {
        let tokenizer = Tokenizer::from_file(path).map_err(|err| PipelineError::TokenizerLoad {
            model: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::new(tokenizer, max_length)
    }
}

impl SequenceTokenizer for HubTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, PipelineError> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|err| PipelineError::Tokenization(err.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn pad_id(&self) -> TokenId {
        self.pad_id
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Greedy longest-match tokenizer over a plain vocabulary list.
///
/// Whitespace separates words and is never emitted. Each run of characters with no
/// vocabulary match maps to one unknown token, or fails when the vocabulary has none.
/// A `<cls>`-style token is prepended and an `<eos>`-style token appended when the
/// vocabulary defines them.
pub struct VocabTokenizer {
    vocab: HashMap<String, TokenId>,
    longest_token_chars: usize,
    cls_id: Option<TokenId>,
    eos_id: Option<TokenId>,
    unk_id: Option<TokenId>,
    pad_id: TokenId,
    max_length: usize,
}

impl VocabTokenizer {
    /// Build from tokens in id order. Duplicate tokens keep their first id.
    pub fn new<I, S>(tokens: I, max_length: usize) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = HashMap::new();
        for (idx, token) in tokens.into_iter().enumerate() {
            let id = TokenId::try_from(idx).map_err(|_| {
                PipelineError::Configuration("vocabulary exceeds u32 ids".to_string())
            })?;
            vocab.entry(token.into()).or_insert(id);
        }
        vocab.remove("");
        if vocab.is_empty() {
            return Err(PipelineError::Configuration(
                "vocabulary is empty".to_string(),
            ));
        }
        let lookup = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|token| vocab.get(*token).copied())
        };
        let cls_id = lookup(&CLS_TOKENS);
        let eos_id = lookup(&EOS_TOKENS);
        let unk_id = lookup(&UNK_TOKENS);
        let pad_id = lookup(&PAD_TOKENS).unwrap_or_else(|| {
            warn!(
                "[protein_pipeline:tokenizer] vocabulary has no padding token; padding with id {FALLBACK_PAD_ID}"
            );
            FALLBACK_PAD_ID
        });
        let longest_token_chars = vocab
            .keys()
            .map(|token| token.chars().count())
            .max()
            .unwrap_or(1);
        Ok(Self {
            vocab,
            longest_token_chars,
            cls_id,
            eos_id,
            unk_id,
            pad_id,
            max_length,
        })
    }

    /// Read a `vocab.txt` file.
    pub fn from_file(path: &Path, max_length: usize) -> Result<Self, PipelineError> {
        let text =
            std::fs::read_to_string(path).map_err(|err| PipelineError::filesystem(path, err))?;
        Self::new(text.lines().map(|line| line.trim_end_matches('\r')), max_length)
    }

    fn special_count(&self) -> usize {
        usize::from(self.cls_id.is_some()) + usize::from(self.eos_id.is_some())
    }

    fn encode_body(&self, text: &str, budget: usize) -> Result<Vec<TokenId>, PipelineError> {
        let chars: Vec<char> = text.chars().collect();
        let mut ids = Vec::with_capacity(chars.len().min(budget));
        let mut pos = 0;
        // A run of unmatched characters, bounded by whitespace or a vocabulary match,
        // becomes a single unknown token.
        let mut in_unknown_run = false;
        while pos < chars.len() && ids.len() < budget {
            if chars[pos].is_whitespace() {
                in_unknown_run = false;
                pos += 1;
                continue;
            }
            let widest = self.longest_token_chars.min(chars.len() - pos);
            let matched = (1..=widest).rev().find_map(|width| {
                let candidate: String = chars[pos..pos + width].iter().collect();
                self.vocab.get(&candidate).map(|id| (*id, width))
            });
            match matched {
                Some((id, width)) => {
                    ids.push(id);
                    pos += width;
                    in_unknown_run = false;
                }
                None => {
                    if !in_unknown_run {
                        let unk = self.unk_id.ok_or_else(|| {
                            PipelineError::Tokenization(format!(
                                "character '{}' is not in the vocabulary",
                                chars[pos]
                            ))
                        })?;
                        ids.push(unk);
                        in_unknown_run = true;
                    }
                    pos += 1;
                }
            }
        }
        Ok(ids)
    }
}

impl SequenceTokenizer for VocabTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, PipelineError> {
        let budget = self.max_length.saturating_sub(self.special_count());
        let mut ids = Vec::with_capacity(self.max_length);
        ids.extend(self.cls_id);
        ids.extend(self.encode_body(text, budget)?);
        ids.extend(self.eos_id);
        ids.truncate(self.max_length);
        Ok(ids)
    }

    fn pad_id(&self) -> TokenId {
        self.pad_id
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Resolve `model` through the model hub, preferring `tokenizer.json` over `vocab.txt`.
///
/// Downloads are cached by `hf-hub` (see `HF_HOME`); the first call may hit the network.
pub fn load_pretrained(
    model: &str,
    max_length: usize,
) -> Result<Box<dyn SequenceTokenizer>, PipelineError> {
    let load_error = |reason: String| PipelineError::TokenizerLoad {
        model: model.to_string(),
        reason,
    };
    let api = ApiBuilder::from_env()
        .with_progress(false)
        .build()
        .map_err(|err| load_error(format!("failed building hf-hub client: {err}")))?;
    let repo = api.repo(Repo::new(model.to_string(), RepoType::Model));

    info!("[protein_pipeline:tokenizer] resolving tokenizer for model {model}");
    match repo.get(TOKENIZER_JSON_FILE) {
        Ok(path) => {
            debug!("[protein_pipeline:tokenizer] using {}", path.display());
            let tokenizer = Tokenizer::from_file(&path)
                .map_err(|err| load_error(format!("invalid {TOKENIZER_JSON_FILE}: {err}")))?;
            Ok(Box::new(HubTokenizer::new(tokenizer, max_length)?))
        }
        Err(json_err) => {
            debug!(
                "[protein_pipeline:tokenizer] {TOKENIZER_JSON_FILE} unavailable ({json_err}); trying {VOCAB_FILE}"
            );
            let path = repo.get(VOCAB_FILE).map_err(|err| {
                load_error(format!(
                    "neither {TOKENIZER_JSON_FILE} ({json_err}) nor {VOCAB_FILE} ({err}) could be fetched"
                ))
            })?;
            let tokenizer = VocabTokenizer::from_file(&path, max_length).map_err(|err| {
                load_error(format!("invalid {VOCAB_FILE}: {err}"))
            })?;
            Ok(Box::new(tokenizer))
        }
    }
}

/// Load a local tokenizer: `*.json` as a serialized tokenizer, anything else as a vocabulary.
pub fn load_from_file(
    path: &Path,
    max_length: usize,
) -> Result<Box<dyn SequenceTokenizer>, PipelineError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Ok(Box::new(HubTokenizer::from_file(path, max_length)?))
    } else {
        let tokenizer = VocabTokenizer::from_file(path, max_length).map_err(|err| {
            PipelineError::TokenizerLoad {
                model: path.display().to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(Box::new(tokenizer))
    }
}
