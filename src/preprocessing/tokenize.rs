// src/preprocessing/tokenize.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Text-length measurement for quantile filtering, with an optional on-disk
// cache keyed by tokenizer and a CRC32 of the text column.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::TOKEN_LENGTH_CACHE_PREFIX;
use crate::data_loader::dataset::{Dataset, DatasetError};

/// How a text is turned into a length.
pub enum TokenCounter {
    /// Whitespace-separated words
    Whitespace,
    /// Unicode scalar values
    Chars,
    /// UTF-8 bytes
    Bytes,
    /// Hugging Face tokenizer, loaded from a `tokenizer.json` path or a hub model id.
    Model { name: String, tokenizer: Box<Tokenizer> },
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenCounter::Model { name, .. } => f.debug_struct("Model").field("name", name).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Display for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TokenCounter {
    /// The counters that need no model: `whitespace`, `chars`, `bytes`.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "whitespace" | "words" => Some(TokenCounter::Whitespace),
            "chars" | "characters" => Some(TokenCounter::Chars),
            "bytes" => Some(TokenCounter::Bytes),
            _ => None,
        }
    }

    /// Resolve `tokenizer_name`.
    ///
    /// - a built-in counter name selects that counter
    /// - an existing path is read as a `tokenizer.json`
    /// - anything else is a Hugging Face model id (e.g. "bert-base-uncased")
    pub fn load(name: &str) -> Result<Self, DatasetError> {
        if let Some(counter) = Self::builtin(name) {
            return Ok(counter);
        }
        let path = Path::new(name);
        let loaded = if path.exists() {
            Tokenizer::from_file(path)
        } else {
            Tokenizer::from_pretrained(name, None)
        };
        let tokenizer = loaded.map_err(|e| DatasetError::Tokenizer {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        info!("Loaded tokenizer {name}");
        Ok(TokenCounter::Model {
            name: name.to_string(),
            tokenizer: Box::new(tokenizer),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            TokenCounter::Whitespace => "whitespace",
            TokenCounter::Chars => "chars",
            TokenCounter::Bytes => "bytes",
            TokenCounter::Model { name, .. } => name,
        }
    }

    /// Length of `text`. Model tokenizers count ids including special tokens.
    pub fn count(&self, text: &str) -> Result<usize, DatasetError> {
        match self {
            TokenCounter::Whitespace => Ok(text.split_whitespace().count()),
            TokenCounter::Chars => Ok(text.chars().count()),
            TokenCounter::Bytes => Ok(text.len()),
            TokenCounter::Model { name, tokenizer } => tokenizer
                .encode(text, true)
                .map(|encoding| encoding.get_ids().len())
                .map_err(|e| DatasetError::Tokenizer {
                    name: name.clone(),
                    message: e.to_string(),
                }),
        }
    }

    /// File-name-safe form of the name, used in the cache file name.
    fn cache_key(&self) -> String {
        self.name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect()
    }
}

/// Text of a cell: strings as-is, null as empty, anything else as compact JSON.
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Length of every row's text, in row order.
///
/// With `cache_dir`, lengths are read from / written to
/// `<cache_dir>/token_lengths_<tokenizer>_<crc32>.json`.
pub fn token_lengths(
    dataset: &Dataset,
    text_name: &str,
    counter: &TokenCounter,
    cache_dir: Option<&Path>,
) -> Result<Vec<usize>, DatasetError> {
    let texts: Vec<Cow<'_, str>> = dataset.column(text_name)?.map(text_of).collect();

    let cache_path = cache_dir.map(|dir| cache_file(dir, counter, &texts));
    if let Some(path) = &cache_path {
        if let Some(lengths) = read_cache(path, texts.len()) {
            debug!("token lengths loaded from cache {}", path.display());
            return Ok(lengths);
        }
    }

    let lengths = texts
        .iter()
        .map(|t| counter.count(t))
        .collect::<Result<Vec<usize>, _>>()?;

    if let Some(path) = &cache_path {
        write_cache(path, &lengths)?;
        debug!("token lengths cached at {}", path.display());
    }
    Ok(lengths)
}

fn cache_file(dir: &Path, counter: &TokenCounter, texts: &[Cow<'_, str>]) -> PathBuf {
    let mut hasher = crc32fast::Hasher::new();
    for t in texts {
        hasher.update(t.as_bytes());
        hasher.update(&[0]);
    }
    let crc = hasher.finalize();
    let key = counter.cache_key();
    dir.join(format!("{TOKEN_LENGTH_CACHE_PREFIX}_{key}_{crc:08x}.json"))
}

fn read_cache(path: &Path, expected: usize) -> Option<Vec<usize>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return None,
    };
    match serde_json::from_str::<Vec<usize>>(&raw) {
        Ok(lengths) if lengths.len() == expected => Some(lengths),
        Ok(lengths) => {
            warn!(
                "ignoring cache {}: {} entries for {} rows",
                path.display(),
                lengths.len(),
                expected
            );
            None
        }
        Err(e) => {
            warn!("ignoring unreadable cache {}: {}", path.display(), e);
            None
        }
    }
}

fn write_cache(path: &Path, lengths: &[usize]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }
    let body = serde_json::to_string(lengths).map_err(|e| DatasetError::io(path, e.into()))?;
    fs::write(path, body).map_err(|e| DatasetError::io(path, e))
}
