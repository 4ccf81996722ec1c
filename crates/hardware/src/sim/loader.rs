//! Workload loading.
//!
//! This module reads the plain-text file formats a workload ships as:
//! 1. **Memory images** (`<case>.exe`, `<case>.data`): one 32-bit hex word
//!    per line, little-endian RV32I layout, leading zeros optional, no
//!    `0x`; `//` starts a comment (program images are usually annotated
//!    with a disassembly).
//! 2. **Offsets** (`<case>.config`): a single line
//!    `offset: <hex>, data_offset: <hex>`.
//! 3. **Preloader contract:** `workload.init` receives the absolute value
//!    of `data_offset` as a bare hex string.

use crate::common::SimError;
use std::fs;
use std::path::{Path, PathBuf};

/// Parses a memory image from text.
///
/// `path` is only used for error reporting.
pub fn parse_hex_words(text: &str, path: &str) -> Result<Vec<u32>, SimError> {
    let mut words = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split("//").next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let word = u32::from_str_radix(line, 16).map_err(|_| SimError::MalformedWord {
            path: path.to_string(),
            line: i + 1,
            word: line.to_string(),
        })?;
        words.push(word);
    }
    Ok(words)
}

/// Reads and parses a memory image file.
pub fn load_hex_words(path: &Path) -> Result<Vec<u32>, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::WorkloadRead {
        path: path.display().to_string(),
        source,
    })?;
    parse_hex_words(&text, &path.display().to_string())
}

/// The offsets a workload declares for its program and data images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Program image offset.
    pub offset: i64,
    /// Data image offset; may be negative.
    pub data_offset: i64,
}

impl WorkloadConfig {
    /// Parses the single-line mapping `offset: <hex>, data_offset: <hex>`.
    ///
    /// Values may carry an optional sign and an optional `0x` prefix.
    pub fn parse(line: &str) -> Result<Self, SimError> {
        let err = |reason: String| SimError::MalformedConfig {
            line: line.to_string(),
            reason,
        };

        let mut offset = None;
        let mut data_offset = None;
        for part in line.split(',') {
            let Some((key, value)) = part.split_once(':') else {
                return Err(err(format!("missing `:` in `{}`", part.trim())));
            };
            let value = parse_hex_int(value.trim())
                .ok_or_else(|| err(format!("bad hex integer `{}`", value.trim())))?;
            match key.trim() {
                "offset" => offset = Some(value),
                "data_offset" => data_offset = Some(value),
                other => return Err(err(format!("unknown key `{other}`"))),
            }
        }
        Ok(Self {
            offset: offset.ok_or_else(|| err("missing `offset`".to_string()))?,
            data_offset: data_offset.ok_or_else(|| err("missing `data_offset`".to_string()))?,
        })
    }

    /// Reads the first non-empty line of a config file and parses it.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::WorkloadRead {
            path: path.display().to_string(),
            source,
        })?;
        let line = text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        Self::parse(line)
    }
}

fn parse_hex_int(s: &str) -> Option<i64> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    let value = i64::from_str_radix(digits, 16).ok()?;
    Some(if negative { -value } else { value })
}

/// Writes `workload.init` for the memory preloader: the absolute value of
/// `data_offset` as a bare hex string. Returns the path written.
pub fn write_init_file(dir: &Path, config: &WorkloadConfig) -> Result<PathBuf, SimError> {
    let path = dir.join("workload.init");
    fs::write(&path, format!("{:x}", config.data_offset.unsigned_abs())).map_err(|source| {
        SimError::WorkloadWrite {
            path: path.display().to_string(),
            source,
        }
    })?;
    Ok(path)
}

/// One fully loaded workload.
#[derive(Debug, Clone)]
pub struct Workload {
    /// Program image words (`<case>.exe`).
    pub program: Vec<u32>,
    /// Data image words (`<case>.data`).
    pub data: Vec<u32>,
    /// Declared offsets, when a `<case>.config` accompanies the images.
    pub config: Option<WorkloadConfig>,
}

impl Workload {
    /// Loads a workload from its files. The data and config files are
    /// optional; a missing data image leaves data memory zeroed.
    pub fn load(
        exe: &Path,
        data: Option<&Path>,
        config: Option<&Path>,
    ) -> Result<Self, SimError> {
        Ok(Self {
            program: load_hex_words(exe)?,
            data: match data {
                Some(path) => load_hex_words(path)?,
                None => Vec::new(),
            },
            config: match config {
                Some(path) => Some(WorkloadConfig::load(path)?),
                None => None,
            },
        })
    }
}
