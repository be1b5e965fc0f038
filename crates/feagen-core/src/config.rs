//! Writer configuration from text and environment
//!
//! Writers can be requested by spec strings such as
//! `kern(mode=append, quantization=5)` or `mark(features=mkmk)`. Keywords
//! are matched case-insensitively with underscores ignored, so
//! `ignoreMarks` and `ignore_marks` are the same option. Every keyword
//! must be consumed by the writer it belongs to; leftovers are a
//! configuration error.
//!
//! # Environment Variable
//!
//! `FEAGEN_MODE=append` changes the default merge mode used when a writer
//! spec does not set one:
//!
//! ```bash
//! FEAGEN_MODE=append feagen generate font.json
//! ```

use crate::error::{FeagenError, Result};
use crate::types::{FeatureTag, Mode};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::OnceLock;

static ENV_MODE: OnceLock<Mode> = OnceLock::new();

/// Default merge mode, read from `FEAGEN_MODE` on first call
pub fn default_mode() -> Mode {
    *ENV_MODE.get_or_init(|| match std::env::var("FEAGEN_MODE") {
        Ok(val) => match val.parse::<Mode>() {
            Ok(mode) => {
                log::info!("Default merge mode '{mode}' set via FEAGEN_MODE env var");
                mode
            },
            Err(e) => {
                log::warn!("Ignoring FEAGEN_MODE: {e}");
                Mode::Skip
            },
        },
        Err(_) => Mode::Skip,
    })
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A parsed writer request: name plus keyword options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterSpec {
    pub name: String,
    options: BTreeMap<String, (String, String)>,
}

impl FromStr for WriterSpec {
    type Err = FeagenError;

    fn from_str(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (name, args) = match spec.find('(') {
            Some(open) => {
                let Some(body) = spec[open + 1..].strip_suffix(')') else {
                    return Err(FeagenError::Config(format!(
                        "unbalanced parentheses in writer spec '{spec}'"
                    )));
                };
                (&spec[..open], body)
            },
            None => (spec, ""),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(FeagenError::Config(format!("missing writer name in '{spec}'")));
        }

        let mut options = BTreeMap::new();
        for item in args.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((key, value)) = item.split_once('=') else {
                return Err(FeagenError::Config(format!(
                    "expected keyword=value, got '{item}'"
                )));
            };
            let normalized = normalize_key(key);
            if options
                .insert(normalized, (key.trim().to_string(), value.trim().to_string()))
                .is_some()
            {
                return Err(FeagenError::Config(format!("duplicate keyword '{}'", key.trim())));
            }
        }

        Ok(Self {
            name: name.to_ascii_lowercase(),
            options,
        })
    }
}

impl WriterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Set an option unless the spec already carries it
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        self.options
            .entry(normalize_key(key))
            .or_insert_with(|| (key.to_string(), value.into()));
    }

    fn take(&mut self, key: &str) -> Option<(String, String)> {
        self.options.remove(&normalize_key(key))
    }

    pub fn take_bool(&mut self, key: &str) -> Result<Option<bool>> {
        self.take(key)
            .map(|(raw, value)| match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(FeagenError::Config(format!(
                    "option '{raw}' expects a boolean, got '{value}'"
                ))),
            })
            .transpose()
    }

    pub fn take_u32(&mut self, key: &str) -> Result<Option<u32>> {
        self.take(key)
            .map(|(raw, value)| {
                value.parse::<u32>().map_err(|_| {
                    FeagenError::Config(format!(
                        "option '{raw}' expects a non-negative integer, got '{value}'"
                    ))
                })
            })
            .transpose()
    }

    pub fn take_mode(&mut self) -> Result<Option<Mode>> {
        self.take("mode").map(|(_, value)| value.parse()).transpose()
    }

    /// `features=kern|dist`; an empty list is an error
    pub fn take_features(&mut self) -> Result<Option<BTreeSet<FeatureTag>>> {
        let Some((_, value)) = self.take("features") else {
            return Ok(None);
        };
        let tags = value
            .split(['|', ' '])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(FeatureTag::from_str)
            .collect::<Result<BTreeSet<_>>>()?;
        if tags.is_empty() {
            return Err(FeagenError::EmptyFeatureSet);
        }
        Ok(Some(tags))
    }

    /// Fail on any keyword the writer did not consume
    pub fn finish(self) -> Result<()> {
        match self.options.values().next() {
            Some((raw, _)) => Err(FeagenError::Config(format!(
                "unsupported keyword '{raw}' for writer '{}'",
                self.name
            ))),
            None => Ok(()),
        }
    }
}
