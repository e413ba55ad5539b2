//! In-memory evidence store.
//!
//! Ranks fragments by how many distinct query terms they contain. Useful for
//! offline runs and tests where no vector database is available. Ties keep
//! the order the fragments were loaded in.

use async_trait::async_trait;
use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use std::collections::HashSet;
use std::path::Path;

use crate::domain::errors::StoreError;
use crate::domain::models::Fragment;
use crate::domain::ports::EvidenceStore;

/// JSON fragment file layout: either a bare list or a `fragments:` mapping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FragmentFile {
    List(Vec<Fragment>),
    Mapping { fragments: Vec<Fragment> },
}

impl FragmentFile {
    fn into_fragments(self) -> Vec<Fragment> {
        match self {
            Self::List(fragments) | Self::Mapping { fragments } => fragments,
        }
    }
}

const QUOTING_HINT: &str = "quote or fold fragments that contain \": \"";

/// YAML fragments, same layouts as JSON.
///
/// An unquoted `- Section 5: Conditions ...` item is a one-entry mapping in
/// YAML; it is read back as `key: value` text.
fn yaml_fragments(contents: &str) -> Result<Vec<Fragment>, String> {
    let value: YamlValue =
        serde_yaml::from_str(contents).map_err(|e| format!("{e} ({QUOTING_HINT})"))?;

    let items = match value {
        YamlValue::Sequence(items) => items,
        YamlValue::Mapping(map) => match map.get("fragments") {
            Some(YamlValue::Sequence(items)) => items.clone(),
            _ => return Err("expected a `fragments:` list".to_string()),
        },
        YamlValue::Null => Vec::new(),
        _ => return Err("expected a list of fragments".to_string()),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            yaml_fragment(item)
                .ok_or_else(|| format!("fragment {index} is not plain text ({QUOTING_HINT})"))
        })
        .collect()
}

fn yaml_fragment(item: YamlValue) -> Option<Fragment> {
    match item {
        YamlValue::Mapping(map) if map.len() == 1 => {
            let (key, value) = map.into_iter().next()?;
            Some(format!("{}: {}", yaml_scalar(&key)?, yaml_scalar(&value)?))
        }
        other => yaml_scalar(&other),
    }
}

fn yaml_scalar(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(text) => Some(text.clone()),
        YamlValue::Number(number) => Some(number.to_string()),
        YamlValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub struct InMemoryEvidenceStore {
    fragments: Vec<Fragment>,
}

impl InMemoryEvidenceStore {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Load fragments from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Load(format!("{}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let fragments = if is_json {
            serde_json::from_str::<FragmentFile>(&contents)
                .map(FragmentFile::into_fragments)
                .map_err(|e| e.to_string())
        } else {
            yaml_fragments(&contents)
        }
        .map_err(|e| StoreError::Load(format!("{}: {e}", path.display())))?;

        Ok(Self::new(fragments))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn score(query_terms: &HashSet<String>, fragment: &str) -> usize {
        let fragment_terms = terms(fragment);
        query_terms.intersection(&fragment_terms).count()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<Fragment>, StoreError> {
        let query_terms = terms(query);

        let mut scored: Vec<(usize, &Fragment)> = self
            .fragments
            .iter()
            .map(|fragment| (Self::score(&query_terms, fragment), fragment))
            .filter(|(score, _)| *score > 0)
            .collect();

        // sort_by is stable, so equal scores keep load order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, fragment)| fragment.clone())
            .collect())
    }

    async fn is_available(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
