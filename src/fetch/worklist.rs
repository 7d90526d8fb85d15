use crate::types::{AppError, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const TO_BE_FETCHED: &str = "to_be_fetched";
const FETCHED: &str = "fetched";

/// YAML worklist of URLs still to fetch and URLs already fetched.
///
/// Keys other than the two lists are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worklist {
    pub to_be_fetched: Vec<String>,
    pub fetched: Vec<String>,
    extra: Mapping,
}

/// Entries are kept as text so invalid ones can be reported and dropped later
fn entry_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn take_list(map: &mut Mapping, key: &str) -> Vec<String> {
    match map.remove(key) {
        Some(Value::Sequence(items)) => items.iter().map(entry_text).collect(),
        _ => {
            tracing::warn!(
                "Worklist missing '{}' list or it is not a list. Initializing as empty.",
                key
            );
            Vec::new()
        }
    }
}

impl Worklist {
    pub fn new(to_be_fetched: Vec<String>, fetched: Vec<String>) -> Self {
        Self {
            to_be_fetched,
            fetched,
            extra: Mapping::new(),
        }
    }

    /// Parse worklist YAML. Empty documents yield an empty worklist.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| AppError::InvalidInput(format!("Invalid worklist YAML: {}", e)))?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mut map) => {
                let to_be_fetched = take_list(&mut map, TO_BE_FETCHED);
                let fetched = take_list(&mut map, FETCHED);
                Ok(Self {
                    to_be_fetched,
                    fetched,
                    extra: map,
                })
            }
            _ => Err(AppError::InvalidInput(
                "Worklist YAML must be a mapping".to_string(),
            )),
        }
    }

    /// Load the worklist at `path`, never failing.
    ///
    /// A missing or empty file is (re)written with empty lists. Unreadable or
    /// malformed files are logged and yield an empty worklist.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(
                "Worklist not found at {}. Creating default with empty lists.",
                path.display()
            );
            let worklist = Self::default();
            if let Err(e) = worklist.save(path) {
                tracing::error!("Error saving worklist {}: {}", path.display(), e);
            }
            return worklist;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Error reading worklist {}: {}. Using empty lists.", path.display(), e);
                return Self::default();
            }
        };

        let empty = text.trim().is_empty()
            || serde_yaml::from_str::<Value>(&text)
                .map(|v| v.is_null())
                .unwrap_or(false);
        if empty {
            tracing::warn!("Worklist {} is empty. Using default empty lists.", path.display());
            let worklist = Self::default();
            if let Err(e) = worklist.save(path) {
                tracing::error!("Error saving worklist {}: {}", path.display(), e);
            }
            return worklist;
        }

        match Self::parse(&text) {
            Ok(worklist) => {
                tracing::info!("Worklist loaded successfully from {}", path.display());
                worklist
            }
            Err(e) => {
                tracing::error!("Error parsing worklist {}: {}. Using empty lists.", path.display(), e);
                Self::default()
            }
        }
    }

    /// YAML text with `to_be_fetched` first, `fetched` second, then any
    /// other keys in their original order.
    pub fn to_yaml(&self) -> Result<String> {
        let list = |items: &[String]| {
            Value::Sequence(items.iter().cloned().map(Value::String).collect())
        };

        let mut map = Mapping::new();
        map.insert(TO_BE_FETCHED.into(), list(&self.to_be_fetched));
        map.insert(FETCHED.into(), list(&self.fetched));
        for (k, v) in &self.extra {
            map.insert(k.clone(), v.clone());
        }

        serde_yaml::to_string(&map)
            .map_err(|e| AppError::Internal(format!("Failed to serialize worklist: {}", e)))
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        tracing::debug!("Worklist saved to {}", path.display());
        Ok(())
    }
}
