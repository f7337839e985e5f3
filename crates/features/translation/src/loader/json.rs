use super::{TranslationLoader, unsupported};
use crate::catalogue::{MessageCatalogue, Messages};
use crate::error::{TranslationError, TranslationErrorExt};
use crate::resource::Resource;
use serde_json::{Map, Value};
use std::fs;

/// Loads JSON files. Nested objects are flattened into dotted ids:
/// `{"user": {"name": "Name"}}` defines `user.name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileLoader;

impl TranslationLoader for JsonFileLoader {
    fn load(
        &self,
        resource: &Resource,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, TranslationError> {
        let Some(path) = resource.as_path() else {
            return Err(unsupported("JsonFileLoader", resource));
        };

        let raw = fs::read(path).context(format!("Failed to read {}", path.display()))?;
        let value: Value =
            serde_json::from_slice(&raw).context(format!("Failed to parse {}", path.display()))?;
        let Value::Object(map) = value else {
            return Err(TranslationError::InvalidResource {
                message: format!("{} must contain a JSON object", path.display()).into(),
                context: None,
            });
        };

        let mut messages = Messages::new();
        flatten(&map, "", &mut messages).map_err(|id| TranslationError::InvalidResource {
            message: format!("unsupported value for '{id}' in {}", path.display()).into(),
            context: None,
        })?;

        let mut catalogue = MessageCatalogue::new(locale);
        catalogue.add(messages, domain);
        Ok(catalogue)
    }
}

/// Returns the offending id on arrays.
fn flatten(map: &Map<String, Value>, prefix: &str, out: &mut Messages) -> Result<(), String> {
    for (key, value) in map {
        let id = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match value {
            Value::Object(nested) => flatten(nested, &id, out)?,
            Value::String(text) => {
                out.insert(id, text.clone());
            },
            Value::Number(n) => {
                out.insert(id, n.to_string());
            },
            Value::Bool(b) => {
                out.insert(id, b.to_string());
            },
            Value::Null => {},
            Value::Array(_) => return Err(id),
        }
    }
    Ok(())
}
