//! Canonical section configuration endpoints.

use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::api::error::{ApiError, ApiResult};
use crate::content::{ContentKind, Field, SectionConfig, SectionRecord, SectionTitle};

const TEST_PUSH_PATH: &str = "/api/test-websocket";

/// Fields persisted per section-title row.
const ROW_FIELDS: [Field; 5] = [
    Field::Title,
    Field::Subtitle,
    Field::Description,
    Field::MainTitle,
    Field::Emoji,
];

/// Reads and writes the canonical section configuration.
#[derive(Debug, Clone)]
pub struct SectionConfigApi {
    api: ApiClient,
    config_path: String,
}

impl SectionConfigApi {
    pub fn new(api: ApiClient, config_path: impl Into<String>) -> Self {
        Self {
            api,
            config_path: config_path.into(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch and normalize the full configuration.
    pub async fn fetch(&self) -> ApiResult<SectionConfig> {
        let value: Value = self.api.get(&self.config_path).await?;
        SectionConfig::from_response(&value).ok_or_else(|| {
            ApiError::Decode(format!(
                "unexpected section config shape: {}",
                value_kind(&value)
            ))
        })
    }

    /// Persist one section: update the stored row when it exists, create it
    /// on 404. Empty submitted values keep what is stored.
    pub async fn save_section(&self, name: &str, record: &SectionRecord) -> ApiResult<()> {
        let rows = ContentKind::SectionTitle;
        let lookup = format!("{}/{}", rows.collection_path(), name);

        match self.api.get::<SectionTitle>(&lookup).await {
            Ok(stored) => {
                let id = stored.id.ok_or_else(|| {
                    ApiError::Decode(format!("section title '{}' has no id", name))
                })?;
                let body = merged_row(&stored, record);
                let _: Value = self.api.put(&rows.member_path(id), &body).await?;
                tracing::debug!(section = name, id, "Section title updated");
            }
            Err(e) if e.is_not_found() => {
                let body = new_row(name, record);
                let _: Value = self.api.post(rows.collection_path(), &body).await?;
                tracing::debug!(section = name, "Section title created");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Persist every section of `config`, in order, stopping at the first
    /// failure. Returns the names saved.
    pub async fn save(&self, config: &SectionConfig) -> ApiResult<Vec<String>> {
        let mut saved = Vec::with_capacity(config.len());
        for (name, record) in config.iter() {
            self.save_section(name, record).await?;
            saved.push(name.clone());
        }
        Ok(saved)
    }

    /// Ask the server to emit a `test` push on the socket.
    pub async fn trigger_test_push(&self) -> ApiResult<Value> {
        self.api.post(TEST_PUSH_PATH, &json!({})).await
    }
}

fn stored_field(stored: &SectionTitle, field: Field) -> Option<&str> {
    match field {
        Field::Title => Some(stored.title.as_str()),
        Field::Subtitle => stored.subtitle.as_deref(),
        Field::Description => stored.description.as_deref(),
        Field::MainTitle => stored.main_title.as_deref(),
        Field::Emoji => stored.emoji.as_deref(),
        Field::Badge | Field::BadgeEmoji => None,
    }
}

fn merged_row(stored: &SectionTitle, submitted: &SectionRecord) -> Value {
    let mut body = Map::new();
    for field in ROW_FIELDS {
        let value = submitted
            .get(field)
            .filter(|v| !v.is_empty())
            .or_else(|| stored_field(stored, field));
        if let Some(value) = value {
            body.insert(row_key(field).to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(body)
}

fn new_row(name: &str, submitted: &SectionRecord) -> Value {
    let defaults = SectionConfig::defaults();
    let mut body = Map::new();
    body.insert("section_name".to_string(), Value::String(name.to_string()));
    for field in ROW_FIELDS {
        let value = submitted
            .get(field)
            .filter(|v| !v.is_empty())
            .or_else(|| defaults.section(name).and_then(|r| r.get(field)));
        if let Some(value) = value {
            body.insert(row_key(field).to_string(), Value::String(value.to_string()));
        }
    }
    // The row schema requires a title.
    body.entry("title")
        .or_insert_with(|| Value::String(name.to_string()));
    body.insert("is_active".to_string(), Value::Bool(true));
    Value::Object(body)
}

fn row_key(field: Field) -> &'static str {
    match field {
        Field::MainTitle => "main_title",
        Field::BadgeEmoji => "badge_emoji",
        other => other.key(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
