use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Attributes every scholarship is expected to carry.
///
/// Declared for diagnostics only; imports are not rejected when one is missing.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "id",
    "title",
    "country",
    "institution",
    "deadline",
    "level",
    "description",
    "application_url",
];

/// A scholarship as it travels through an import.
///
/// Named attributes hold whatever JSON value was uploaded (`None` when the key
/// was absent, `Some(Value::Null)` for an explicit null), so a record written
/// back out matches what came in. Unknown keys land in `extra`. The three list
/// attributes are always sequences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub institution: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub level: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub application_url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub featured: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub fields: Vec<Value>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub benefits: Vec<Value>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub requirements: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of collapsing it to `None`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Same coercion as import normalization: anything but an array becomes empty.
fn list_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_list(Value::deserialize(deserializer)?))
}

pub fn coerce_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

impl ScholarshipRecord {
    /// Builds a record from a decoded JSON object, taking the named keys out of it.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let mut list = |key: &str| map.remove(key).map(coerce_list).unwrap_or_default();
        let fields = list("fields");
        let benefits = list("benefits");
        let requirements = list("requirements");

        Self {
            id: map.remove("id"),
            title: map.remove("title"),
            country: map.remove("country"),
            institution: map.remove("institution"),
            deadline: map.remove("deadline"),
            level: map.remove("level"),
            description: map.remove("description"),
            application_url: map.remove("application_url"),
            featured: map.remove("featured"),
            source_url: map.remove("source_url"),
            image_url: map.remove("image_url"),
            fields,
            benefits,
            requirements,
            extra: map,
        }
    }

    /// Looks up any non-list attribute by its JSON key.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        let named = match key {
            "id" => &self.id,
            "title" => &self.title,
            "country" => &self.country,
            "institution" => &self.institution,
            "deadline" => &self.deadline,
            "level" => &self.level,
            "description" => &self.description,
            "application_url" => &self.application_url,
            "featured" => &self.featured,
            "source_url" => &self.source_url,
            "image_url" => &self.image_url,
            _ => return self.extra.get(key),
        };
        named.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(Value::as_str)
    }

    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_ref().and_then(Value::as_str)
    }

    pub fn featured(&self) -> Option<bool> {
        self.featured.as_ref().and_then(Value::as_bool)
    }

    /// Parses `deadline` as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        let raw = self.deadline()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    /// Required attributes that are absent, null or an empty string.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| match self.attribute(key) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .collect()
    }
}

/// Ordered records of a single import run.
pub type ImportBatch = Vec<ScholarshipRecord>;

/// Outcome reported back to whoever started the import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
}

impl ImportResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn imported(count: usize) -> Self {
        Self::success(format!("Successfully imported {} scholarships", count))
    }
}

impl From<crate::utils::error::ImportError> for ImportResult {
    fn from(err: crate::utils::error::ImportError) -> Self {
        Self::failure(err.user_friendly_message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreError {
    pub message: Option<String>,
}

/// What a bulk insert reports back: success, or a failure with an optional message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StoreError>,
}

impl InsertOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(StoreError {
                message: Some(message.into()),
            }),
        }
    }

    pub fn failed_without_message() -> Self {
        Self {
            success: false,
            error: None,
        }
    }
}
