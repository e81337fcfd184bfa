//! Index schema types.
//!
//! This module defines the schema of a search index: its fields, the optional
//! suggester used for type-ahead queries, and the optional CORS policy.

use serde::{Deserialize, Serialize};

/// Logical type of an index field, serialized as the service's EDM type name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    #[serde(rename = "Edm.String")]
    String,
    #[serde(rename = "Edm.Int32")]
    Int32,
    #[serde(rename = "Edm.Int64")]
    Int64,
    #[serde(rename = "Edm.Double")]
    Double,
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    #[serde(rename = "Collection(Edm.String)")]
    StringCollection,
}

impl DataType {
    /// Returns true for types that hold text and can therefore be analyzed.
    pub fn is_text(&self) -> bool {
        matches!(self, DataType::String | DataType::StringCollection)
    }
}

/// Text analyzer applied to a searchable string field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalyzerName {
    #[serde(rename = "en.microsoft")]
    EnMicrosoft,
    #[serde(rename = "en.lucene")]
    EnLucene,
    #[serde(rename = "standard.lucene")]
    StandardLucene,
    #[serde(rename = "keyword")]
    Keyword,
}

/// A single field of an index schema.
///
/// Attribute flags are optional: a flag left as `None` is omitted from the request
/// and the service applies its own default for the field's type. `key` is only
/// sent when it is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facetable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrievable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerName>,
}

impl FieldDefinition {
    /// Create a field with every attribute left to the service default.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            key: false,
            searchable: None,
            filterable: None,
            sortable: None,
            facetable: None,
            retrievable: None,
            analyzer: None,
        }
    }

    /// Mark this field as the document key.
    pub fn as_key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn searchable(mut self, value: bool) -> Self {
        self.searchable = Some(value);
        self
    }

    pub fn filterable(mut self, value: bool) -> Self {
        self.filterable = Some(value);
        self
    }

    pub fn sortable(mut self, value: bool) -> Self {
        self.sortable = Some(value);
        self
    }

    pub fn facetable(mut self, value: bool) -> Self {
        self.facetable = Some(value);
        self
    }

    pub fn retrievable(mut self, value: bool) -> Self {
        self.retrievable = Some(value);
        self
    }

    pub fn analyzer(mut self, analyzer: AnalyzerName) -> Self {
        self.analyzer = Some(analyzer);
        self
    }
}

/// Matching strategy used by a suggester.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SuggesterSearchMode {
    /// Matches consecutive whole terms and prefixes anywhere in the field.
    #[default]
    AnalyzingInfixMatching,
}

/// Type-ahead configuration over a set of source fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Suggester {
    pub name: String,
    pub search_mode: SuggesterSearchMode,
    pub source_fields: Vec<String>,
}

impl Suggester {
    /// Create an analyzing-infix suggester over the given source fields.
    pub fn new<I, S>(name: impl Into<String>, source_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            search_mode: SuggesterSearchMode::AnalyzingInfixMatching,
            source_fields: source_fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Cross-origin policy for browser clients querying the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CorsOptions {
    pub allowed_origins: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_in_seconds: Option<u64>,
}

impl CorsOptions {
    pub fn allow<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
            max_age_in_seconds: None,
        }
    }
}

/// Schema of a search index.
///
/// The service accepts a list of suggesters but allows at most one per index, so the
/// schema holds an `Option` and serializes it as a zero- or one-element `suggesters`
/// array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexSchema {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(
        rename = "suggesters",
        default,
        skip_serializing_if = "Option::is_none",
        with = "suggester_list"
    )]
    pub suggester: Option<Suggester>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_options: Option<CorsOptions>,
}

impl IndexSchema {
    /// Create a schema with no suggester and no CORS policy.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
            suggester: None,
            cors_options: None,
        }
    }

    pub fn with_suggester(mut self, suggester: Suggester) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn with_cors(mut self, cors_options: CorsOptions) -> Self {
        self.cors_options = Some(cors_options);
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterate over the fields flagged as key.
    pub fn key_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.key)
    }

    /// The key field, if exactly one field is flagged as key.
    pub fn key_field(&self) -> Option<&FieldDefinition> {
        let mut keys = self.key_fields();
        match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key),
            _ => None,
        }
    }
}

mod suggester_list {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Suggester;

    pub fn serialize<S>(value: &Option<Suggester>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Suggester>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut suggesters = Vec::<Suggester>::deserialize(deserializer)?;
        if suggesters.len() > 1 {
            return Err(D::Error::custom(format!(
                "at most one suggester per index, found {}",
                suggesters.len()
            )));
        }
        Ok(suggesters.pop())
    }
}
