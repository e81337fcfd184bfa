//! Indexer registration types.
//!
//! An indexer binds one data source to one index and copies documents on a
//! recurring schedule.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::interval;

/// Renames a source column to a target index field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field_name: String,
    pub target_field_name: String,
}

impl FieldMapping {
    pub fn new(source_field_name: impl Into<String>, target_field_name: impl Into<String>) -> Self {
        Self {
            source_field_name: source_field_name.into(),
            target_field_name: target_field_name.into(),
        }
    }
}

/// Recurring schedule of an indexer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexingSchedule {
    #[serde(with = "interval::iso8601")]
    pub interval: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

impl IndexingSchedule {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            start_time: None,
        }
    }

    /// Run once every 24 hours.
    pub fn daily() -> Self {
        Self::every(Duration::from_secs(24 * 60 * 60))
    }

    pub fn starting_at(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }
}

/// Registration of an indexer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexerConfig {
    pub name: String,
    pub data_source_name: String,
    pub target_index_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<IndexingSchedule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_mappings: Vec<FieldMapping>,
}

impl IndexerConfig {
    pub fn new(
        name: impl Into<String>,
        data_source_name: impl Into<String>,
        target_index_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_source_name: data_source_name.into(),
            target_index_name: target_index_name.into(),
            schedule: None,
            field_mappings: Vec::new(),
        }
    }

    pub fn with_schedule(mut self, schedule: IndexingSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_field_mapping(mut self, mapping: FieldMapping) -> Self {
        self.field_mappings.push(mapping);
        self
    }

    /// Point the indexer at the given index and data source.
    pub fn bound_to(
        mut self,
        target_index_name: impl Into<String>,
        data_source_name: impl Into<String>,
    ) -> Self {
        self.target_index_name = target_index_name.into();
        self.data_source_name = data_source_name.into();
        self
    }
}
