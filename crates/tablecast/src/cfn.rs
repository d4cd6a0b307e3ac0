//! Resolved template document model.
//!
//! The shapes here mirror the `AWS::DynamoDB::Table` resource as it appears
//! in a synthesized CloudFormation template: PascalCase field names on the
//! wire, absent optionals skipped entirely. A [`Template`] is the literal,
//! token-free document produced by [`crate::stack::Stack::synth`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declared type of a DynamoDB table resource.
pub const TABLE_RESOURCE_TYPE: &str = "AWS::DynamoDB::Table";

/// A synthesized template: logical identifiers mapped to resource records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "Resources", default)]
    pub resources: BTreeMap<String, Resource>,
}

impl Template {
    /// Renders the template as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("template serialization is infallible")
    }
}

/// One resource record: its declared type and its property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties", default)]
    pub properties: TableProperties,
}

/// The property bag of a table resource.
///
/// Every field is optional; the mapper decides which absences default to
/// empty sequences and which stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_definitions: Option<Vec<AttributeDefinitionProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_schema: Option<Vec<KeySchemaProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ThroughputProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_secondary_indexes: Option<Vec<LocalIndexProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_secondary_indexes: Option<Vec<GlobalIndexProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecificationProperty>,
}

/// A `{ AttributeName, AttributeType }` pair. Type is the one-letter code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinitionProperty {
    pub attribute_name: String,
    pub attribute_type: String,
}

/// A `{ AttributeName, KeyType }` pair. KeyType is `HASH` or `RANGE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaProperty {
    pub attribute_name: String,
    pub key_type: String,
}

/// Provisioned read/write capacity units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ThroughputProperty {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

/// Secondary index projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectionProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_key_attributes: Option<Vec<String>>,
}

/// A local secondary index record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalIndexProperty {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaProperty>,
    pub projection: ProjectionProperty,
}

/// A global secondary index record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalIndexProperty {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaProperty>,
    pub projection: ProjectionProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ThroughputProperty>,
}

/// A stream specification record.
///
/// Synthesis never emits `StreamEnabled`, but records produced elsewhere may
/// carry it, so it is accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecificationProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_enabled: Option<bool>,
    pub stream_view_type: String,
}
