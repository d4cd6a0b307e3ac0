//! Declarative table description (pure data).
//!
//! These types describe a DynamoDB table the way a stack declares it, before
//! synthesis turns the declaration into a resolved template document. All
//! types here are plain values with no I/O.

/// DynamoDB scalar attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
    Binary,
}

impl AttributeType {
    /// The one-letter code used in templates and API calls.
    pub fn code(self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
        }
    }
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    pub fn new(name: &str, attribute_type: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            attribute_type,
        }
    }

    /// A string-typed key attribute.
    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    /// A number-typed key attribute.
    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    /// A binary-typed key attribute.
    pub fn binary(name: &str) -> Self {
        Self::new(name, AttributeType::Binary)
    }
}

/// Billing mode for the table.
///
/// The default mirrors the upstream framework: provisioned capacity at five
/// read and five write units. A provisioned table renders throughput and no
/// `BillingMode` field; pay-per-request renders the field and no throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Billing {
    PayPerRequest,
    Provisioned {
        read_capacity: i64,
        write_capacity: i64,
    },
}

impl Default for Billing {
    fn default() -> Self {
        Billing::Provisioned {
            read_capacity: 5,
            write_capacity: 5,
        }
    }
}

/// What a table's stream captures for each modified item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamViewType {
    KeysOnly,
    NewImage,
    OldImage,
    NewAndOldImages,
}

impl StreamViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamViewType::KeysOnly => "KEYS_ONLY",
            StreamViewType::NewImage => "NEW_IMAGE",
            StreamViewType::OldImage => "OLD_IMAGE",
            StreamViewType::NewAndOldImages => "NEW_AND_OLD_IMAGES",
        }
    }
}

/// Which attributes a secondary index projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    KeysOnly,
    Include(Vec<String>),
}

/// Global Secondary Index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiProps {
    pub index_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: Projection,
}

impl GsiProps {
    /// A GSI with the given keys, projecting all attributes.
    pub fn new(index_name: &str, partition_key: KeyAttribute, sort_key: Option<KeyAttribute>) -> Self {
        Self {
            index_name: index_name.to_string(),
            partition_key,
            sort_key,
            projection: Projection::All,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}

/// Local Secondary Index declaration. Shares the table's partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsiProps {
    pub index_name: String,
    pub sort_key: KeyAttribute,
    pub projection: Projection,
}

impl LsiProps {
    /// An LSI with the given sort key, projecting all attributes.
    pub fn new(index_name: &str, sort_key: KeyAttribute) -> Self {
        Self {
            index_name: index_name.to_string(),
            sort_key,
            projection: Projection::All,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}

/// Declarative table properties.
///
/// An unset table name is rendered as no `TableName` field at all, leaving
/// name generation to whoever consumes the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProps {
    pub table_name: Option<String>,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub billing: Billing,
    pub stream: Option<StreamViewType>,
}

impl TableProps {
    pub fn new(partition_key: KeyAttribute) -> Self {
        Self {
            table_name: None,
            partition_key,
            sort_key: None,
            billing: Billing::default(),
            stream: None,
        }
    }

    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = Some(name.to_string());
        self
    }

    /// Sets the sort key.
    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    /// Sets the billing mode.
    pub fn with_billing(mut self, billing: Billing) -> Self {
        self.billing = billing;
        self
    }

    /// Enables a stream with the given view type.
    pub fn with_stream(mut self, view_type: StreamViewType) -> Self {
        self.stream = Some(view_type);
        self
    }
}
