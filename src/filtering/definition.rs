use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;

/// Value type of a filterable request key, driving which scope builder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Id,
    Number,
    String,
    Bool,
    Date,
    DateTime,
    Enum,
}

/// Comparison operator accepted in the `"<op>:<value>"` condition grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Neq,
    In,
    NotIn,
    Like,
    Between,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Like => "like",
            Self::Between => "between",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "in" => Ok(Self::In),
            "not_in" => Ok(Self::NotIn),
            "like" => Ok(Self::Like),
            "between" => Ok(Self::Between),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            _ => Err(()),
        }
    }
}

impl FilterType {
    /// Operators a key of this type accepts unless the resource overrides them.
    #[must_use]
    pub fn default_operators(self) -> Vec<FilterOperator> {
        use FilterOperator::{Between, Eq, Gt, Gte, In, Like, Lt, Lte, Neq, NotIn};
        match self {
            Self::Id | Self::Number => {
                vec![Eq, Neq, In, NotIn, Between, Gt, Gte, Lt, Lte]
            }
            Self::String => vec![Eq, Like, In, NotIn],
            Self::Bool => vec![Eq],
            Self::Date => vec![Eq, Neq, Between, Gt, Gte, Lt, Lte],
            Self::DateTime => vec![Eq, Between, Gt, Gte, Lt, Lte],
            Self::Enum => vec![Eq, In],
        }
    }
}

/// Static configuration of one filterable request key.
///
/// Either `field` names the single target column, or `search_fields` lists
/// several columns that are OR-combined (multi-column search mode).
/// `operators` is the authoritative allow-list for this key, independent of
/// what the type generally supports. `enum_values` is mandatory for
/// [`FilterType::Enum`] keys and is the whitelist matched against.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub field: String,
    pub search_fields: Vec<String>,
    pub table: Option<String>,
    pub kind: FilterType,
    pub operators: Vec<FilterOperator>,
    pub enum_values: Vec<String>,
}

impl FilterConfig {
    /// A single-column filter with the type's default operator set.
    #[must_use]
    pub fn new(kind: FilterType, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            search_fields: Vec::new(),
            table: None,
            kind,
            operators: kind.default_operators(),
            enum_values: Vec::new(),
        }
    }

    /// A multi-column OR search over `fields`, string-typed.
    #[must_use]
    pub fn search(fields: &[&str]) -> Self {
        Self {
            field: String::new(),
            search_fields: fields.iter().map(ToString::to_string).collect(),
            table: None,
            kind: FilterType::String,
            operators: FilterType::String.default_operators(),
            enum_values: Vec::new(),
        }
    }

    /// Replace the allowed operator set for this key.
    #[must_use]
    pub fn operators(mut self, operators: &[FilterOperator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    /// Qualify the column(s) with a table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Whitelist of accepted values for enum-typed keys.
    #[must_use]
    pub fn enum_values(mut self, values: &[&str]) -> Self {
        self.enum_values = values.iter().map(ToString::to_string).collect();
        self
    }

    pub(crate) fn allows(&self, operator: FilterOperator) -> bool {
        self.operators.contains(&operator)
    }
}

/// Static configuration of one sortable request key.
///
/// A key with `allowed = false` is defined but explicitly disabled; referencing
/// it in a sort clause rejects the whole clause.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub field: String,
    pub table: Option<String>,
    pub allowed: bool,
}

impl SortConfig {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            table: None,
            allowed: true,
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.allowed = false;
        self
    }
}

/// Per-resource registry of filterable and sortable request keys.
///
/// Built once at resource-registration time with the chainable
/// [`add_filter`](Self::add_filter) / [`add_sort`](Self::add_sort) builders and
/// shared read-only (typically behind an `Arc`) for the rest of the process
/// lifetime. Lookup is by exact key; unknown keys are simply absent.
#[derive(Debug, Clone, Default)]
pub struct FilterDefinition {
    filters: HashMap<String, FilterConfig>,
    sorts: HashMap<String, SortConfig>,
}

impl FilterDefinition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_filter(mut self, key: impl Into<String>, config: FilterConfig) -> Self {
        self.filters.insert(key.into(), config);
        self
    }

    #[must_use]
    pub fn add_sort(mut self, key: impl Into<String>, config: SortConfig) -> Self {
        self.sorts.insert(key.into(), config);
        self
    }

    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&FilterConfig> {
        self.filters.get(key)
    }

    #[must_use]
    pub fn sort(&self, key: &str) -> Option<&SortConfig> {
        self.sorts.get(key)
    }
}
