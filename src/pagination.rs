use sea_orm::Condition;
use std::collections::HashMap;
use std::sync::Arc;

use crate::filtering::FilterDefinition;
use crate::scope::{ScopeBuilder, ScopeSet};

/// Raw request parameters: key to list of string values, mirroring a URL
/// query string. `limit`, `offset` and `sort` are reserved keys; everything
/// else is a resource-specific filter key.
pub type Conditions = HashMap<String, Vec<String>>;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;
pub const DEFAULT_ORDER: &str = "id desc";

/// Per-resource pagination defaults. Zero or empty fields are replaced with
/// the crate fallbacks (20, 100, `"id desc"`) at construction.
#[derive(Debug, Clone)]
pub struct PaginationOptions {
    pub default_limit: u64,
    pub max_limit: u64,
    pub default_order: String,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            default_order: DEFAULT_ORDER.to_string(),
        }
    }
}

impl PaginationOptions {
    #[must_use]
    pub fn new(default_limit: u64, max_limit: u64, default_order: impl Into<String>) -> Self {
        let default_order = default_order.into();
        Self {
            default_limit: if default_limit == 0 {
                DEFAULT_LIMIT
            } else {
                default_limit
            },
            max_limit: if max_limit == 0 { MAX_LIMIT } else { max_limit },
            default_order: if default_order.is_empty() {
                DEFAULT_ORDER.to_string()
            } else {
                default_order
            },
        }
    }
}

/// Request-scoped pagination state.
///
/// Built once from the incoming query parameters and consumed within that
/// request; not meant to be shared or mutated concurrently. `limit` and
/// `offset` are resolved eagerly here; the order clause is resolved later by
/// the scope builder because it depends on the definition's sort whitelist.
///
/// Construction never fails: malformed `limit`/`offset` values degrade to the
/// configured defaults (fail-open).
#[derive(Debug, Clone)]
pub struct Pagination {
    conditions: Conditions,
    definition: Arc<FilterDefinition>,
    options: PaginationOptions,
    pub limit: u64,
    pub offset: u64,
    custom_scopes: Vec<Condition>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(
            Conditions::new(),
            Arc::default(),
            PaginationOptions::default(),
        )
    }
}

impl Pagination {
    #[must_use]
    pub fn new(
        conditions: Conditions,
        definition: Arc<FilterDefinition>,
        options: PaginationOptions,
    ) -> Self {
        let limit = resolve_limit(&conditions, &options);
        let offset = resolve_offset(&conditions);
        Self {
            conditions,
            definition,
            options,
            limit,
            offset,
            custom_scopes: Vec::new(),
        }
    }

    /// Append a caller-supplied predicate (joins, grouping restrictions and
    /// the like). Applied after all generated filter scopes, in insertion
    /// order.
    pub fn add_scope(&mut self, condition: Condition) -> &mut Self {
        self.custom_scopes.push(condition);
        self
    }

    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    #[must_use]
    pub fn definition(&self) -> &FilterDefinition {
        &self.definition
    }

    #[must_use]
    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    #[must_use]
    pub fn custom_scopes(&self) -> &[Condition] {
        &self.custom_scopes
    }

    /// The raw `sort` condition, if the request carried one.
    #[must_use]
    pub fn sort_value(&self) -> Option<&str> {
        first_value(&self.conditions, "sort")
    }

    /// Resolve this request's filter and meta scopes.
    #[must_use]
    pub fn build_scopes(&self) -> ScopeSet {
        ScopeBuilder::new(self).build()
    }
}

fn first_value<'a>(conditions: &'a Conditions, key: &str) -> Option<&'a str> {
    conditions
        .get(key)
        .and_then(|values| values.first())
        .map(String::as_str)
}

/// A usable limit is numeric, positive and within `max_limit`; anything else
/// resolves to `default_limit`. A value above `max_limit` is intentionally
/// not clamped to it.
fn resolve_limit(conditions: &Conditions, options: &PaginationOptions) -> u64 {
    match first_value(conditions, "limit").and_then(|raw| raw.parse::<u64>().ok()) {
        Some(value) if value > 0 && value <= options.max_limit => value,
        _ => options.default_limit,
    }
}

fn resolve_offset(conditions: &Conditions) -> u64 {
    first_value(conditions, "offset")
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(0)
}
