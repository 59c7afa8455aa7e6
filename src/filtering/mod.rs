//! # Dynamic query filtering
//!
//! Turns untyped request parameters into validated, type-aware predicates.
//!
//! Each resource declares a [`FilterDefinition`]: which request keys are
//! filterable (with their type, allowed operators and target columns) and
//! which are sortable. At request time every condition value is parsed
//! against the `"<op>:<value>"` grammar into a [`FilterOperation`], validated
//! against the key's [`FilterConfig`], and handed to the per-type builders in
//! [`conditions`] which emit `sea_query` predicate values.
//!
//! The whole layer is best-effort against client input: malformed values,
//! unknown keys, disallowed operators and out-of-whitelist enum values drop
//! the offending filter instead of failing the request.

pub mod conditions;
pub mod definition;
pub mod operation;
pub mod sort;

pub use conditions::{DATE_FORMAT, FILTER_TIME_ZONE, build_condition};
pub use definition::{FilterConfig, FilterDefinition, FilterOperator, FilterType, SortConfig};
pub use operation::FilterOperation;
pub use sort::{OrderClause, resolve_order, validate_order};
