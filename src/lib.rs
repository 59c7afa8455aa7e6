//! Dynamic query filtering, sorting and pagination scopes, plus a generic
//! Sea-ORM repository, for admin-style CRUD APIs.
//!
//! The flow for one request: raw query parameters become a
//! [`Pagination`](pagination::Pagination), whose scope builder resolves two
//! ordered scope lists: filter scopes (predicates plus caller-supplied
//! custom scopes) and meta scopes (limit, offset, order). The
//! [`Repository`](repository::Repository) applies both lists when listing
//! and the filter list alone when counting.

pub mod errors;
pub mod filtering;
pub mod pagination;
pub mod repository;
pub mod scope;

pub use errors::ApiError;
pub use filtering::{
    FilterConfig, FilterDefinition, FilterOperator, FilterType, OrderClause, SortConfig,
};
pub use pagination::{Conditions, Pagination, PaginationOptions};
pub use repository::Repository;
pub use scope::{Scope, ScopeBuilder, ScopeSet, apply_scopes};
