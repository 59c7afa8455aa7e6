//! Scope construction and application.
//!
//! A [`Scope`] is an opaque, composable query transformation: a predicate, a
//! limit, an offset or an order clause. The [`ScopeBuilder`] turns a
//! request's [`Pagination`] into two ordered lists, filter scopes and meta
//! scopes, kept separate so that counting can apply filters only while
//! listing applies both, filters first. [`apply_scopes`] is the Sea-ORM
//! adapter that folds a scope list onto a `Select`.

use sea_orm::{Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::filtering::{FilterOperation, OrderClause, build_condition, resolve_order};
use crate::pagination::Pagination;

/// Keys consumed by pagination itself, never treated as filter keys.
pub const RESERVED_KEYS: [&str; 3] = ["limit", "offset", "sort"];

#[derive(Debug, Clone)]
pub enum Scope {
    Predicate(Condition),
    Limit(u64),
    Offset(u64),
    Order(Vec<OrderClause>),
}

/// The two ordered scope lists produced for one request.
#[derive(Debug, Clone, Default)]
pub struct ScopeSet {
    pub filters: Vec<Scope>,
    pub meta: Vec<Scope>,
}

/// Builds the scope lists for one request. Construction touches no I/O and
/// is deterministic for a given pagination state.
pub struct ScopeBuilder<'a> {
    pagination: &'a Pagination,
}

impl<'a> ScopeBuilder<'a> {
    #[must_use]
    pub fn new(pagination: &'a Pagination) -> Self {
        Self { pagination }
    }

    #[must_use]
    pub fn build(&self) -> ScopeSet {
        ScopeSet {
            filters: self.filter_scopes(),
            meta: self.meta_scopes(),
        }
    }

    fn filter_scopes(&self) -> Vec<Scope> {
        let conditions = self.pagination.conditions();
        let definition = self.pagination.definition();

        // HashMap iteration order is arbitrary; sort keys so the produced
        // scope list is stable across identical requests.
        let mut keys: Vec<&String> = conditions.keys().collect();
        keys.sort();

        let mut scopes = Vec::new();
        for key in keys {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let Some(config) = definition.filter(key) else {
                continue;
            };
            let Some(raw) = conditions.get(key).and_then(|values| values.first()) else {
                continue;
            };
            let Some(operation) = FilterOperation::parse(raw) else {
                tracing::debug!(%key, raw, "filter condition with unknown operator dropped");
                continue;
            };
            if !operation.is_valid(config) {
                tracing::debug!(
                    %key,
                    operator = operation.operator.as_str(),
                    "invalid filter operation dropped"
                );
                continue;
            }
            match build_condition(config, &operation) {
                Some(condition) => scopes.push(Scope::Predicate(condition)),
                None => tracing::debug!(%key, "filter produced no predicate"),
            }
        }

        for custom in self.pagination.custom_scopes() {
            scopes.push(Scope::Predicate(custom.clone()));
        }
        scopes
    }

    fn meta_scopes(&self) -> Vec<Scope> {
        let mut scopes = vec![Scope::Limit(self.pagination.limit)];
        if self.pagination.offset > 0 {
            scopes.push(Scope::Offset(self.pagination.offset));
        }
        let order = resolve_order(
            self.pagination.sort_value(),
            self.pagination.definition(),
            &self.pagination.options().default_order,
        );
        scopes.push(Scope::Order(order));
        scopes
    }
}

/// Fold scopes onto a query, in list order.
#[must_use]
pub fn apply_scopes<E: EntityTrait>(query: Select<E>, scopes: &[Scope]) -> Select<E> {
    scopes.iter().fold(query, |query, scope| match scope {
        Scope::Predicate(condition) => query.filter(condition.clone()),
        Scope::Limit(limit) => query.limit(*limit),
        Scope::Offset(offset) => query.offset(*offset),
        Scope::Order(clauses) => clauses.iter().fold(query, |query, clause| {
            query.order_by(clause.to_expr(), clause.direction.clone())
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{FilterConfig, FilterDefinition, FilterType, SortConfig};
    use crate::pagination::{Conditions, PaginationOptions};
    use sea_orm::Order;
    use sea_orm::sea_query::Expr;
    use std::sync::Arc;

    fn definition() -> Arc<FilterDefinition> {
        Arc::new(
            FilterDefinition::new()
                .add_filter("name", FilterConfig::new(FilterType::String, "name"))
                .add_filter("age", FilterConfig::new(FilterType::Number, "age"))
                .add_filter(
                    "status",
                    FilterConfig::new(FilterType::Enum, "status")
                        .enum_values(&["active", "inactive"]),
                )
                .add_sort("name", SortConfig::new("name")),
        )
    }

    fn conditions(entries: &[(&str, &str)]) -> Conditions {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), vec![(*value).to_string()]))
            .collect()
    }

    fn build(entries: &[(&str, &str)]) -> ScopeSet {
        Pagination::new(
            conditions(entries),
            definition(),
            PaginationOptions::default(),
        )
        .build_scopes()
    }

    #[test]
    fn limit_and_order_scopes_are_always_present() {
        let set = build(&[]);
        assert!(set.filters.is_empty());
        assert_eq!(set.meta.len(), 2);
        assert!(matches!(set.meta[0], Scope::Limit(20)));
        assert!(matches!(set.meta[1], Scope::Order(_)));
    }

    #[test]
    fn offset_scope_emitted_only_when_positive() {
        let set = build(&[("offset", "40")]);
        assert!(matches!(set.meta[1], Scope::Offset(40)));

        let set = build(&[("offset", "0")]);
        assert_eq!(set.meta.len(), 2);
        assert!(!set.meta.iter().any(|s| matches!(s, Scope::Offset(_))));
    }

    #[test]
    fn known_keys_produce_predicates_unknown_are_ignored() {
        let set = build(&[("name", "like:John"), ("nope", "x")]);
        assert_eq!(set.filters.len(), 1);
        assert!(matches!(set.filters[0], Scope::Predicate(_)));
    }

    #[test]
    fn reserved_keys_are_never_filters() {
        let set = build(&[("limit", "10"), ("offset", "5"), ("sort", "name")]);
        assert!(set.filters.is_empty());
    }

    #[test]
    fn invalid_enum_value_produces_no_filter_scope() {
        let set = build(&[("status", "bogus")]);
        assert!(set.filters.is_empty());
    }

    #[test]
    fn rejected_sort_falls_back_to_default_order() {
        let set = build(&[("sort", "name asc, unknown")]);
        let Some(Scope::Order(clauses)) = set.meta.last() else {
            panic!("expected order scope");
        };
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].column, "id");
        assert_eq!(clauses[0].direction, Order::Desc);
    }

    #[test]
    fn custom_scopes_come_after_generated_filters() {
        let mut pagination = Pagination::new(
            conditions(&[("age", "gte:18")]),
            definition(),
            PaginationOptions::default(),
        );
        pagination.add_scope(Condition::all().add(Expr::cust("deleted_at IS NULL")));
        pagination.add_scope(Condition::all().add(Expr::cust("tenant_id = 1")));

        let set = pagination.build_scopes();
        assert_eq!(set.filters.len(), 3);
        assert!(matches!(set.filters[0], Scope::Predicate(_)));
    }

    #[test]
    fn scope_building_is_repeatable() {
        let pagination = Pagination::new(
            conditions(&[("name", "like:a"), ("age", "between:1,9"), ("offset", "3")]),
            definition(),
            PaginationOptions::default(),
        );
        let first = pagination.build_scopes();
        let second = pagination.build_scopes();
        assert_eq!(first.filters.len(), second.filters.len());
        assert_eq!(first.meta.len(), second.meta.len());
    }
}
