use sea_orm::Order;
use sea_orm::sea_query::SimpleExpr;

use super::conditions::column_ref;
use super::definition::FilterDefinition;

/// One resolved ordering term: a column (optionally table-qualified) plus a
/// direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderClause {
    pub table: Option<String>,
    pub column: String,
    pub direction: Order,
}

impl OrderClause {
    #[must_use]
    pub fn new(column: impl Into<String>, direction: Order) -> Self {
        Self {
            table: None,
            column: column.into(),
            direction,
        }
    }

    #[must_use]
    pub fn to_expr(&self) -> SimpleExpr {
        SimpleExpr::Column(column_ref(self.table.as_deref(), &self.column))
    }
}

/// Parse a comma-separated `"<field> [asc|desc]"` clause list.
///
/// Direction defaults to ascending. A malformed segment (bad direction token,
/// trailing garbage) invalidates the whole clause; empty segments are skipped.
fn parse_clauses(sort: &str) -> Option<Vec<(String, Order)>> {
    let mut clauses = Vec::new();
    for segment in sort.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let mut tokens = segment.split_whitespace();
        let field = tokens.next()?.to_string();
        let direction = match tokens.next() {
            None => Order::Asc,
            Some(token) if token.eq_ignore_ascii_case("asc") => Order::Asc,
            Some(token) if token.eq_ignore_ascii_case("desc") => Order::Desc,
            Some(_) => return None,
        };
        if tokens.next().is_some() {
            return None;
        }
        clauses.push((field, direction));
    }
    Some(clauses)
}

/// Map a client sort clause through the definition's whitelist.
///
/// Every referenced key must be defined and allowed; one unknown or disabled
/// key rejects the whole clause (no partial acceptance). An empty clause
/// yields `None` so the caller falls back to the default order.
fn whitelisted_clauses(sort: &str, definition: &FilterDefinition) -> Option<Vec<OrderClause>> {
    let parsed = parse_clauses(sort)?;
    if parsed.is_empty() {
        return None;
    }
    parsed
        .into_iter()
        .map(|(key, direction)| {
            let config = definition.sort(&key).filter(|config| config.allowed)?;
            Some(OrderClause {
                table: config.table.clone(),
                column: config.field.clone(),
                direction,
            })
        })
        .collect()
}

/// Whether a raw sort clause passes the definition's whitelist. The empty
/// string is always valid.
#[must_use]
pub fn validate_order(sort: &str, definition: &FilterDefinition) -> bool {
    if sort.trim().is_empty() {
        return true;
    }
    whitelisted_clauses(sort, definition).is_some()
}

/// Resolve the effective order for a request: the client clause when it is
/// fully whitelisted, the configured default otherwise.
#[must_use]
pub fn resolve_order(
    sort: Option<&str>,
    definition: &FilterDefinition,
    default_order: &str,
) -> Vec<OrderClause> {
    if let Some(sort) = sort {
        if let Some(clauses) = whitelisted_clauses(sort, definition) {
            return clauses;
        }
        tracing::debug!(sort, "sort clause rejected, falling back to default order");
    }
    default_clauses(default_order)
}

/// The default order is configuration, not client input: parse it leniently
/// and only fall back to `id` descending if it is unusable.
fn default_clauses(default_order: &str) -> Vec<OrderClause> {
    parse_clauses(default_order)
        .map(|clauses| {
            clauses
                .into_iter()
                .map(|(column, direction)| OrderClause {
                    table: None,
                    column,
                    direction,
                })
                .collect::<Vec<_>>()
        })
        .filter(|clauses| !clauses.is_empty())
        .unwrap_or_else(|| vec![OrderClause::new("id", Order::Desc)])
}
