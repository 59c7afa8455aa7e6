use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;
use sea_orm::Condition;
use sea_orm::sea_query::{Alias, ColumnRef, Expr, IntoIden, SimpleExpr};

use super::definition::{FilterConfig, FilterOperator, FilterType};
use super::operation::FilterOperation;

/// Accepted date literal format for DATE and DATETIME filter values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zone in which a DATETIME single-date filter is expanded to a full-day
/// range. GMT+7, matching the deployments this engine was written for.
pub const FILTER_TIME_ZONE: Tz = chrono_tz::Asia::Bangkok;

pub(crate) fn column_ref(table: Option<&str>, name: &str) -> ColumnRef {
    match table {
        Some(table) => {
            ColumnRef::TableColumn(Alias::new(table).into_iden(), Alias::new(name).into_iden())
        }
        None => ColumnRef::Column(Alias::new(name).into_iden()),
    }
}

/// Turn a validated operation into a predicate for one filter key.
///
/// Returns `None` whenever the operation cannot be expressed for the key's
/// type (unsupported operator, unparsable date, value outside an enum
/// whitelist); the filter is then silently dropped. Pure: identical inputs
/// always produce the same predicate.
#[must_use]
pub fn build_condition(config: &FilterConfig, operation: &FilterOperation) -> Option<Condition> {
    if config.kind == FilterType::String && !config.search_fields.is_empty() {
        let mut compound = Condition::any();
        for field in &config.search_fields {
            let column = column_ref(config.table.as_deref(), field);
            compound = compound.add(string_expr(column, operation)?);
        }
        return Some(compound);
    }

    let column = column_ref(config.table.as_deref(), &config.field);
    let expr = match config.kind {
        FilterType::Id | FilterType::Number => number_expr(column, operation),
        FilterType::String => string_expr(column, operation),
        FilterType::Bool => bool_expr(column, operation),
        FilterType::Date => date_expr(column, operation),
        FilterType::DateTime => date_time_expr(column, operation),
        FilterType::Enum => enum_expr(column, operation, &config.enum_values),
    }?;
    Some(Condition::all().add(expr))
}

/// ID and number comparisons. Values are bound as the literal strings the
/// client sent; the store's type affinity does the coercion.
fn number_expr(column: ColumnRef, operation: &FilterOperation) -> Option<SimpleExpr> {
    let first = operation.values.first()?;
    let expr = match operation.operator {
        FilterOperator::Eq => Expr::col(column).eq(first.as_str()),
        FilterOperator::Neq => Expr::col(column).ne(first.as_str()),
        FilterOperator::Gt => Expr::col(column).gt(first.as_str()),
        FilterOperator::Gte => Expr::col(column).gte(first.as_str()),
        FilterOperator::Lt => Expr::col(column).lt(first.as_str()),
        FilterOperator::Lte => Expr::col(column).lte(first.as_str()),
        FilterOperator::In => Expr::col(column).is_in(operation.values.clone()),
        FilterOperator::NotIn => Expr::col(column).is_not_in(operation.values.clone()),
        FilterOperator::Between => {
            let second = operation.values.get(1)?;
            Expr::col(column).between(first.as_str(), second.as_str())
        }
        FilterOperator::Like => return None,
    };
    Some(expr)
}

fn string_expr(column: ColumnRef, operation: &FilterOperation) -> Option<SimpleExpr> {
    let first = operation.values.first()?;
    let expr = match operation.operator {
        FilterOperator::Eq => Expr::col(column).eq(first.as_str()),
        FilterOperator::Like => Expr::col(column).like(format!("%{first}%")),
        FilterOperator::In => Expr::col(column).is_in(operation.values.clone()),
        FilterOperator::NotIn => Expr::col(column).is_not_in(operation.values.clone()),
        _ => return None,
    };
    Some(expr)
}

/// Only equality is meaningful for booleans. The literal compares
/// case-insensitively against `"true"`; anything else, `"1"` included, is
/// treated as false.
fn bool_expr(column: ColumnRef, operation: &FilterOperation) -> Option<SimpleExpr> {
    if operation.operator != FilterOperator::Eq {
        return None;
    }
    let value = operation.values.first()?.eq_ignore_ascii_case("true");
    Some(Expr::col(column).eq(value))
}

fn parse_dates(values: &[String]) -> Option<Vec<NaiveDate>> {
    values
        .iter()
        .map(|value| NaiveDate::parse_from_str(value, DATE_FORMAT).ok())
        .collect()
}

fn date_expr(column: ColumnRef, operation: &FilterOperation) -> Option<SimpleExpr> {
    let dates = parse_dates(&operation.values)?;
    let first = *dates.first()?;
    let expr = match operation.operator {
        FilterOperator::Eq => Expr::col(column).eq(first),
        FilterOperator::Neq => Expr::col(column).ne(first),
        FilterOperator::Gt => Expr::col(column).gt(first),
        FilterOperator::Gte => Expr::col(column).gte(first),
        FilterOperator::Lt => Expr::col(column).lt(first),
        FilterOperator::Lte => Expr::col(column).lte(first),
        FilterOperator::Between => {
            let second = *dates.get(1)?;
            if first > second {
                return None;
            }
            Expr::col(column).between(first, second)
        }
        _ => return None,
    };
    Some(expr)
}

fn day_bounds(date: NaiveDate) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let start = FILTER_TIME_ZONE
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .single()?;
    let end = FILTER_TIME_ZONE
        .from_local_datetime(&date.and_hms_nano_opt(23, 59, 59, 999_999_999)?)
        .single()?;
    Some((start.fixed_offset(), end.fixed_offset()))
}

/// Timestamp filters take date literals; a single-date equality expands to
/// the full day `[00:00:00, 23:59:59.999999999]` in [`FILTER_TIME_ZONE`].
/// `gt`/`lte` anchor at the end of the day, `gte`/`lt` at its start.
fn date_time_expr(column: ColumnRef, operation: &FilterOperation) -> Option<SimpleExpr> {
    let dates = parse_dates(&operation.values)?;
    let first = *dates.first()?;
    let (start, end) = day_bounds(first)?;
    let expr = match operation.operator {
        FilterOperator::Eq => Expr::col(column).between(start, end),
        FilterOperator::Gt => Expr::col(column).gt(end),
        FilterOperator::Gte => Expr::col(column).gte(start),
        FilterOperator::Lt => Expr::col(column).lt(start),
        FilterOperator::Lte => Expr::col(column).lte(end),
        FilterOperator::Between => {
            let second = *dates.get(1)?;
            if first > second {
                return None;
            }
            let (_, second_end) = day_bounds(second)?;
            Expr::col(column).between(start, second_end)
        }
        _ => return None,
    };
    Some(expr)
}

/// Enum filters match only whole values from the configured whitelist. A
/// single non-member among the supplied values voids the entire filter;
/// partial matches are never applied.
fn enum_expr(
    column: ColumnRef,
    operation: &FilterOperation,
    allowed: &[String],
) -> Option<SimpleExpr> {
    if operation.values.iter().any(|value| !allowed.contains(value)) {
        return None;
    }
    let expr = match operation.operator {
        FilterOperator::Eq => Expr::col(column).eq(operation.values.first()?.as_str()),
        FilterOperator::In => Expr::col(column).is_in(operation.values.clone()),
        _ => return None,
    };
    Some(expr)
}
