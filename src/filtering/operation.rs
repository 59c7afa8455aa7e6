use super::definition::{FilterConfig, FilterOperator};

/// One parsed condition value: the requested operator plus its arguments.
///
/// Produced transiently per request while building scopes, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOperation {
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl FilterOperation {
    /// Parse one raw condition value.
    ///
    /// Grammar: a bare literal means `eq`; `"<op>:<rest>"` takes the prefix
    /// before the first colon as the operator and keeps any further colons
    /// inside `rest`. `in`, `not_in` and `between` split `rest` on commas;
    /// every other operator takes `rest` as a single value.
    ///
    /// Returns `None` when the prefix is not a known operator token; the
    /// whole condition is then dropped (fail-open).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let Some((prefix, rest)) = raw.split_once(':') else {
            return Some(Self {
                operator: FilterOperator::Eq,
                values: vec![raw.to_string()],
            });
        };

        let operator = prefix.parse::<FilterOperator>().ok()?;
        let values = match operator {
            FilterOperator::In | FilterOperator::NotIn | FilterOperator::Between => {
                rest.split(',').map(ToString::to_string).collect()
            }
            _ => vec![rest.to_string()],
        };
        Some(Self { operator, values })
    }

    /// Whether this operation is acceptable for the given key configuration.
    ///
    /// The operator must be in the config's allow-list; `between` takes
    /// exactly two values, `in`/`not_in` at least one, everything else
    /// exactly one.
    #[must_use]
    pub fn is_valid(&self, config: &FilterConfig) -> bool {
        if !config.allows(self.operator) {
            return false;
        }
        match self.operator {
            FilterOperator::Between => self.values.len() == 2,
            FilterOperator::In | FilterOperator::NotIn => !self.values.is_empty(),
            _ => self.values.len() == 1,
        }
    }
}
