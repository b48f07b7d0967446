//! Parsing of `KEY=VALUE` filter arguments and sort columns.

use anyhow::{Result, anyhow, bail};
use grid_model::{FilterKind, FilterValue, GridError, GridSchema, SortDirection, SortState, TriState};

/// Split `KEY=VALUE`. Used as a clap value parser.
pub fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing filter key in '{arg}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Typed value for a declared filter.
pub fn filter_value(schema: &GridSchema, key: &str, value: &str) -> Result<FilterValue> {
    let Some(filter) = schema.filter_descriptor(key) else {
        let available: Vec<&str> = schema.filters.iter().map(|f| f.key.as_str()).collect();
        bail!(
            "{} has no filter '{key}' (available: {})",
            schema.resource_type,
            available.join(", ")
        );
    };
    Ok(match &filter.kind {
        FilterKind::Exact { .. } => FilterValue::Exact(value.to_string()),
        FilterKind::Flag(_) => FilterValue::Flag(
            value
                .parse::<TriState>()
                .map_err(|message| anyhow!("filter '{key}': {message}"))?,
        ),
        FilterKind::Bucket(_) => FilterValue::Bucket(value.to_string()),
    })
}

/// Sort state for a column, checking that it exists and is sortable.
pub fn sort_state(schema: &GridSchema, column: &str, descending: bool) -> Result<SortState> {
    let field = schema.get(column).ok_or_else(|| GridError::UnknownColumn {
        resource_type: schema.resource_type.clone(),
        key: column.to_string(),
    })?;
    if !field.sortable {
        bail!("column '{column}' cannot be sorted");
    }
    let direction = if descending {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    Ok(SortState::by(column, direction))
}
