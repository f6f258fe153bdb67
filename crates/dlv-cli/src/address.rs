//! Record addressing on the command line
//!
//! A record is named either by its id or by `#N`, its 1-based position in
//! the table the matching `list` command prints.

use dlv_model::{RecordId, SelectionKey, StrategyId};
use dlv_store::{PlanState, Record};
use dlv_views::displayed_id;

/// Address resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Neither `#N` nor a valid id
    #[error("malformed address {0:?}: expected an id or #N")]
    Malformed(String),

    /// `#N` past the end of the table
    #[error("no row #{position} (table has {len} rows)")]
    NoSuchPosition { position: usize, len: usize },

    /// Well-formed id that names nothing in the table
    #[error("no record with id {0}")]
    NotFound(String),

    /// Blank metrics selection
    #[error("selection must not be blank")]
    BlankSelection,
}

/// A parsed address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based displayed position
    Position(usize),
    /// Raw id text
    Id(String),
}

/// Parse `#N` or an id
///
/// # Errors
/// Returns [`AddressError::Malformed`] for `#0`, `#x` or blank text
pub fn parse_target(text: &str) -> Result<Target, AddressError> {
    let text = text.trim();
    if let Some(position) = text.strip_prefix('#') {
        return match position.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Target::Position(n)),
            _ => Err(AddressError::Malformed(text.to_string())),
        };
    }
    if text.is_empty() {
        return Err(AddressError::Malformed(text.to_string()));
    }
    Ok(Target::Id(text.to_string()))
}

/// Resolve a strategy by id or by position in the strategy table
///
/// # Errors
/// Returns an [`AddressError`] when nothing matches
pub fn resolve_strategy(state: &PlanState, text: &str) -> Result<StrategyId, AddressError> {
    match parse_target(text)? {
        Target::Position(n) => state
            .strategies
            .at(n - 1)
            .map(|r| r.id)
            .ok_or(AddressError::NoSuchPosition {
                position: n,
                len: state.strategies.len(),
            }),
        Target::Id(raw) => {
            let id: StrategyId = raw
                .parse()
                .map_err(|_| AddressError::Malformed(raw.clone()))?;
            if state.strategies.contains(id) {
                Ok(id)
            } else {
                Err(AddressError::NotFound(raw))
            }
        }
    }
}

/// Resolve a row by id or by position in an already-ordered table
///
/// # Errors
/// Returns an [`AddressError`] when nothing matches
pub fn resolve_row<T>(rows: &[&Record<RecordId, T>], text: &str) -> Result<RecordId, AddressError> {
    match parse_target(text)? {
        Target::Position(n) => displayed_id(rows, n).ok_or(AddressError::NoSuchPosition {
            position: n,
            len: rows.len(),
        }),
        Target::Id(raw) => {
            let id: RecordId = raw
                .parse()
                .map_err(|_| AddressError::Malformed(raw.clone()))?;
            if rows.iter().any(|r| r.id == id) {
                Ok(id)
            } else {
                Err(AddressError::NotFound(raw))
            }
        }
    }
}

/// Resolve a metrics selection
///
/// Anything that names a strategy selects that strategy's grid; any other
/// non-blank text is used as a free-form label.
///
/// # Errors
/// Returns [`AddressError::BlankSelection`] for blank text
pub fn resolve_selection(state: &PlanState, text: &str) -> Result<SelectionKey, AddressError> {
    if let Ok(id) = resolve_strategy(state, text) {
        return Ok(id.into());
    }
    SelectionKey::new(text).map_err(|_| AddressError::BlankSelection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_test_utils::seeded_plan;
    use dlv_views::interventions_by_end_date;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_target("#1").unwrap(), Target::Position(1));
        assert!(parse_target("#0").is_err());
        assert!(parse_target("#two").is_err());
        assert!(parse_target("  ").is_err());
    }

    #[test]
    fn strategy_by_position_and_id() {
        let plan = seeded_plan();
        assert_eq!(resolve_strategy(&plan.state, "#1").unwrap(), plan.first);
        assert_eq!(
            resolve_strategy(&plan.state, &plan.second.to_string()).unwrap(),
            plan.second
        );
        assert_eq!(
            resolve_strategy(&plan.state, "#3").unwrap_err(),
            AddressError::NoSuchPosition { position: 3, len: 2 }
        );
        assert!(matches!(
            resolve_strategy(&plan.state, &StrategyId::new().to_string()),
            Err(AddressError::NotFound(_))
        ));
    }

    #[test]
    fn rows_resolve_against_the_displayed_table() {
        let plan = seeded_plan();
        let items = plan.state.interventions_for(plan.first);
        let rows = interventions_by_end_date(&items);
        let id = resolve_row(&rows, "#1").unwrap();
        assert_eq!(resolve_row(&rows, &id.to_string()).unwrap(), id);
        assert!(matches!(
            resolve_row(&rows, &RecordId::new().to_string()),
            Err(AddressError::NotFound(_))
        ));
        assert!(matches!(
            resolve_row(&rows, "not-an-id"),
            Err(AddressError::Malformed(_))
        ));
    }

    #[test]
    fn selection_prefers_strategies() {
        let plan = seeded_plan();
        assert_eq!(
            resolve_selection(&plan.state, "#2").unwrap(),
            SelectionKey::from(plan.second)
        );
        assert_eq!(
            resolve_selection(&plan.state, "pilot ward").unwrap().as_str(),
            "pilot ward"
        );
        assert_eq!(
            resolve_selection(&plan.state, " ").unwrap_err(),
            AddressError::BlankSelection
        );
    }
}
