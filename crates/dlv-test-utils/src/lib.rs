//! Testing utilities for the Delivery Tool workspace
//!
//! Shared fixtures for plan entities and seeded plans.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use chrono::NaiveDate;
use dlv_model::{
    ContactMethod, Intervention, MetricsGrid, Rating, RiskKind, RiskOrIssue, ScheduleItem,
    ScheduleStatus, SelectionKey, Stakeholder, Strategy, StrategyId,
};
use dlv_store::{Action, PlanState, reduce_all};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_strategy(title: &str) -> Strategy {
    Strategy {
        title: title.to_string(),
        description: format!("{title} description"),
        owner: "Planning team".to_string(),
        reference_info: "https://intranet/strategies".to_string(),
    }
}

pub fn sample_intervention(title: &str, end: NaiveDate) -> Intervention {
    Intervention {
        title: title.to_string(),
        description: format!("{title} description"),
        owner: "Delivery lead".to_string(),
        target_end_date: end,
    }
}

pub fn sample_schedule_item(
    title: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: ScheduleStatus,
) -> ScheduleItem {
    ScheduleItem {
        title: title.to_string(),
        description: String::new(),
        start_date: start,
        end_date: end,
        status,
    }
}

pub fn sample_risk(description: &str) -> RiskOrIssue {
    RiskOrIssue {
        intervention_title: "Pilot".to_string(),
        kind: RiskKind::Risk,
        description: description.to_string(),
        likelihood: Rating::Medium,
        impact: Rating::High,
        mitigation: "Escalate early".to_string(),
        post_mitigation_likelihood: Rating::Low,
        post_mitigation_impact: Rating::Medium,
        comment: String::new(),
    }
}

pub fn sample_stakeholder(name: &str) -> Stakeholder {
    Stakeholder {
        name: name.to_string(),
        role: "Sponsor".to_string(),
        email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
        phone: "0100 000 000".to_string(),
        preferred_contact: ContactMethod::Email,
        comment: String::new(),
    }
}

/// Grid with a header row and dated values
pub fn sample_grid() -> MetricsGrid {
    let columns = dlv_model::DEFAULT_COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .collect();
    MetricsGrid::from_parts(
        columns,
        vec![
            row(&["Waiting list", "01-03-2024", "120", "80", ""]),
            row(&["Waiting list", "01-01-2024", "150", "90", ""]),
            row(&["Waiting list", "01-02-2024", "abc", "85", ""]),
        ],
    )
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

/// Two strategies; the first has one record of every kind
pub struct SeededPlan {
    pub state: PlanState,
    pub first: StrategyId,
    pub second: StrategyId,
}

pub fn seeded_plan() -> SeededPlan {
    let first = StrategyId::new();
    let second = StrategyId::new();
    let state = reduce_all(
        &PlanState::new(),
        [
            Action::AddStrategy {
                id: first,
                strategy: sample_strategy("Strategy A"),
            },
            Action::AddStrategy {
                id: second,
                strategy: sample_strategy("Strategy B"),
            },
            Action::add_intervention(first, sample_intervention("Pilot", date(2024, 6, 30))),
            Action::add_schedule_item(
                first,
                sample_schedule_item(
                    "Kick-off",
                    date(2024, 1, 1),
                    date(2024, 1, 11),
                    ScheduleStatus::InProgress,
                ),
            ),
            Action::add_risk(first, sample_risk("Staff shortage")),
            Action::SaveMetrics {
                key: SelectionKey::from(first),
                grid: sample_grid(),
            },
            Action::add_stakeholder(sample_stakeholder("Ada Lovelace")),
        ],
    )
    .unwrap();
    SeededPlan {
        state,
        first,
        second,
    }
}
