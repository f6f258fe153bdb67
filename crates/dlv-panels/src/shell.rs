//! Navigation shell
//!
//! Banner on top, category list on the left, the active panel in the middle.

use crate::form::Panel;
use crate::interventions::InterventionsPanel;
use crate::metrics::MetricsPanel;
use crate::risks::RisksPanel;
use crate::schedule::SchedulePanel;
use crate::stakeholders::StakeholdersPanel;
use crate::strategy::StrategyPanel;
use dlv_model::{ModelError, StrategyId};
use dlv_store::PlanState;
use std::fmt;
use std::str::FromStr;

/// Shown in the middle pane when no category is active
pub const PLACEHOLDER: &str = "Please select an option from the left panel.";

/// Application title
pub const TITLE: &str = "Delivery Tool";

/// Banner navigation entries; they have no behavior
pub const NAV_ENTRIES: [&str; 3] = ["Home", "Project Page", "Instructions"];

/// Left-pane categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveElement {
    Strategy,
    Interventions,
    Schedule,
    SuccessMetrics,
    RisksAndIssues,
    Stakeholders,
}

impl ActiveElement {
    /// All categories in display order
    pub const ALL: [ActiveElement; 6] = [
        ActiveElement::Strategy,
        ActiveElement::Interventions,
        ActiveElement::Schedule,
        ActiveElement::SuccessMetrics,
        ActiveElement::RisksAndIssues,
        ActiveElement::Stakeholders,
    ];

    /// Display label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ActiveElement::Strategy => "Strategy",
            ActiveElement::Interventions => "Interventions",
            ActiveElement::Schedule => "Schedule",
            ActiveElement::SuccessMetrics => "Success Metrics",
            ActiveElement::RisksAndIssues => "Risks and Issues",
            ActiveElement::Stakeholders => "Stakeholders",
        }
    }
}

impl fmt::Display for ActiveElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActiveElement {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "strategy" | "strategies" => Ok(ActiveElement::Strategy),
            "interventions" | "intervention" => Ok(ActiveElement::Interventions),
            "schedule" => Ok(ActiveElement::Schedule),
            "successmetrics" | "metrics" => Ok(ActiveElement::SuccessMetrics),
            "risksandissues" | "risks" | "risk" => Ok(ActiveElement::RisksAndIssues),
            "stakeholders" | "stakeholder" => Ok(ActiveElement::Stakeholders),
            _ => Err(ModelError::unknown("panel", s)),
        }
    }
}

/// Render the banner line
#[must_use]
pub fn banner() -> String {
    format!("{TITLE}    {}\n", NAV_ENTRIES.join(" | "))
}

/// The whole screen: navigation state plus one panel per category
#[derive(Debug, Clone, Default)]
pub struct Shell {
    active: Option<ActiveElement>,
    pub strategy: StrategyPanel,
    pub interventions: InterventionsPanel,
    pub schedule: SchedulePanel,
    pub metrics: MetricsPanel,
    pub risks: RisksPanel,
    pub stakeholders: StakeholdersPanel,
}

impl Shell {
    /// Create shell with nothing active
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active category
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<ActiveElement> {
        self.active
    }

    /// Switch category
    pub fn activate(&mut self, element: Option<ActiveElement>) {
        self.active = element;
    }

    /// Point every strategy-scoped panel at one strategy
    pub fn select_strategy(&mut self, state: &PlanState, strategy: Option<StrategyId>) {
        self.interventions.select(strategy);
        self.schedule.select(strategy);
        self.risks.select(strategy);
        self.metrics.select(state, strategy.map(Into::into));
    }

    fn panel(&self, element: ActiveElement) -> &dyn Panel {
        match element {
            ActiveElement::Strategy => &self.strategy,
            ActiveElement::Interventions => &self.interventions,
            ActiveElement::Schedule => &self.schedule,
            ActiveElement::SuccessMetrics => &self.metrics,
            ActiveElement::RisksAndIssues => &self.risks,
            ActiveElement::Stakeholders => &self.stakeholders,
        }
    }

    /// Middle pane text
    #[must_use]
    pub fn render_detail(&self, state: &PlanState) -> String {
        match self.active {
            Some(element) => self.panel(element).render(state),
            None => format!("{PLACEHOLDER}\n"),
        }
    }

    /// Render banner, left pane and middle pane side by side
    #[must_use]
    pub fn render(&self, state: &PlanState) -> String {
        let left: Vec<String> = ActiveElement::ALL
            .iter()
            .map(|e| {
                let marker = if Some(*e) == self.active { '>' } else { ' ' };
                format!("{marker} {}", e.label())
            })
            .collect();
        let width = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let detail = self.render_detail(state);
        let detail: Vec<&str> = detail.lines().collect();

        let mut out = banner();
        out.push_str(&"=".repeat(width + 3 + 40));
        out.push('\n');
        for i in 0..left.len().max(detail.len()) {
            let l = left.get(i).map_or("", String::as_str);
            let d = detail.get(i).copied().unwrap_or("");
            let line = format!("{l:<width$} | {d}");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
