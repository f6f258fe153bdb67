//! Command execution
//!
//! An [`App`] loads the plan once, runs one command through the panels and
//! stages the new state when the command changed anything. Output is
//! returned as text so callers decide where it goes.

use crate::address::{resolve_row, resolve_selection, resolve_strategy};
use anyhow::{anyhow, bail, Context};
use clap::ArgMatches;
use dlv_model::{
    DeletePolicy, InterventionDraft, ModelError, PlannerConfig, RecordId, RiskDraft,
    ScheduleDraft, StakeholderDraft, StrategyDraft, StrategyId,
};
use dlv_panels::{render_chart, render_gantt, ActiveElement, Panel, Shell};
use dlv_persist::{FileStorage, KeyValueStorage, PlanPersistence};
use dlv_store::{Action, Address, PlanState, PlanStore};
use dlv_views::{interventions_by_end_date, layout_by_days, schedule_by_start_date};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

const NOTHING_SAVED: &str = "Nothing saved: a required field is blank\n";

/// Build the effective configuration from `--config`, `DLV_DATA` and `--data`
///
/// # Errors
/// Returns an error when the config file cannot be read or is invalid
pub fn config_from_matches(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(path) = matches.get_one::<PathBuf>("data") {
        config = config.with_storage_path(path);
    }
    Ok(config)
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> Option<&'a str> {
    args.get_one::<String>(name).map(String::as_str)
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    arg(args, name).ok_or_else(|| anyhow!("missing argument: {name}"))
}

fn fill(field: &mut String, args: &ArgMatches, name: &str) {
    if let Some(value) = arg(args, name) {
        *field = value.to_string();
    }
}

fn fill_parsed<T>(field: &mut T, args: &ArgMatches, name: &str) -> Result<(), ModelError>
where
    T: FromStr<Err = ModelError>,
{
    if let Some(value) = arg(args, name) {
        *field = value.parse()?;
    }
    Ok(())
}

fn fill_strategy(draft: &mut StrategyDraft, args: &ArgMatches) {
    fill(&mut draft.title, args, "title");
    fill(&mut draft.description, args, "description");
    fill(&mut draft.owner, args, "owner");
    fill(&mut draft.reference_info, args, "reference");
}

fn fill_intervention(draft: &mut InterventionDraft, args: &ArgMatches) {
    fill(&mut draft.title, args, "title");
    fill(&mut draft.description, args, "description");
    fill(&mut draft.owner, args, "owner");
    fill(&mut draft.target_end_date, args, "end");
}

fn fill_schedule(draft: &mut ScheduleDraft, args: &ArgMatches) -> Result<(), ModelError> {
    fill(&mut draft.title, args, "title");
    fill(&mut draft.description, args, "description");
    fill(&mut draft.start_date, args, "start");
    fill(&mut draft.end_date, args, "end");
    fill_parsed(&mut draft.status, args, "status")
}

fn fill_risk(draft: &mut RiskDraft, args: &ArgMatches) -> Result<(), ModelError> {
    fill(&mut draft.intervention_title, args, "intervention");
    fill_parsed(&mut draft.kind, args, "kind")?;
    fill(&mut draft.description, args, "description");
    fill_parsed(&mut draft.likelihood, args, "likelihood")?;
    fill_parsed(&mut draft.impact, args, "impact")?;
    fill(&mut draft.mitigation, args, "mitigation");
    fill_parsed(&mut draft.post_mitigation_likelihood, args, "post-likelihood")?;
    fill_parsed(&mut draft.post_mitigation_impact, args, "post-impact")?;
    fill(&mut draft.comment, args, "comment");
    Ok(())
}

fn fill_stakeholder(draft: &mut StakeholderDraft, args: &ArgMatches) -> Result<(), ModelError> {
    fill(&mut draft.name, args, "name");
    fill(&mut draft.role, args, "role");
    fill(&mut draft.email, args, "email");
    fill(&mut draft.phone, args, "phone");
    fill_parsed(&mut draft.preferred_contact, args, "contact")?;
    fill(&mut draft.comment, args, "comment");
    Ok(())
}

fn parse_policy(text: &str) -> anyhow::Result<DeletePolicy> {
    match text {
        "cascade" => Ok(DeletePolicy::Cascade),
        "block" => Ok(DeletePolicy::Block),
        "orphan" => Ok(DeletePolicy::Orphan),
        other => bail!("unknown delete policy: {other}"),
    }
}

fn saved_or_not<T: std::fmt::Display>(kind: &str, saved: Option<T>) -> String {
    match saved {
        Some(id) => format!("Added {kind} {id}\n"),
        None => NOTHING_SAVED.to_string(),
    }
}

fn updated_or_not(kind: &str, saved: bool) -> String {
    if saved {
        format!("Updated {kind}\n")
    } else {
        NOTHING_SAVED.to_string()
    }
}

/// Loaded plan plus the panels that edit it
#[derive(Debug)]
pub struct App<S: KeyValueStorage> {
    config: PlannerConfig,
    store: PlanStore,
    shell: Shell,
    persistence: PlanPersistence<S>,
}

impl App<FileStorage> {
    /// Open the data file named by the configuration
    ///
    /// # Errors
    /// Returns an error when the data file exists but cannot be loaded
    pub fn open(config: PlannerConfig) -> anyhow::Result<Self> {
        let persistence = PlanPersistence::open(&config.storage)
            .with_context(|| format!("failed to open {}", config.storage.path.display()))?;
        Self::with_persistence(config, persistence)
    }
}

impl<S: KeyValueStorage> App<S> {
    /// Load the plan through any persistence backend
    ///
    /// # Errors
    /// Returns an error when the stored plan cannot be decoded
    pub fn with_persistence(
        config: PlannerConfig,
        mut persistence: PlanPersistence<S>,
    ) -> anyhow::Result<Self> {
        let state = persistence.load().context("failed to load plan")?;
        let store = PlanStore::from_state(state).with_policy(config.delete_policy);
        let mut shell = Shell::new();
        shell.schedule.display_scale = config.display_scale;
        Ok(Self {
            config,
            store,
            shell,
            persistence,
        })
    }

    /// Current plan
    #[inline]
    #[must_use]
    pub fn state(&self) -> &PlanState {
        self.store.state()
    }

    /// Persistence layer
    #[inline]
    pub fn persistence(&self) -> &PlanPersistence<S> {
        &self.persistence
    }

    /// Run one parsed command and return its output
    ///
    /// A command that changed the plan stages it for writing; call
    /// [`App::flush`] (or drop the app) to write it.
    ///
    /// # Errors
    /// Returns addressing, validation, store and persistence errors
    pub fn run(&mut self, matches: &ArgMatches) -> anyhow::Result<String> {
        let before = self.store.revision();
        let output = match matches.subcommand() {
            Some(("show", args)) => self.show(args),
            Some(("strategy", args)) => self.strategy(args),
            Some(("intervention", args)) => self.intervention(args),
            Some(("schedule", args)) => self.schedule(args),
            Some(("metrics", args)) => self.metrics(args),
            Some(("risk", args)) => self.risk(args),
            Some(("stakeholder", args)) => self.stakeholder(args),
            Some((other, _)) => Err(anyhow!("unknown command: {other}")),
            None => Err(anyhow!("no command given")),
        };
        // A command can fail after earlier dispatches succeeded; keep those
        if self.store.revision() == before {
            debug!("plan unchanged, nothing staged");
        } else {
            let outcome = self.persistence.save(self.store.state())?;
            info!(revision = self.store.revision(), ?outcome, "plan staged");
        }
        output
    }

    /// Write everything pending
    ///
    /// # Errors
    /// Returns the first write error; unwritten payloads stay pending
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let result = self.persistence.flush()?;
        debug!(committed = result.committed, "flushed");
        Ok(())
    }

    fn select(&mut self, args: &ArgMatches) -> anyhow::Result<StrategyId> {
        let id = resolve_strategy(self.store.state(), required(args, "strategy")?)?;
        self.shell.select_strategy(self.store.state(), Some(id));
        Ok(id)
    }

    fn show(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        if let Some(text) = arg(args, "strategy") {
            let id = resolve_strategy(self.store.state(), text)?;
            self.shell.select_strategy(self.store.state(), Some(id));
        }
        let panel = arg(args, "panel")
            .map(str::parse::<ActiveElement>)
            .transpose()?;
        self.shell.activate(panel);
        Ok(self.shell.render(self.store.state()))
    }

    fn strategy(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        match args.subcommand() {
            Some(("add", sub)) => {
                let panel = &mut self.shell.strategy;
                panel.draft = StrategyDraft::default();
                fill_strategy(&mut panel.draft, sub);
                Ok(saved_or_not("strategy", panel.save(&mut self.store)?))
            }
            Some(("list", _)) => Ok(self.shell.strategy.render(self.store.state())),
            Some(("update", sub)) => {
                let id = resolve_strategy(self.store.state(), required(sub, "target")?)?;
                let panel = &mut self.shell.strategy;
                panel.begin_edit(self.store.state(), id)?;
                if let Some(draft) = panel.edit_draft_mut() {
                    fill_strategy(draft, sub);
                }
                Ok(updated_or_not("strategy", panel.save_edit(&mut self.store)?))
            }
            Some(("remove", sub)) => {
                let id = resolve_strategy(self.store.state(), required(sub, "target")?)?;
                let title = self
                    .store
                    .state()
                    .strategy(id)
                    .map(|s| s.title.clone())
                    .unwrap_or_default();
                match arg(sub, "policy") {
                    Some(policy) => {
                        let policy = parse_policy(policy)?;
                        self.store.dispatch(Action::RemoveStrategy {
                            target: Address::Id(id),
                            policy,
                        })?;
                    }
                    None => self.shell.strategy.remove(&mut self.store, Address::Id(id))?,
                }
                Ok(format!("Removed strategy {title}\n"))
            }
            _ => bail!("unknown strategy command"),
        }
    }

    fn intervention_row(&self, strategy: StrategyId, text: &str) -> anyhow::Result<RecordId> {
        let items = self.store.state().interventions_for(strategy);
        Ok(resolve_row(&interventions_by_end_date(&items), text)?)
    }

    fn intervention(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        let Some((command, sub)) = args.subcommand() else {
            bail!("missing intervention command");
        };
        let strategy = self.select(sub)?;
        match command {
            "add" => {
                let panel = &mut self.shell.interventions;
                panel.draft = InterventionDraft::default();
                fill_intervention(&mut panel.draft, sub);
                Ok(saved_or_not("intervention", panel.save(&mut self.store)?))
            }
            "list" => Ok(self.shell.interventions.render(self.store.state())),
            "update" => {
                let id = self.intervention_row(strategy, required(sub, "target")?)?;
                let panel = &mut self.shell.interventions;
                panel.begin_edit(self.store.state(), id)?;
                if let Some(draft) = panel.edit_draft_mut() {
                    fill_intervention(draft, sub);
                }
                Ok(updated_or_not("intervention", panel.save_edit(&mut self.store)?))
            }
            "remove" => {
                let id = self.intervention_row(strategy, required(sub, "target")?)?;
                self.shell.interventions.remove(&mut self.store, id)?;
                Ok(format!("Removed intervention {id}\n"))
            }
            other => bail!("unknown intervention command: {other}"),
        }
    }

    fn schedule_row(&self, strategy: StrategyId, text: &str) -> anyhow::Result<RecordId> {
        let items = self.store.state().schedule_for(strategy);
        Ok(resolve_row(&schedule_by_start_date(&items), text)?)
    }

    fn schedule(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        let Some((command, sub)) = args.subcommand() else {
            bail!("missing schedule command");
        };
        let strategy = self.select(sub)?;
        match command {
            "add" => {
                let panel = &mut self.shell.schedule;
                panel.draft = ScheduleDraft::default();
                fill_schedule(&mut panel.draft, sub)?;
                Ok(saved_or_not("schedule item", panel.save(&mut self.store)?))
            }
            "list" => Ok(self.shell.schedule.render(self.store.state())),
            "update" => {
                let id = self.schedule_row(strategy, required(sub, "target")?)?;
                let panel = &mut self.shell.schedule;
                panel.begin_edit(self.store.state(), id)?;
                if let Some(draft) = panel.edit_draft_mut() {
                    fill_schedule(draft, sub)?;
                }
                Ok(updated_or_not("schedule item", panel.save_edit(&mut self.store)?))
            }
            "remove" => {
                let id = self.schedule_row(strategy, required(sub, "target")?)?;
                self.shell.schedule.remove(&mut self.store, id)?;
                Ok(format!("Removed schedule item {id}\n"))
            }
            "clear" => {
                self.shell.schedule.clear(&mut self.store)?;
                Ok("Schedule cleared\n".to_string())
            }
            "gantt" => {
                let layout = if sub.get_flag("by-days") {
                    layout_by_days(
                        &self.store.state().schedule_for(strategy),
                        self.config.px_per_day,
                    )
                } else {
                    self.shell
                        .schedule
                        .gantt(self.store.state())
                        .ok_or_else(|| anyhow!("no strategy selected"))?
                };
                if sub.get_flag("json") {
                    return Ok(format!("{}\n", serde_json::to_string_pretty(&layout)?));
                }
                if layout.is_empty() {
                    return Ok("No schedule items\n".to_string());
                }
                Ok(render_gantt(&layout))
            }
            other => bail!("unknown schedule command: {other}"),
        }
    }

    fn metrics(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        let Some((command, sub)) = args.subcommand() else {
            bail!("missing metrics command");
        };
        let key = resolve_selection(self.store.state(), required(sub, "selection")?)?;
        self.shell.metrics.select(self.store.state(), Some(key.clone()));
        let panel = &mut self.shell.metrics;
        match command {
            "set" => {
                let row = sub
                    .get_one::<usize>("row")
                    .copied()
                    .filter(|r| *r >= 1)
                    .ok_or_else(|| anyhow!("rows are numbered from 1"))?;
                let col = column_index(panel.grid().columns(), required(sub, "column")?)?;
                while panel.grid().rows().len() < row {
                    panel.add_row();
                }
                panel.set_cell(row - 1, col, required(sub, "value")?)?;
                panel.save(&mut self.store)?;
                let cell = panel.grid().cell(row - 1, col).unwrap_or_default();
                let title = &panel.grid().columns()[col];
                Ok(format!("Saved row {row}, {title}: {cell}\n"))
            }
            "add-column" => {
                if !panel.add_column(required(sub, "title")?) {
                    return Ok("Nothing saved: column title is blank\n".to_string());
                }
                panel.save(&mut self.store)?;
                Ok("Column added\n".to_string())
            }
            "delete-column" => {
                let col = column_index(panel.grid().columns(), required(sub, "column")?)?;
                let title = panel.delete_column(col)?;
                panel.save(&mut self.store)?;
                Ok(format!("Column {title} deleted\n"))
            }
            "show" => Ok(panel.render(self.store.state())),
            "chart" => {
                let Some(data) = panel.chart(self.store.state()) else {
                    return Ok(format!("No saved metrics for {}\n", key.as_str()));
                };
                if sub.get_flag("json") {
                    return Ok(format!("{}\n", serde_json::to_string_pretty(&data)?));
                }
                Ok(render_chart(&data))
            }
            other => bail!("unknown metrics command: {other}"),
        }
    }

    fn risk_row(&self, strategy: StrategyId, text: &str) -> anyhow::Result<RecordId> {
        let items = self.store.state().risks_for(strategy);
        let rows: Vec<_> = items.iter().collect();
        Ok(resolve_row(&rows, text)?)
    }

    fn risk(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        let Some((command, sub)) = args.subcommand() else {
            bail!("missing risk command");
        };
        let strategy = self.select(sub)?;
        match command {
            "add" => {
                let panel = &mut self.shell.risks;
                if let Some(draft) = panel.row_mut(0) {
                    *draft = RiskDraft::default();
                    fill_risk(draft, sub)?;
                }
                let saved = panel.save(&mut self.store)?;
                Ok(saved_or_not("risk", saved.first()))
            }
            "list" => Ok(self.shell.risks.render(self.store.state())),
            "update" => {
                let id = self.risk_row(strategy, required(sub, "target")?)?;
                let panel = &mut self.shell.risks;
                panel.begin_edit(self.store.state(), id)?;
                if let Some(draft) = panel.edit_draft_mut() {
                    fill_risk(draft, sub)?;
                }
                Ok(updated_or_not("risk", panel.save_edit(&mut self.store)?))
            }
            "remove" => {
                let id = self.risk_row(strategy, required(sub, "target")?)?;
                self.shell.risks.remove(&mut self.store, id)?;
                Ok(format!("Removed risk {id}\n"))
            }
            other => bail!("unknown risk command: {other}"),
        }
    }

    fn stakeholder_row(&self, text: &str) -> anyhow::Result<RecordId> {
        let rows: Vec<_> = self.store.state().stakeholders.iter().collect();
        Ok(resolve_row(&rows, text)?)
    }

    fn stakeholder(&mut self, args: &ArgMatches) -> anyhow::Result<String> {
        match args.subcommand() {
            Some(("add", sub)) => {
                let panel = &mut self.shell.stakeholders;
                if let Some(draft) = panel.row_mut(0) {
                    *draft = StakeholderDraft::default();
                    fill_stakeholder(draft, sub)?;
                }
                let saved = panel.save(&mut self.store)?;
                Ok(saved_or_not("stakeholder", saved.first()))
            }
            Some(("list", _)) => Ok(self.shell.stakeholders.render(self.store.state())),
            Some(("update", sub)) => {
                let id = self.stakeholder_row(required(sub, "target")?)?;
                let panel = &mut self.shell.stakeholders;
                panel.begin_edit(self.store.state(), id)?;
                if let Some(draft) = panel.edit_draft_mut() {
                    fill_stakeholder(draft, sub)?;
                }
                Ok(updated_or_not("stakeholder", panel.save_edit(&mut self.store)?))
            }
            Some(("remove", sub)) => {
                let id = self.stakeholder_row(required(sub, "target")?)?;
                self.shell.stakeholders.remove(&mut self.store, Address::Id(id))?;
                Ok(format!("Removed stakeholder {id}\n"))
            }
            _ => bail!("unknown stakeholder command"),
        }
    }
}

/// Find a column by 1-based number or by title
fn column_index(columns: &[String], text: &str) -> anyhow::Result<usize> {
    let text = text.trim();
    if let Ok(n) = text.parse::<usize>() {
        if (1..=columns.len()).contains(&n) {
            return Ok(n - 1);
        }
        bail!("no column {n} (grid has {} columns)", columns.len());
    }
    columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case(text))
        .ok_or_else(|| anyhow!("no column titled {text:?}"))
}
