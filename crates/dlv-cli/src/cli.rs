//! Command-line grammar

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn text(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn strategy_arg() -> Arg {
    Arg::new("strategy")
        .long("strategy")
        .short('s')
        .required(true)
        .help("Parent strategy: id or #N")
}

fn target_arg(help: &'static str) -> Arg {
    Arg::new("target").required(true).help(help)
}

fn strategy_fields(cmd: Command) -> Command {
    cmd.arg(text("title", "Strategy title"))
        .arg(text("description", "Strategy description"))
        .arg(text("owner", "Responsible owner"))
        .arg(text("reference", "Reference information"))
}

fn intervention_fields(cmd: Command) -> Command {
    cmd.arg(text("title", "Intervention title"))
        .arg(text("description", "Intervention description"))
        .arg(text("owner", "Responsible owner"))
        .arg(text("end", "Target end date (YYYY-MM-DD)"))
}

fn schedule_fields(cmd: Command) -> Command {
    cmd.arg(text("title", "Item title"))
        .arg(text("description", "Item description"))
        .arg(text("start", "Start date (YYYY-MM-DD)"))
        .arg(text("end", "End date (YYYY-MM-DD)"))
        .arg(text("status", "Not started, In progress, For review, Completed or Requires attention"))
}

fn risk_fields(cmd: Command) -> Command {
    cmd.arg(text("intervention", "Related intervention title"))
        .arg(text("kind", "Risk or Issue"))
        .arg(text("description", "What could go wrong, or has"))
        .arg(text("likelihood", "Low, Medium or High"))
        .arg(text("impact", "Low, Medium or High"))
        .arg(text("mitigation", "Mitigating actions"))
        .arg(text("post-likelihood", "Likelihood after mitigation"))
        .arg(text("post-impact", "Impact after mitigation"))
        .arg(text("comment", "Free comment"))
}

fn stakeholder_fields(cmd: Command) -> Command {
    cmd.arg(text("name", "Stakeholder name"))
        .arg(text("role", "Role"))
        .arg(text("email", "Email address"))
        .arg(text("phone", "Phone number"))
        .arg(text("contact", "Preferred contact: Email, Phone or Text"))
        .arg(text("comment", "Free comment"))
}

fn strategy_command() -> Command {
    Command::new("strategy")
        .about("Create, list, edit and remove strategies")
        .subcommand_required(true)
        .subcommand(strategy_fields(Command::new("add").about("Add a strategy")))
        .subcommand(Command::new("list").about("List strategies"))
        .subcommand(strategy_fields(
            Command::new("update")
                .about("Edit a strategy in place")
                .arg(target_arg("Strategy: id or #N")),
        ))
        .subcommand(
            Command::new("remove")
                .about("Remove a strategy")
                .arg(target_arg("Strategy: id or #N"))
                .arg(
                    Arg::new("policy")
                        .long("policy")
                        .value_parser(["cascade", "block", "orphan"])
                        .help("Override the configured delete policy: cascade, block or orphan"),
                ),
        )
}

fn intervention_command() -> Command {
    Command::new("intervention")
        .about("Interventions of one strategy")
        .subcommand_required(true)
        .subcommand(intervention_fields(
            Command::new("add").about("Add an intervention").arg(strategy_arg()),
        ))
        .subcommand(Command::new("list").about("List by target end date").arg(strategy_arg()))
        .subcommand(intervention_fields(
            Command::new("update")
                .about("Edit an intervention in place")
                .arg(strategy_arg())
                .arg(target_arg("Intervention: id or #N")),
        ))
        .subcommand(
            Command::new("remove")
                .about("Remove an intervention")
                .arg(strategy_arg())
                .arg(target_arg("Intervention: id or #N")),
        )
}

fn schedule_command() -> Command {
    Command::new("schedule")
        .about("Schedule items and the Gantt view of one strategy")
        .subcommand_required(true)
        .subcommand(schedule_fields(
            Command::new("add").about("Add a schedule item").arg(strategy_arg()),
        ))
        .subcommand(Command::new("list").about("List by start date").arg(strategy_arg()))
        .subcommand(schedule_fields(
            Command::new("update")
                .about("Edit a schedule item in place")
                .arg(strategy_arg())
                .arg(target_arg("Schedule item: id or #N")),
        ))
        .subcommand(
            Command::new("remove")
                .about("Remove a schedule item")
                .arg(strategy_arg())
                .arg(target_arg("Schedule item: id or #N")),
        )
        .subcommand(
            Command::new("clear")
                .about("Remove every schedule item of the strategy")
                .arg(strategy_arg()),
        )
        .subcommand(
            Command::new("gantt")
                .about("Draw the Gantt chart")
                .arg(strategy_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the layout as JSON"),
                )
                .arg(
                    Arg::new("by-days")
                        .long("by-days")
                        .action(ArgAction::SetTrue)
                        .help("Lay bars out at a fixed width per day"),
                ),
        )
}

fn selection_arg() -> Arg {
    Arg::new("selection")
        .long("selection")
        .required(true)
        .help("Strategy (id or #N) or any other label")
}

fn metrics_command() -> Command {
    Command::new("metrics")
        .about("Success metrics grid and chart")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Set one cell and save the grid")
                .arg(selection_arg())
                .arg(
                    Arg::new("row")
                        .long("row")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("1-based row; missing rows are added"),
                )
                .arg(
                    Arg::new("column")
                        .long("column")
                        .required(true)
                        .help("Column title or 1-based column number"),
                )
                .arg(
                    Arg::new("value")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Cell value"),
                ),
        )
        .subcommand(
            Command::new("add-column")
                .about("Append a column and save the grid")
                .arg(selection_arg())
                .arg(Arg::new("title").required(true).help("Column title")),
        )
        .subcommand(
            Command::new("delete-column")
                .about("Delete a column and save the grid")
                .arg(selection_arg())
                .arg(
                    Arg::new("column")
                        .required(true)
                        .help("Column title or 1-based column number"),
                ),
        )
        .subcommand(Command::new("show").about("Show the saved grid").arg(selection_arg()))
        .subcommand(
            Command::new("chart")
                .about("Chart the saved grid")
                .arg(selection_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the chart data as JSON"),
                ),
        )
}

fn risk_command() -> Command {
    Command::new("risk")
        .about("Risks and issues of one strategy")
        .subcommand_required(true)
        .subcommand(risk_fields(
            Command::new("add").about("Add a risk or issue").arg(strategy_arg()),
        ))
        .subcommand(Command::new("list").about("List risks and issues").arg(strategy_arg()))
        .subcommand(risk_fields(
            Command::new("update")
                .about("Edit a risk or issue in place")
                .arg(strategy_arg())
                .arg(target_arg("Row: id or #N")),
        ))
        .subcommand(
            Command::new("remove")
                .about("Remove a risk or issue")
                .arg(strategy_arg())
                .arg(target_arg("Row: id or #N")),
        )
}

fn stakeholder_command() -> Command {
    Command::new("stakeholder")
        .about("Stakeholder contacts")
        .subcommand_required(true)
        .subcommand(stakeholder_fields(Command::new("add").about("Add a stakeholder")))
        .subcommand(Command::new("list").about("List stakeholders"))
        .subcommand(stakeholder_fields(
            Command::new("update")
                .about("Edit a stakeholder in place")
                .arg(target_arg("Stakeholder: id or #N")),
        ))
        .subcommand(
            Command::new("remove")
                .about("Remove a stakeholder")
                .arg(target_arg("Stakeholder: id or #N")),
        )
}

/// Build the `dlv` command
#[must_use]
pub fn command() -> Command {
    Command::new("dlv")
        .version(dlv_model::VERSION)
        .about("Delivery Tool: plan strategies, interventions, schedules, metrics, risks and stakeholders")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON data file (overrides config and DLV_DATA)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("show")
                .about("Render the navigation shell")
                .arg(
                    Arg::new("panel")
                        .long("panel")
                        .short('p')
                        .help("Active category, e.g. schedule or success-metrics"),
                )
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .short('s')
                        .help("Selected strategy: id or #N"),
                ),
        )
        .subcommand(strategy_command())
        .subcommand(intervention_command())
        .subcommand(schedule_command())
        .subcommand(metrics_command())
        .subcommand(risk_command())
        .subcommand(stakeholder_command())
}
