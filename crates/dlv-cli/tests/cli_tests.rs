//! End-to-end command tests against a real data file

use dlv_cli::{command, config_from_matches, App};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

/// One `dlv` invocation: load, run, flush, drop
fn dlv(data: &Path, args: &[&str]) -> anyhow::Result<String> {
    let data = data.to_string_lossy().into_owned();
    let argv = ["dlv", "--data", data.as_str()]
        .into_iter()
        .chain(args.iter().copied());
    let matches = command().try_get_matches_from(argv)?;
    let config = config_from_matches(&matches)?;
    let mut app = App::open(config)?;
    let output = app.run(&matches);
    app.flush()?;
    output
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("plan.json");
    (dir, data)
}

fn add_strategy(data: &Path, title: &str) {
    dlv(
        data,
        &[
            "strategy", "add", "--title", title, "--description", "desc", "--owner", "Ops",
            "--reference", "ref",
        ],
    )
    .unwrap();
}

#[test]
fn state_survives_between_invocations() {
    let (_dir, data) = setup();
    add_strategy(&data, "Reduce waiting lists");
    dlv(
        &data,
        &[
            "intervention", "add", "-s", "#1", "--title", "Pilot clinic", "--description", "d",
            "--owner", "o", "--end", "2024-06-30",
        ],
    )
    .unwrap();

    let listing = dlv(&data, &["intervention", "list", "-s", "#1"]).unwrap();
    assert!(listing.contains("Pilot clinic"));

    let raw = std::fs::read_to_string(&data).unwrap();
    let object: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(object.get("planState").is_some());
    assert!(object.get("metricsData").is_some());
}

#[test]
fn intervention_appears_only_under_its_strategy() {
    let (_dir, data) = setup();
    add_strategy(&data, "A");
    add_strategy(&data, "B");
    dlv(
        &data,
        &[
            "intervention", "add", "-s", "#1", "--title", "Only A", "--description", "d",
            "--owner", "o", "--end", "2024-02-01",
        ],
    )
    .unwrap();

    assert!(dlv(&data, &["show", "-p", "interventions", "-s", "#1"])
        .unwrap()
        .contains("Only A"));
    assert!(!dlv(&data, &["show", "-p", "interventions", "-s", "#2"])
        .unwrap()
        .contains("Only A"));
}

#[test]
fn metrics_saved_under_their_own_key_and_charted() {
    let (_dir, data) = setup();
    add_strategy(&data, "A");
    for (row, date, baseline) in [("1", "01032024", "120"), ("2", "01012024", "150")] {
        dlv(
            &data,
            &["metrics", "set", "--selection", "#1", "--row", row, "--column", "2", date],
        )
        .unwrap();
        dlv(
            &data,
            &[
                "metrics", "set", "--selection", "#1", "--row", row, "--column", "Baseline",
                baseline,
            ],
        )
        .unwrap();
    }

    let raw = std::fs::read_to_string(&data).unwrap();
    let object: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let blob: serde_json::Value =
        serde_json::from_str(object["metricsData"].as_str().unwrap()).unwrap();
    assert_eq!(blob.as_object().unwrap().len(), 1);

    let chart = dlv(&data, &["metrics", "chart", "--selection", "#1", "--json"]).unwrap();
    let chart: serde_json::Value = serde_json::from_str(&chart).unwrap();
    assert_eq!(chart["y_min"], serde_json::json!(120.0));
    assert_eq!(chart["y_max"], serde_json::json!(150.0));
    assert_eq!(chart["labels"][0], "2024-01-01");
    assert_eq!(chart["series"][0]["label"], "Baseline");
}

#[test]
fn cascade_removes_dependents_from_disk() {
    let (_dir, data) = setup();
    add_strategy(&data, "A");
    dlv(
        &data,
        &[
            "schedule", "add", "-s", "#1", "--title", "Kick-off", "--description", "d",
            "--start", "2024-01-01", "--end", "2024-01-11",
        ],
    )
    .unwrap();
    dlv(&data, &["risk", "add", "-s", "#1", "--description", "Staff shortage"]).unwrap();

    let blocked = dlv(&data, &["strategy", "remove", "#1", "--policy", "block"]);
    assert!(blocked.is_err());

    dlv(&data, &["strategy", "remove", "#1"]).unwrap();
    let listing = dlv(&data, &["strategy", "list"]).unwrap();
    assert!(!listing.contains("Kick-off"));
    assert!(dlv(&data, &["schedule", "list", "-s", "#1"]).is_err());
}

#[test]
fn stakeholders_edit_and_remove_by_position() {
    let (_dir, data) = setup();
    dlv(&data, &["stakeholder", "add", "--name", "Grace", "--contact", "phone"]).unwrap();
    dlv(&data, &["stakeholder", "update", "#1", "--role", "Sponsor"]).unwrap();
    let listing = dlv(&data, &["stakeholder", "list"]).unwrap();
    assert!(listing.contains("Sponsor"));
    assert!(listing.contains("Grace"));

    dlv(&data, &["stakeholder", "remove", "#1"]).unwrap();
    assert!(dlv(&data, &["stakeholder", "remove", "#1"]).is_err());
}

#[test]
fn gantt_bars_stay_inside_the_timeline() {
    let (_dir, data) = setup();
    add_strategy(&data, "A");
    for (title, start, end) in [
        ("Design", "2024-01-01", "2024-01-31"),
        ("Build", "2024-02-01", "2024-03-31"),
    ] {
        dlv(
            &data,
            &[
                "schedule", "add", "-s", "#1", "--title", title, "--description", "d", "--start",
                start, "--end", end,
            ],
        )
        .unwrap();
    }
    let layout = dlv(&data, &["schedule", "gantt", "-s", "#1", "--json"]).unwrap();
    let layout: serde_json::Value = serde_json::from_str(&layout).unwrap();
    let scale = layout["scale"].as_f64().unwrap();
    for bar in layout["bars"].as_array().unwrap() {
        let offset = bar["offset"].as_f64().unwrap();
        let width = bar["width"].as_f64().unwrap();
        assert!(offset >= 0.0 && width >= 0.0);
        assert!(offset + width <= scale + 1e-9);
    }
}

#[test]
fn config_file_sets_delete_policy() {
    let (dir, data) = setup();
    let config = dir.path().join("dlv.toml");
    std::fs::write(&config, "delete_policy = \"block\"\n").unwrap();
    let config = config.to_string_lossy().into_owned();

    add_strategy(&data, "A");
    dlv(&data, &["risk", "add", "-s", "#1", "--description", "x"]).unwrap();
    let err = dlv(&data, &["--config", config.as_str(), "strategy", "remove", "#1"]).unwrap_err();
    assert!(err.to_string().contains("dependent"));
}

#[test]
fn unreadable_metrics_survive_plan_edits() {
    let (_dir, data) = setup();
    std::fs::write(&data, r#"{"metricsData":"{\"trunc"}"#).unwrap();

    add_strategy(&data, "A");
    assert!(dlv(&data, &["strategy", "list"]).unwrap().contains("A"));

    let raw = std::fs::read_to_string(&data).unwrap();
    let object: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(object["metricsData"], "{\"trunc");
    assert!(object.get("metricsData.corrupt").is_none());
}
