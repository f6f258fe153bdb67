//! End-to-end flows through the shell

use dlv_model::{DeletePolicy, InterventionDraft, StrategyDraft};
use dlv_panels::{ActiveElement, Shell, PLACEHOLDER};
use dlv_store::{Address, PlanStore, StoreError};
use dlv_test_utils::seeded_plan;

fn strategy_draft(title: &str) -> StrategyDraft {
    StrategyDraft {
        title: title.into(),
        description: "desc".into(),
        owner: "owner".into(),
        reference_info: "ref".into(),
    }
}

#[test]
fn intervention_shows_only_under_its_strategy() {
    let mut store = PlanStore::new();
    let mut shell = Shell::new();

    shell.strategy.draft = strategy_draft("A");
    let a = shell.strategy.save(&mut store).unwrap().unwrap();
    shell.strategy.draft = strategy_draft("B");
    let b = shell.strategy.save(&mut store).unwrap().unwrap();

    shell.select_strategy(store.state(), Some(a));
    shell.interventions.draft = InterventionDraft {
        title: "Open clinic".into(),
        description: "Weekend slots".into(),
        owner: "Ops".into(),
        target_end_date: "2024-06-30".into(),
    };
    shell.interventions.save(&mut store).unwrap().unwrap();

    shell.activate(Some(ActiveElement::Interventions));
    let under_a = shell.render(store.state());
    assert!(under_a.contains("Open clinic"));
    assert!(under_a.contains("30-06-2024"));

    shell.select_strategy(store.state(), Some(b));
    let under_b = shell.render(store.state());
    assert!(!under_b.contains("Open clinic"));

    shell.activate(None);
    assert!(shell.render(store.state()).contains(PLACEHOLDER));
}

#[test]
fn every_panel_renders_seeded_plan() {
    let seeded = seeded_plan();
    let store = PlanStore::from_state(seeded.state);
    let mut shell = Shell::new();
    shell.select_strategy(store.state(), Some(seeded.first));

    for element in ActiveElement::ALL {
        shell.activate(Some(element));
        let text = shell.render(store.state());
        assert!(text.contains(&format!("> {}", element.label())));
    }

    shell.activate(Some(ActiveElement::SuccessMetrics));
    let text = shell.render(store.state());
    assert!(text.contains("Selection: Strategy A"));
    assert!(text.contains("Waiting list"));
}

#[test]
fn blocked_strategy_delete_surfaces_error() {
    let seeded = seeded_plan();
    let mut store = PlanStore::from_state(seeded.state).with_policy(DeletePolicy::Block);
    let mut shell = Shell::new();
    let err = shell
        .strategy
        .remove(&mut store, Address::Id(seeded.first))
        .unwrap_err();
    assert!(matches!(err, StoreError::DeleteBlocked { .. }));
    assert_eq!(store.state().strategies.len(), 2);
}
