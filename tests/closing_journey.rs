//! Behavioural integration tests for the closing workflow.
//!
//! These tests drive a case through the orchestrator the way a host
//! application would, from opening through recording, verifying stage
//! gating, task generation, history, and timeline estimates end to end.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]
#![expect(
    clippy::cognitive_complexity,
    reason = "Test functions may have higher complexity for full scenario coverage"
)]
#![expect(
    clippy::shadow_unrelated,
    reason = "Test code reuses variable names for clarity in sequential assertions"
)]

use deedflow::closing::{
    adapters::memory::InMemoryClosingStore,
    domain::{
        CaseSeed, ClosingPlan, DocumentKind, HistoryEntry, PartyId, RoleAssignments, Stage,
        WorkItemStatus,
    },
    ports::WorkItemStore,
    services::{CaseOrchestrator, CaseWorkflowError},
};
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::runtime::Runtime;

type Orchestrator = CaseOrchestrator<
    InMemoryClosingStore,
    InMemoryClosingStore,
    InMemoryClosingStore,
    DefaultClock,
>;

/// Creates a tokio runtime for async operations in tests.
fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

fn build_orchestrator() -> (Arc<InMemoryClosingStore>, Orchestrator) {
    let store = Arc::new(InMemoryClosingStore::new());
    let orchestrator = CaseOrchestrator::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::new(ClosingPlan::standard()),
        Arc::new(DefaultClock),
    );
    (store, orchestrator)
}

/// Opens a case, watches the first stage gate on its blocking items, then
/// completes them and advances into title search.
#[test]
fn stage_one_gates_until_its_blocking_items_complete() {
    let rt = test_runtime();
    let (store, orchestrator) = build_orchestrator();

    let buyer = PartyId::new("party-buyer").expect("buyer id");
    let title_officer = PartyId::new("party-title").expect("title officer id");
    let seed = CaseSeed::new("1 Elm Street, Springfield", 450_000.0)
        .with_earnest_money_amount(13_500.0)
        .with_roles(
            RoleAssignments::new()
                .with_buyer(buyer.clone())
                .with_title_officer(title_officer),
        );

    let mut case = rt.block_on(orchestrator.create(seed)).expect("create case");
    assert_eq!(case.current_stage(), Stage::OfferAccepted);
    assert_eq!(case.purchase_price(), 450_000.0);

    // Opening the case seeds the three stage-one blocking items.
    let items = rt
        .block_on(store.find_by_case(case.id()))
        .expect("list items");
    let titles: Vec<&str> = items.iter().map(|item| item.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Deposit earnest money",
            "Upload proof of funds",
            "Open escrow account"
        ]
    );
    assert!(items.iter().all(|item| item.blocking()));
    let deposit = &items[0];
    assert_eq!(deposit.assigned_to(), Some(&buyer));

    // The advance is refused while those items are open, naming them.
    let refusal = rt.block_on(orchestrator.advance(&mut case, None, false));
    match refusal {
        Err(CaseWorkflowError::Requirement(reason)) => {
            assert!(reason.to_string().contains("Deposit earnest money"));
        }
        other => panic!("expected a requirement refusal, got {other:?}"),
    }
    assert_eq!(case.current_stage(), Stage::OfferAccepted);

    // Record the deposit and complete every blocking item.
    rt.block_on(orchestrator.deposit_earnest_money(&mut case, 13_500.0, None, None))
        .expect("record deposit");
    for item in &items {
        rt.block_on(orchestrator.complete_work_item(item.id(), Some("jane.doe".to_owned())))
            .expect("complete item");
    }

    let eligibility = rt
        .block_on(orchestrator.can_advance(&case))
        .expect("check advance");
    assert!(eligibility.is_eligible());

    let new_items = rt
        .block_on(orchestrator.advance(&mut case, Some("title ordered".to_owned()), false))
        .expect("advance to title search");

    assert_eq!(case.current_stage(), Stage::TitleSearch);
    assert_eq!(case.history().len(), 3); // open + deposit event + stage entry
    let titles: Vec<&str> = new_items.iter().map(|item| item.title()).collect();
    assert_eq!(titles, vec!["Order title search", "Review title report"]);

    // The persisted copy matches the in-hand aggregate.
    let stored = rt
        .block_on(orchestrator.find_case(case.id()))
        .expect("find case")
        .expect("case exists");
    assert_eq!(stored, case);
}

/// Forces a case through every stage and verifies the audit trail,
/// closing stamps, and timeline estimates along the way.
#[test]
fn forced_run_reaches_recording_with_a_complete_audit_trail() {
    let rt = test_runtime();
    let (_store, orchestrator) = build_orchestrator();

    let seed = CaseSeed::new("22 Acacia Avenue", 780_000.0)
        .with_down_payment(156_000.0)
        .with_loan_amount(624_000.0);
    let mut case = rt.block_on(orchestrator.create(seed)).expect("create case");
    assert_eq!(orchestrator.estimate_days_to_close(&case), 13);

    while !case.current_stage().is_terminal() {
        assert!(
            case.actual_closing_date().is_none(),
            "the closing stamp must only appear at the terminal stage"
        );
        rt.block_on(orchestrator.advance(&mut case, None, true))
            .expect("forced advance");
    }

    assert_eq!(case.current_stage(), Stage::RecordingComplete);
    assert!(case.actual_closing_date().is_some());
    assert_eq!(orchestrator.estimate_days_to_close(&case), 0);

    // One stage entry per stage, in workflow order, the forced ones marked.
    let entries: Vec<&HistoryEntry> = case
        .history()
        .iter()
        .filter(|entry| entry.entered_stage().is_some())
        .collect();
    assert_eq!(entries.len(), 7);
    let visited: Vec<Stage> = entries
        .iter()
        .filter_map(|entry| entry.entered_stage())
        .collect();
    assert_eq!(visited, Stage::ORDER);
    for entry in entries.iter().skip(1) {
        match entry {
            HistoryEntry::StageEntered { forced, .. } => assert!(*forced),
            HistoryEntry::DomainEvent { .. } => panic!("expected stage entries only"),
        }
    }

    let progress = orchestrator.progress(&case);
    assert_eq!(progress.percent_complete, 100);
    assert!(
        progress
            .stages
            .iter()
            .all(|detail| detail.entered_at.is_some()),
        "every stage was visited and must carry its entry timestamp"
    );

    // The case is closed; nothing moves it further, forced or not.
    let result = rt.block_on(orchestrator.advance(&mut case, None, true));
    assert!(matches!(result, Err(CaseWorkflowError::Transition(_))));
}

/// Walks the document-gated middle stages with requirements honoured
/// rather than forced.
#[test]
fn document_requirements_gate_the_middle_stages() {
    let rt = test_runtime();
    let (store, orchestrator) = build_orchestrator();

    let seed = CaseSeed::new("7 Rue de la Paix", 1_200_000.0);
    let mut case = rt.block_on(orchestrator.create(seed)).expect("create case");

    let complete_blocking = |rt: &Runtime, case_id, stage| {
        let items = rt.block_on(store.find_by_case(case_id)).expect("list items");
        for item in items {
            if item.stage() == stage
                && item.blocking()
                && item.status() != WorkItemStatus::Completed
            {
                rt.block_on(orchestrator.complete_work_item(item.id(), None))
                    .expect("complete item");
            }
        }
    };

    complete_blocking(&rt, case.id(), Stage::OfferAccepted);
    rt.block_on(orchestrator.advance(&mut case, None, false))
        .expect("advance to title search");
    complete_blocking(&rt, case.id(), Stage::TitleSearch);
    rt.block_on(orchestrator.advance(&mut case, None, false))
        .expect("advance to underwriting");

    // Work items alone do not satisfy underwriting; the proof of funds
    // document must also be approved.
    complete_blocking(&rt, case.id(), Stage::Underwriting);
    let refusal = rt.block_on(orchestrator.advance(&mut case, None, false));
    match refusal {
        Err(CaseWorkflowError::Requirement(reason)) => {
            assert!(reason.to_string().contains("proof_of_funds"));
        }
        other => panic!("expected a requirement refusal, got {other:?}"),
    }

    store
        .approve_document(case.id(), DocumentKind::ProofOfFunds)
        .expect("approve document");
    rt.block_on(orchestrator.advance(&mut case, None, false))
        .expect("advance to clear to close");
    assert_eq!(case.current_stage(), Stage::ClearToClose);
    assert_eq!(orchestrator.estimate_days_to_close(&case), 6);
}
