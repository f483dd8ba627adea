//! Unit tests for the case aggregate.

#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]

use crate::closing::domain::{
    Case, CaseDomainError, CaseRole, CaseSeed, ClosingPlan, EarnestMoneyStatus, HistoryEntry,
    PartyId, PersistedCaseData, RoleAssignments, Stage, StageTransitionError,
};
use chrono::Duration;
use eyre::{OptionExt, bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn plan() -> ClosingPlan {
    ClosingPlan::standard()
}

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn seed() -> CaseSeed {
    CaseSeed::new("1 Elm Street, Springfield", 450_000.0)
}

#[rstest]
fn open_starts_at_the_first_stage(plan: ClosingPlan, clock: DefaultClock) -> eyre::Result<()> {
    let case = Case::open(seed(), &plan, &clock)?;

    ensure!(case.current_stage() == Stage::OfferAccepted);
    ensure!(case.property_address() == "1 Elm Street, Springfield");
    ensure!(case.earnest_money_status() == EarnestMoneyStatus::Pending);
    ensure!(!case.funds_verified());
    ensure!(case.actual_closing_date().is_none());
    ensure!(case.stage_started_at() == case.created_at());
    Ok(())
}

#[rstest]
fn open_seeds_history_with_one_stage_entry(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let case = Case::open(seed(), &plan, &clock)?;

    ensure!(case.history().len() == 1);
    let Some(HistoryEntry::StageEntered {
        stage,
        notes,
        forced,
        ..
    }) = case.history().first()
    else {
        bail!("expected a stage-entry record");
    };
    ensure!(*stage == Stage::OfferAccepted);
    ensure!(notes.as_deref() == Some("Case created"));
    ensure!(!forced);
    Ok(())
}

#[rstest]
fn open_estimates_closing_from_the_full_plan(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let case = Case::open(seed(), &plan, &clock)?;
    ensure!(case.estimated_closing_date() - case.created_at() == Duration::days(13));
    Ok(())
}

#[rstest]
fn open_trims_and_validates_the_address(plan: ClosingPlan, clock: DefaultClock) {
    let blank = CaseSeed::new("   ", 450_000.0);
    assert!(matches!(
        Case::open(blank, &plan, &clock),
        Err(CaseDomainError::EmptyPropertyAddress)
    ));
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
fn open_rejects_non_positive_prices(
    plan: ClosingPlan,
    clock: DefaultClock,
    #[case] price: f64,
) {
    let result = Case::open(CaseSeed::new("1 Elm Street", price), &plan, &clock);
    assert!(matches!(
        result,
        Err(CaseDomainError::NonPositivePurchasePrice(_))
    ));
}

#[rstest]
fn enter_next_stage_moves_the_pointer_and_appends_history(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;

    let entered = case.enter_next_stage(&plan, Some("title ordered".to_owned()), false, &clock)?;
    ensure!(entered == Stage::TitleSearch);
    ensure!(case.current_stage() == Stage::TitleSearch);
    ensure!(case.history().len() == 2);
    ensure!(
        case.estimated_closing_date() - case.stage_started_at() == Duration::days(12),
        "estimate should cover the remaining stages inclusive"
    );

    let entry = case
        .stage_entry(Stage::TitleSearch)
        .ok_or_eyre("stage entry should be recorded")?;
    let HistoryEntry::StageEntered { notes, forced, .. } = entry else {
        bail!("expected a stage-entry record");
    };
    ensure!(notes.as_deref() == Some("title ordered"));
    ensure!(!forced);
    Ok(())
}

#[rstest]
fn walking_every_stage_closes_the_case(plan: ClosingPlan, clock: DefaultClock) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;

    for expected in Stage::ORDER.iter().skip(1) {
        ensure!(case.actual_closing_date().is_none());
        let entered = case.enter_next_stage(&plan, None, true, &clock)?;
        ensure!(entered == *expected);
    }

    ensure!(case.current_stage() == Stage::RecordingComplete);
    ensure!(case.actual_closing_date().is_some());
    ensure!(case.history().len() == 7);

    let visited: Vec<Stage> = case
        .history()
        .iter()
        .filter_map(HistoryEntry::entered_stage)
        .collect();
    ensure!(visited == Stage::ORDER, "history should list every stage in order");
    Ok(())
}

#[rstest]
fn enter_next_stage_fails_once_terminal(plan: ClosingPlan, clock: DefaultClock) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;
    while !case.current_stage().is_terminal() {
        case.enter_next_stage(&plan, None, true, &clock)?;
    }
    let before = case.clone();

    let result = case.enter_next_stage(&plan, None, true, &clock);
    ensure!(matches!(
        result,
        Err(StageTransitionError::AlreadyComplete(id)) if id == case.id()
    ));
    ensure!(case == before, "a failed transition must not mutate the case");
    Ok(())
}

#[rstest]
fn deposit_updates_status_and_records_one_event(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;

    case.record_earnest_money_deposit(13_500.0, None, Some("wire received".to_owned()), &clock)?;

    ensure!(case.earnest_money_status() == EarnestMoneyStatus::Deposited);
    ensure!(case.earnest_money_deposited_at().is_some());
    ensure!(case.history().len() == 2);
    let entry = case.history().last().ok_or_eyre("event should be appended")?;
    ensure!(entry.event_name() == Some("earnest_money_deposited"));
    let HistoryEntry::DomainEvent { attributes, .. } = entry else {
        bail!("expected a domain event");
    };
    ensure!(attributes.get("amount") == Some(&serde_json::Value::from(13_500.0)));
    ensure!(attributes.contains_key("deposited_at"));
    ensure!(attributes.get("notes") == Some(&serde_json::Value::from("wire received")));
    Ok(())
}

#[rstest]
fn repeated_deposits_each_append_an_event(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;
    case.record_earnest_money_deposit(5_000.0, None, None, &clock)?;
    case.record_earnest_money_deposit(8_500.0, None, None, &clock)?;

    ensure!(case.earnest_money_status() == EarnestMoneyStatus::Deposited);
    let deposits = case
        .history()
        .iter()
        .filter(|entry| entry.event_name() == Some("earnest_money_deposited"))
        .count();
    ensure!(deposits == 2);
    Ok(())
}

#[rstest]
#[case(0.0)]
#[case(-500.0)]
fn deposit_rejects_non_positive_amounts(
    plan: ClosingPlan,
    clock: DefaultClock,
    #[case] amount: f64,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;
    let result = case.record_earnest_money_deposit(amount, None, None, &clock);
    ensure!(matches!(
        result,
        Err(CaseDomainError::NonPositiveDepositAmount(_))
    ));
    ensure!(case.history().len() == 1, "rejected deposit must not be recorded");
    Ok(())
}

#[rstest]
fn funds_verification_sets_the_flag_and_event(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;

    case.record_funds_verification("  jane.doe  ", Some("bank_statement".to_owned()), None, &clock)?;

    ensure!(case.funds_verified());
    ensure!(case.funds_verified_at().is_some());
    ensure!(case.funds_verified_by() == Some("jane.doe"));
    let entry = case.history().last().ok_or_eyre("event should be appended")?;
    ensure!(entry.event_name() == Some("funds_verified"));
    let HistoryEntry::DomainEvent { attributes, .. } = entry else {
        bail!("expected a domain event");
    };
    ensure!(attributes.get("verified_by") == Some(&serde_json::Value::from("jane.doe")));
    ensure!(attributes.get("method") == Some(&serde_json::Value::from("bank_statement")));
    Ok(())
}

#[rstest]
fn funds_verification_rejects_an_empty_verifier(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;
    let result = case.record_funds_verification("   ", None, None, &clock);
    ensure!(matches!(result, Err(CaseDomainError::EmptyVerifier)));
    ensure!(!case.funds_verified());
    Ok(())
}

#[rstest]
fn roles_resolve_assigned_parties(plan: ClosingPlan, clock: DefaultClock) -> eyre::Result<()> {
    let buyer = PartyId::new("party-buyer")?;
    let roles = RoleAssignments::new().with_buyer(buyer.clone());
    let case = Case::open(seed().with_roles(roles), &plan, &clock)?;

    ensure!(case.roles().party_for(CaseRole::Buyer) == Some(&buyer));
    ensure!(case.roles().party_for(CaseRole::Seller).is_none());
    Ok(())
}

#[rstest]
fn from_persisted_restores_a_working_aggregate(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let buyer = PartyId::new("party-buyer")?;
    let seed = seed()
        .with_down_payment(90_000.0)
        .with_roles(RoleAssignments::new().with_buyer(buyer));
    let mut original = Case::open(seed, &plan, &clock)?;
    original.record_earnest_money_deposit(13_500.0, None, None, &clock)?;
    original.enter_next_stage(&plan, Some("title ordered".to_owned()), false, &clock)?;

    let data = PersistedCaseData {
        id: original.id(),
        property_address: original.property_address().to_owned(),
        purchase_price: original.purchase_price(),
        down_payment: original.down_payment(),
        loan_amount: original.loan_amount(),
        earnest_money_amount: original.earnest_money_amount(),
        earnest_money_status: original.earnest_money_status(),
        earnest_money_deposited_at: original.earnest_money_deposited_at(),
        funds_verified: original.funds_verified(),
        funds_verified_at: original.funds_verified_at(),
        funds_verified_by: original.funds_verified_by().map(str::to_owned),
        current_stage: original.current_stage(),
        stage_started_at: original.stage_started_at(),
        created_at: original.created_at(),
        estimated_closing_date: original.estimated_closing_date(),
        actual_closing_date: original.actual_closing_date(),
        history: original.history().to_vec(),
        roles: original.roles().clone(),
    };

    let mut restored = Case::from_persisted(data);
    ensure!(restored == original, "reconstruction must preserve every field");

    let entered = restored.enter_next_stage(&plan, None, false, &clock)?;
    ensure!(entered == Stage::Underwriting);
    ensure!(restored.history().len() == 4);
    Ok(())
}

#[rstest]
fn history_serializes_with_explicit_type_tags(
    plan: ClosingPlan,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut case = Case::open(seed(), &plan, &clock)?;
    case.record_earnest_money_deposit(10_000.0, None, None, &clock)?;

    let encoded = serde_json::to_value(case.history())?;
    let entries = encoded.as_array().ok_or_eyre("history should be an array")?;
    ensure!(entries.len() == 2);
    ensure!(entries[0]["type"] == "stage_entered");
    ensure!(entries[1]["type"] == "domain_event");
    ensure!(entries[1]["name"] == "earnest_money_deposited");
    Ok(())
}
