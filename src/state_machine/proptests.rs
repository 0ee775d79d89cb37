//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary input sequences.
//! Effects are answered synchronously from an in-memory directory.

use super::*;
use crate::db::{RequisitionFields, SupplierLookup, SupplierRecord};
use crate::form::{Command, FormField, FIELDS};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn directory() -> Vec<SupplierRecord> {
    vec![
        SupplierRecord::new("Acme Supplies", "1 Main St", "555-0100"),
        SupplierRecord::new("Brightline", "22 Side Rd", "555-0199"),
        SupplierRecord::new("Crooked Parts", "9 Back Ln", "555-0666").blacklisted(),
    ]
}

fn approved_names() -> Vec<String> {
    directory()
        .into_iter()
        .filter(|s| !s.is_blacklisted)
        .map(|s| s.name)
        .collect()
}

fn lookup(query: &str) -> SupplierLookup {
    match directory()
        .into_iter()
        .find(|s| s.name.to_lowercase() == query.to_lowercase())
    {
        Some(s) if s.is_blacklisted => SupplierLookup::Blacklisted(query.to_string()),
        Some(s) => SupplierLookup::Found(s),
        None => SupplierLookup::NotFound(query.to_string()),
    }
}

/// Outcome of driving one message through the machine
struct Step {
    state: ConvState,
    reply: String,
    saved: Vec<RequisitionFields>,
}

/// Feed one event and resolve every effect, like the runtime does
fn drive(state: &ConvState, event: Event) -> Step {
    let mut current = state.clone();
    let mut events = vec![event];
    let mut reply = String::new();
    let mut saved = Vec::new();

    while let Some(event) = events.pop() {
        let result = transition(&current, event).expect("transition should succeed");
        current = result.new_state;
        for effect in result.effects {
            match effect {
                Effect::LookupSupplier { query } => events.push(Event::SupplierLookedUp {
                    outcome: lookup(&query),
                }),
                Effect::ListApprovedSuppliers { notice } => {
                    events.push(Event::ApprovedSuppliersListed {
                        notice,
                        names: approved_names(),
                    });
                }
                Effect::SaveRequisition { fields } => {
                    saved.push(fields);
                    events.push(Event::RequisitionSaved);
                }
                Effect::Reply { text } => reply = text,
            }
        }
    }

    Step {
        state: current,
        reply,
        saved,
    }
}

fn say(state: &ConvState, text: &str) -> Step {
    drive(
        state,
        Event::UserMessage {
            text: text.to_string(),
        },
    )
}

fn state_at(cursor: usize) -> ConvState {
    let mut state = ConvState::default();
    for _ in 0..cursor {
        let text = if state.resolving_supplier() { "skip" } else { "answer" };
        state = say(&state, text).state;
    }
    state
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_free_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ,.]{0,30}".prop_filter("not a command", |s| {
        Command::parse(s).is_none()
            && !approved_names()
                .iter()
                .any(|n| n.eq_ignore_ascii_case(s.trim()))
    })
}

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_free_text(),
        1 => Just("start".to_string()),
        1 => Just("Restart".to_string()),
        1 => Just("edit".to_string()),
        2 => Just("skip".to_string()),
        1 => Just("no preference".to_string()),
        2 => Just("save".to_string()),
        2 => Just("acme supplies".to_string()),
        1 => Just("Brightline".to_string()),
        2 => Just("Crooked Parts".to_string()),
        2 => Just("Acme Corp".to_string()),
    ]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        (0..=FIELDS.len()).prop_map(state_at),
        Just({
            let at_supplier = state_at(FormField::SupplierPreference.position());
            say(&at_supplier, "Acme Corp").state
        }),
    ]
}

fn is_restart(input: &str) -> bool {
    Command::parse(input) == Some(Command::Restart)
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &ConvState) -> bool {
    let cursor = state.field_cursor();
    if cursor > FIELDS.len() {
        return false;
    }
    if let Phase::Collecting { cursor } = state.phase {
        if cursor >= FIELDS.len() {
            return false;
        }
    }
    // Every answered field precedes the cursor; derived supplier keys only
    // appear once the supplier field is behind us
    let derived = ["Supplier Name", "Supplier Address", "Supplier Contact"];
    state.collected.keys().all(|key| {
        if derived.contains(&key) {
            cursor > FormField::SupplierPreference.position()
        } else {
            FIELDS
                .iter()
                .position(|f| f.label() == key)
                .is_some_and(|pos| pos < cursor)
        }
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: state stays valid and the cursor only moves forward,
    // except on restart or save where it goes back to zero
    #[test]
    fn prop_cursor_monotonic_except_reset(inputs in proptest::collection::vec(arb_input(), 0..40)) {
        let mut state = ConvState::default();

        for input in inputs {
            let before = state.field_cursor();
            let step = say(&state, &input);
            prop_assert!(is_valid_state(&step.state), "Invalid state: {:?}", step.state);
            prop_assert!(!step.reply.is_empty(), "No reply for {:?}", input);

            let after = step.state.field_cursor();
            if after < before {
                prop_assert_eq!(after, 0);
                prop_assert!(step.state.collected.is_empty());
            }
            state = step.state;
        }
    }

    // Invariant 2: restart words always yield the initial state and prompt
    #[test]
    fn prop_restart_from_anywhere(
        state in arb_state(),
        word in prop_oneof![Just("start"), Just("RESTART"), Just(" edit "), Just("Start")]
    ) {
        let step = say(&state, word);
        prop_assert_eq!(&step.state, &ConvState::default());
        prop_assert!(step.reply.contains("**Requester Information**"));
        prop_assert!(step.saved.is_empty());
    }

    // Invariant 3: a found, approved supplier fills exactly four keys
    #[test]
    fn prop_found_supplier_populates_four_keys(
        name in prop_oneof![Just("acme supplies"), Just("ACME SUPPLIES"), Just("Brightline")],
        awaiting in any::<bool>()
    ) {
        let mut state = state_at(FormField::SupplierPreference.position());
        if awaiting {
            state = say(&state, "Unknown Vendor").state;
        }
        let before = state.collected.len();

        let step = say(&state, name);
        let record = directory()
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .unwrap();

        prop_assert_eq!(step.state.field_cursor(), FormField::SupplierPreference.position() + 1);
        prop_assert_eq!(step.state.collected.len(), before + 4);
        prop_assert_eq!(step.state.collected.get("Supplier Preference"), Some(record.name.as_str()));
        prop_assert_eq!(step.state.collected.get("Supplier Name"), Some(record.name.as_str()));
        prop_assert_eq!(step.state.collected.get("Supplier Address"), Some(record.address.as_str()));
        prop_assert_eq!(step.state.collected.get("Supplier Contact"), Some(record.contact.as_str()));
    }

    // Invariant 4: skip stores N/A and injects nothing else
    #[test]
    fn prop_skip_sets_only_preference(
        word in prop_oneof![Just("skip"), Just("none"), Just("No Preference"), Just("BLANK")],
        awaiting in any::<bool>()
    ) {
        let mut state = state_at(FormField::SupplierPreference.position());
        if awaiting {
            state = say(&state, "Crooked Parts").state;
        }
        let before = state.collected.len();

        let step = say(&state, word);
        prop_assert_eq!(step.state.field_cursor(), FormField::SupplierPreference.position() + 1);
        prop_assert_eq!(step.state.collected.len(), before + 1);
        prop_assert_eq!(step.state.collected.get("Supplier Preference"), Some("N/A"));
        prop_assert!(!step.state.collected.contains_key("Supplier Name"));
    }

    // Invariant 5: unknown or blacklisted names never advance and always
    // list every approved supplier
    #[test]
    fn prop_rejected_supplier_lists_approved(
        names in proptest::collection::vec(
            prop_oneof![arb_free_text(), Just("Crooked Parts".to_string())],
            1..6
        )
    ) {
        let mut state = state_at(FormField::SupplierPreference.position());
        let cursor = state.field_cursor();

        for name in names {
            let step = say(&state, &name);
            prop_assert_eq!(step.state.field_cursor(), cursor);
            prop_assert_eq!(step.state.phase, Phase::AwaitingSupplierResolution);
            for approved in approved_names() {
                let line = format!("\n- {approved}");
                prop_assert!(step.reply.contains(&line), "Missing {} in {:?}", approved, step.reply);
            }
            prop_assert!(!step.reply.contains("- Crooked Parts"));
            state = step.state;
        }
    }

    // Invariant 6: on the confirmation screen only `save` persists;
    // everything else resets
    #[test]
    fn prop_only_save_persists(input in arb_input()) {
        let state = state_at(FIELDS.len());
        prop_assert_eq!(state.phase, Phase::Confirming);

        let step = say(&state, &input);
        prop_assert_eq!(&step.state, &ConvState::default());
        if input.trim().eq_ignore_ascii_case("save") {
            prop_assert_eq!(step.saved.len(), 1);
            prop_assert_eq!(&step.saved[0], &state.collected.to_requisition());
        } else {
            prop_assert!(step.saved.is_empty());
            if !is_restart(&input) {
                prop_assert!(step.reply.starts_with("Okay, let's start over."));
            }
        }
    }

    // Invariant 7: non-supplier answers are stored verbatim (trimmed)
    #[test]
    fn prop_answers_stored_trimmed(answer in arb_free_text(), cursor in 0usize..4) {
        let state = state_at(cursor);
        let padded = format!("  {answer} ");
        let step = say(&state, &padded);
        prop_assert_eq!(step.state.collected.get(FIELDS[cursor].label()), Some(answer.trim()));
        prop_assert_eq!(step.state.field_cursor(), cursor + 1);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_unknown_supplier_then_skip() {
    let opened = drive(&ConvState::default(), Event::SessionOpened);
    let started = say(&opened.state, "start");
    assert!(started.reply.contains("**Requester Information**"));

    let mut state = started.state;
    for answer in ["Dana, Finance", "10 laptops", "New hires", "2026-11-01"] {
        state = say(&state, answer).state;
    }
    assert_eq!(state.field_cursor(), 4);

    let rejected = say(&state, "Acme Corp");
    assert_eq!(rejected.state.field_cursor(), 4);
    assert!(rejected.reply.contains("The supplier 'Acme Corp' was not found."));
    assert!(rejected.reply.contains("- Acme Supplies\n- Brightline"));

    let skipped = say(&rejected.state, "skip");
    assert_eq!(skipped.state.collected.get("Supplier Preference"), Some("N/A"));
    assert_eq!(skipped.state.phase, Phase::Collecting { cursor: 5 });
    assert_eq!(
        skipped.reply,
        "Got it. Now, please provide the **Approval Section**."
    );
}

#[test]
fn scenario_complete_and_save() {
    let mut state = ConvState::default();
    let answers = [
        "Dana, Finance",
        "10 laptops",
        "New hires",
        "2026-11-01",
        "acme supplies",
        "CFO",
    ];
    let mut last = String::new();
    for answer in answers {
        let step = say(&state, answer);
        state = step.state;
        last = step.reply;
    }
    assert_eq!(state.phase, Phase::Confirming);
    assert!(last.contains("\"Supplier Address\": \"1 Main St\""));
    assert!(last.ends_with("Would you like to **save** or **edit**?"));

    let saved = say(&state, "SAVE");
    assert_eq!(saved.state, ConvState::default());
    assert_eq!(saved.reply, "Form saved! You can start a new one by sending 'start'.");
    assert_eq!(
        saved.saved,
        vec![RequisitionFields {
            requester_info: Some("Dana, Finance".to_string()),
            item_details: Some("10 laptops".to_string()),
            business_justification: Some("New hires".to_string()),
            required_by_date: Some("2026-11-01".to_string()),
            approver: Some("CFO".to_string()),
            supplier_name: Some("Acme Supplies".to_string()),
            supplier_address: Some("1 Main St".to_string()),
            supplier_contact: Some("555-0100".to_string()),
        }]
    );
}
