//! Reply texts sent back to the client

use super::event::SupplierNotice;
use super::state::{ConvState, Phase};
use crate::form::{CollectedFields, FormField, FIELDS};

pub fn greeting() -> String {
    format!(
        "Hello! Let's fill out a requisition form. Please provide the **{}**.",
        FIELDS[0].label()
    )
}

pub fn start_over() -> String {
    format!(
        "Okay, let's start over. Please provide the **{}**.",
        FIELDS[0].label()
    )
}

pub fn saved() -> String {
    "Form saved! You can start a new one by sending 'start'.".to_string()
}

/// Prompt for whatever the state asks next: a field, or the summary
pub fn next_prompt(state: &ConvState) -> String {
    match state.phase {
        Phase::Confirming => summary(&state.collected),
        Phase::Collecting { .. } | Phase::AwaitingSupplierResolution => {
            match state.current_field() {
                Some(field) => field_prompt(field),
                None => summary(&state.collected),
            }
        }
    }
}

fn field_prompt(field: FormField) -> String {
    if field == FormField::SupplierPreference {
        format!(
            "Please provide your **{}**. (You can type 'skip' if you don't have one).",
            field.label()
        )
    } else {
        format!("Got it. Now, please provide the **{}**.", field.label())
    }
}

fn summary(collected: &CollectedFields) -> String {
    let preview = serde_json::to_string_pretty(collected).unwrap_or_default();
    format!(
        "Great, all information is collected!\n\nSummary:\n```json\n{preview}\n```\n\nWould you like to **save** or **edit**?"
    )
}

/// Rejection message followed by the approved supplier list, one per line
pub fn supplier_rejected(notice: &SupplierNotice, approved: &[String]) -> String {
    let headline = match notice {
        SupplierNotice::NotFound { name } => format!("The supplier '{name}' was not found."),
        SupplierNotice::Blacklisted { name } => {
            format!("**Warning:** The supplier '{name}' is on our blacklist.")
        }
    };
    let list: String = approved.iter().map(|n| format!("\n- {n}")).collect();
    format!("{headline}\nPlease choose an approved supplier, or type 'skip':{list}")
}
