pub mod components;
pub mod layout;
pub mod theme;

use rust_i18n::t;

use crate::quiz::{Field, Level};

pub fn level_label(level: Level) -> String {
    match level {
        Level::Easy => t!("level.easy"),
        Level::Medium => t!("level.medium"),
        Level::Hard => t!("level.hard"),
    }
    .to_string()
}

pub fn level_description(level: Level) -> String {
    match level {
        Level::Easy => t!("level.easy_desc"),
        Level::Medium => t!("level.medium_desc"),
        Level::Hard => t!("level.hard_desc"),
    }
    .to_string()
}

/// The question line shown above the choices, keyed by what is being asked for.
pub fn ask_label(answer_field: Field) -> String {
    match answer_field {
        Field::Form => t!("quiz.ask_form"),
        Field::Reading => t!("quiz.ask_reading"),
        Field::Meaning => t!("quiz.ask_meaning"),
    }
    .to_string()
}
