pub mod banner;
pub mod level_menu;
pub mod name_input;
pub mod progress_bar;
pub mod question_card;
pub mod result_table;
