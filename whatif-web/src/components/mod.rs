pub mod category_bar;
pub mod empty_state;
pub mod header;
pub mod nav_bar;
pub mod scenario_card;
pub mod toast;
