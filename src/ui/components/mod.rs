mod courier;
mod field_input;
mod result_panel;
mod status_bar;
mod trigger;

pub use courier::Courier;
pub use field_input::FieldInput;
pub use result_panel::ResultPanel;
pub use status_bar::StatusBar;
pub use trigger::Trigger;
