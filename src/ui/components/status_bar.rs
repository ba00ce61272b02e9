use tui_realm_stdlib::Label;
use tuirealm::props::{Alignment, Color};
use tuirealm::{Component, Event, MockComponent};

use crate::event::FormEvent;
use crate::ui::Msg;

/// Shows the loading indicator or the error panel, never both.
#[derive(MockComponent)]
pub struct StatusBar {
    component: Label,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self {
            component: Label::default()
                .alignment(Alignment::Center)
                .foreground(Color::Red),
        }
    }
}

impl Component<Msg, FormEvent> for StatusBar {
    fn on(&mut self, _ev: Event<FormEvent>) -> Option<Msg> {
        None
    }
}
