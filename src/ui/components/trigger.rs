use tui_realm_stdlib::Label;
use tuirealm::event::{Key, KeyEvent};
use tuirealm::props::{Alignment, Color};
use tuirealm::{Component, Event, MockComponent};

use crate::event::FormEvent;
use crate::ui::Msg;

/// The generate trigger. Whether it is enabled is decided by the model,
/// which also keeps its caption current.
#[derive(MockComponent)]
pub struct Trigger {
    component: Label,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            component: Label::default()
                .alignment(Alignment::Center)
                .foreground(Color::LightBlue)
                .text("Generate QR code"),
        }
    }
}

impl Component<Msg, FormEvent> for Trigger {
    fn on(&mut self, ev: Event<FormEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(' '),
                ..
            }) => Some(Msg::Submit),
            Event::Keyboard(KeyEvent { code: Key::Tab, .. }) => Some(Msg::FocusNext),
            Event::Keyboard(KeyEvent {
                code: Key::BackTab,
                ..
            }) => Some(Msg::FocusPrev),
            _ => None,
        }
    }
}
