use tui_realm_stdlib::Phantom;
use tuirealm::event::{Key, KeyEvent};
use tuirealm::{Component, Event, MockComponent};

use crate::event::FormEvent;
use crate::ui::Msg;

/// Invisible component subscribed to every event: quits on `Esc` and turns
/// finished requests into messages.
#[derive(Default, MockComponent)]
pub struct Courier {
    component: Phantom,
}

impl Component<Msg, FormEvent> for Courier {
    fn on(&mut self, ev: Event<FormEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent { code: Key::Esc, .. }) => Some(Msg::Quit),
            Event::User(FormEvent::Generated(outcome)) => Some(Msg::Generated(outcome)),
            _ => None,
        }
    }
}
