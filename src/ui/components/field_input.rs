use tui_realm_stdlib::Input;
use tuirealm::command::{Cmd, CmdResult, Direction, Position};
use tuirealm::event::{Key, KeyEvent, KeyModifiers};
use tuirealm::props::{Alignment, Color, InputType};
use tuirealm::{Component, Event, MockComponent, State, StateValue};

use crate::event::FormEvent;
use crate::form::ColorField;
use crate::ui::Msg;

/// A single-line field that reports every edit to the model.
#[derive(MockComponent)]
pub struct FieldInput {
    component: Input,
    color: Option<ColorField>,
}

impl FieldInput {
    pub fn text(initial: &str) -> Self {
        Self {
            component: Input::default()
                .foreground(Color::Blue)
                .title("Text / URL", Alignment::Left)
                .input_type(InputType::Text)
                .value(initial),
            color: None,
        }
    }

    pub fn color(field: ColorField, initial: &str) -> Self {
        let title = match field {
            ColorField::Dark => "QR colour",
            ColorField::Light => "Background colour",
        };

        Self {
            component: Input::default()
                .foreground(Color::Reset)
                .title(title, Alignment::Left)
                .input_type(InputType::Text)
                .input_len(7)
                .value(initial),
            color: Some(field),
        }
    }
}

impl Component<Msg, FormEvent> for FieldInput {
    fn on(&mut self, ev: Event<FormEvent>) -> Option<Msg> {
        let result = match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Left, ..
            }) => self.perform(Cmd::Move(Direction::Left)),
            Event::Keyboard(KeyEvent {
                code: Key::Right, ..
            }) => self.perform(Cmd::Move(Direction::Right)),
            Event::Keyboard(KeyEvent {
                code: Key::Home, ..
            }) => self.perform(Cmd::GoTo(Position::Begin)),
            Event::Keyboard(KeyEvent { code: Key::End, .. }) => {
                self.perform(Cmd::GoTo(Position::End))
            }
            Event::Keyboard(KeyEvent {
                code: Key::Delete, ..
            }) => self.perform(Cmd::Cancel),
            Event::Keyboard(KeyEvent {
                code: Key::Backspace,
                ..
            }) => self.perform(Cmd::Delete),
            Event::Keyboard(KeyEvent {
                code: Key::Char(ch),
                modifiers: KeyModifiers::NONE,
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(ch),
                modifiers: KeyModifiers::SHIFT,
            }) => self.perform(Cmd::Type(ch)),
            Event::Keyboard(KeyEvent { code: Key::Tab, .. }) => return Some(Msg::FocusNext),
            Event::Keyboard(KeyEvent {
                code: Key::BackTab,
                ..
            }) => return Some(Msg::FocusPrev),
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            }) => return Some(Msg::Submit),
            _ => CmdResult::None,
        };

        match result {
            CmdResult::Changed(State::One(StateValue::String(value))) => Some(match self.color {
                Some(field) => Msg::ColorChanged(field, value),
                None => Msg::TextChanged(value),
            }),
            _ => Some(Msg::None),
        }
    }
}
