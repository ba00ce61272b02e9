use std::path::Path;

use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, KeyModifiers};
use tuirealm::props::Color;
use tuirealm::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tuirealm::ratatui::style::{Modifier, Style};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{AttrValue, Attribute, Component, Event, Frame, MockComponent, Props, State};

use crate::event::FormEvent;
use crate::image_ref::{ImageRef, ImageSource};
use crate::preview::{Cell, Preview};
use crate::ui::Msg;

const BADGE: &str = " Logo ";

/// The generated image, a centered badge over it and the save hint.
///
/// `Attribute::Text` replaces the footer line and `Attribute::Foreground`
/// its color; the model uses them to report the outcome of a save.
pub struct ResultPanel {
    props: Props,
    image: ImageRef,
    preview: Option<Preview>,
    hint: String,
}

impl ResultPanel {
    pub fn new(image: ImageRef, output: &Path) -> Self {
        let preview = match image.bytes() {
            Ok(bytes) => Preview::decode(&bytes)
                .map_err(|err| tracing::warn!(%err, "result is not a decodable image"))
                .ok(),
            Err(err) => {
                tracing::debug!(%err, "no local preview for result");
                None
            }
        };

        Self {
            props: Props::default(),
            image,
            preview,
            hint: format!("[Enter] save as {}", output.display()),
        }
    }

    fn focused(&self) -> bool {
        matches!(self.props.get(Attribute::Focus), Some(AttrValue::Flag(true)))
    }

    fn footer(&self) -> Line<'static> {
        let text = match self.props.get(Attribute::Text) {
            Some(AttrValue::String(text)) => text,
            _ => self.hint.clone(),
        };
        let color = match self.props.get(Attribute::Foreground) {
            Some(AttrValue::Color(color)) => color,
            _ => Color::LightBlue,
        };
        Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::UNDERLINED),
        ))
    }

    fn body(&self, area: Rect) -> Vec<Line<'static>> {
        let Some(preview) = &self.preview else {
            let location = match self.image.source() {
                Ok(ImageSource::Remote(url)) => url.to_string(),
                _ => String::from("(embedded image could not be decoded)"),
            };
            return vec![Line::from("Generated image:"), Line::from(location)];
        };

        let rows = preview.cells(area.width, area.height);
        let middle = rows.len() / 2;
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                if index == middle && row.len() >= BADGE.len() + 2 {
                    Line::from(badge_row(row))
                } else {
                    Line::from(row.into_iter().map(half_block).collect::<Vec<_>>())
                }
            })
            .collect()
    }
}

fn half_block(cell: Cell) -> Span<'static> {
    let [tr, tg, tb] = cell.top;
    let [br, bg, bb] = cell.bottom;
    Span::styled(
        "▀",
        Style::default()
            .fg(Color::Rgb(tr, tg, tb))
            .bg(Color::Rgb(br, bg, bb)),
    )
}

fn badge_row(row: Vec<Cell>) -> Vec<Span<'static>> {
    let start = (row.len() - BADGE.len()) / 2;
    let end = start + BADGE.len();
    let mut spans = Vec::with_capacity(row.len() - BADGE.len() + 1);
    for (x, cell) in row.into_iter().enumerate() {
        if x == start {
            spans.push(Span::styled(
                BADGE,
                Style::default()
                    .fg(Color::Indexed(61))
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if !(start..end).contains(&x) {
            spans.push(half_block(cell));
        }
    }
    spans
}

impl MockComponent for ResultPanel {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused() {
            Color::LightBlue
        } else {
            Color::Gray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("QR code");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.body(chunks[0])).alignment(Alignment::Center),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(self.footer()).alignment(Alignment::Center),
            chunks[1],
        );
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, FormEvent> for ResultPanel {
    fn on(&mut self, ev: Event<FormEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char('s'),
                modifiers: KeyModifiers::NONE,
            }) => Some(Msg::Save),
            Event::Keyboard(KeyEvent { code: Key::Tab, .. }) => Some(Msg::FocusNext),
            Event::Keyboard(KeyEvent {
                code: Key::BackTab,
                ..
            }) => Some(Msg::FocusPrev),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(shade: u8) -> Cell {
        Cell {
            top: [shade; 3],
            bottom: [shade; 3],
        }
    }

    #[test]
    fn badge_replaces_the_center_cells() {
        let row: Vec<Cell> = (0..10).map(cell).collect();
        let spans = badge_row(row);

        // 10 cells, 6 covered by the badge, plus the badge itself
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[2].content, BADGE);
        assert_eq!(spans.iter().map(|span| span.width()).sum::<usize>(), 10);
    }

    #[test]
    fn remote_reference_is_listed_instead_of_drawn() {
        let panel = ResultPanel::new(
            ImageRef::new("https://cdn.example.com/qr.png"),
            Path::new("qrcode.png"),
        );
        assert!(panel.preview.is_none());
        let lines = panel.body(Rect::new(0, 0, 40, 10));
        assert_eq!(lines[1], Line::from("https://cdn.example.com/qr.png"));
    }
}
