use std::path::{Path, PathBuf};
use std::time::Duration;

use tuirealm::props::Color;
use tuirealm::ratatui::layout::{Constraint, Direction, Layout};
use tuirealm::terminal::{CrosstermTerminalAdapter, TerminalAdapter, TerminalBridge};
use tuirealm::{
    Application, AttrValue, Attribute, EventListenerCfg, Sub, SubClause, SubEventClause, Update,
};

use crate::config::Config;
use crate::error::QrFormError;
use crate::event::{Dispatcher, FormEvent, GenerateListener};
use crate::form::{ColorField, FormState, ViewState};

use super::components::{Courier, FieldInput, ResultPanel, StatusBar, Trigger};
use super::{Id, Msg};

const FOCUS_ORDER: [Id; 5] = [
    Id::TextField,
    Id::DarkField,
    Id::LightField,
    Id::Trigger,
    Id::ResultPanel,
];

/// Which optional areas are on screen below the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Visibility {
    status: bool,
    result: bool,
}

impl Visibility {
    fn of(view: &ViewState) -> Self {
        Self {
            status: matches!(view, ViewState::Loading | ViewState::Error(_)),
            result: matches!(view, ViewState::Success(_)),
        }
    }
}

fn status_line(view: &ViewState) -> Option<(String, Color)> {
    match view {
        ViewState::Loading => Some((String::from("Generating QR code..."), Color::Yellow)),
        ViewState::Error(message) => Some((message.clone(), Color::Red)),
        ViewState::Idle | ViewState::Success(_) => None,
    }
}

/// Mounts a fresh result panel in `Success` and removes it in every other
/// state. Returns whether the panel is mounted afterwards.
fn reconcile_result(
    app: &mut Application<Id, Msg, FormEvent>,
    view: &ViewState,
    output: &Path,
) -> Result<bool, QrFormError> {
    match view {
        ViewState::Success(image) => {
            if !app.mounted(&Id::ResultPanel) {
                app.mount(
                    Id::ResultPanel,
                    Box::new(ResultPanel::new(image.clone(), output)),
                    vec![],
                )?;
            }
            Ok(true)
        }
        _ => {
            if app.mounted(&Id::ResultPanel) {
                app.umount(&Id::ResultPanel)?;
            }
            Ok(false)
        }
    }
}

pub struct Model<T>
where
    T: TerminalAdapter,
{
    pub app: Application<Id, Msg, FormEvent>,
    pub quit: bool,
    pub redraw: bool,
    pub terminal: TerminalBridge<T>,
    form: FormState,
    dispatcher: Dispatcher,
    focus: Id,
    output: PathBuf,
}

impl Model<CrosstermTerminalAdapter> {
    pub fn new(
        config: &Config,
        dispatcher: Dispatcher,
        listener: GenerateListener,
    ) -> Result<Self, QrFormError> {
        let form = config.initial_form();

        let mut app = Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(Duration::from_millis(10), 10)
                .add_port(Box::new(listener), Duration::from_millis(10), 10),
        );

        app.mount(
            Id::TextField,
            Box::new(FieldInput::text(form.text())),
            vec![],
        )?;
        for field in [ColorField::Dark, ColorField::Light] {
            app.mount(
                Id::color(field),
                Box::new(FieldInput::color(field, form.color(field))),
                vec![],
            )?;
        }
        app.mount(Id::Trigger, Box::new(Trigger::default()), vec![])?;
        app.mount(Id::StatusBar, Box::new(StatusBar::default()), vec![])?;
        app.mount(
            Id::Courier,
            Box::new(Courier::default()),
            vec![Sub::new(SubEventClause::Any, SubClause::Always)],
        )?;
        app.active(&Id::TextField)?;

        let mut model = Self {
            app,
            quit: false,
            redraw: true,
            terminal: TerminalBridge::init_crossterm()?,
            form,
            dispatcher,
            focus: Id::TextField,
            output: config.output.clone(),
        };
        model.sync()?;
        Ok(model)
    }

    pub fn run(&mut self) -> Result<(), QrFormError> {
        self.terminal.enable_raw_mode()?;
        self.terminal.enter_alternate_screen()?;

        while !self.quit {
            match self.app.tick(tuirealm::PollStrategy::Once) {
                Err(err) => {
                    tracing::error!(%err, "application tick failed");
                    break;
                }
                Ok(messages) => {
                    if !messages.is_empty() {
                        self.redraw = true;
                        for msg in messages.into_iter() {
                            let mut msg = Some(msg);
                            while msg.is_some() {
                                msg = self.update(msg);
                            }
                        }
                    }
                }
            }

            if self.redraw {
                self.redraw = false;
                self.view();
            }
        }

        self.terminal.leave_alternate_screen()?;
        self.terminal.disable_raw_mode()?;

        Ok(())
    }

    pub fn view(&mut self) {
        let visible = Visibility::of(self.form.view());
        let show_status = visible.status;
        let show_result = visible.result && self.app.mounted(&Id::ResultPanel);

        let res = self.terminal.draw(|f| {
            let mut constraints = vec![
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ];
            if show_status {
                constraints.push(Constraint::Length(1));
            }
            if show_result {
                constraints.push(Constraint::Fill(1));
            }
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints(&constraints)
                .split(f.area());
            let colors = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);

            self.app.view(&Id::TextField, f, chunks[0]);
            self.app.view(&Id::DarkField, f, colors[0]);
            self.app.view(&Id::LightField, f, colors[1]);
            self.app.view(&Id::Trigger, f, chunks[2]);

            let mut next = 3;
            if show_status {
                self.app.view(&Id::StatusBar, f, chunks[next]);
                next += 1;
            }
            if show_result {
                self.app.view(&Id::ResultPanel, f, chunks[next]);
            }
        });
        if let Err(err) = res {
            tracing::error!(%err, "failed to draw the form");
        }
    }

    /// Brings every component in line with the form state.
    fn sync(&mut self) -> Result<(), QrFormError> {
        let view = self.form.view().clone();

        let caption = match (&view, self.focus == Id::Trigger) {
            (ViewState::Loading, _) => String::from("Generating..."),
            (_, true) => String::from("> Generate QR code <"),
            (_, false) => String::from("Generate QR code"),
        };
        let trigger_color = if self.form.can_submit() {
            Color::LightBlue
        } else {
            Color::DarkGray
        };
        self.app
            .attr(&Id::Trigger, Attribute::Text, AttrValue::String(caption))?;
        self.app.attr(
            &Id::Trigger,
            Attribute::Foreground,
            AttrValue::Color(trigger_color),
        )?;

        for field in [ColorField::Dark, ColorField::Light] {
            let color = if self.form.color_error(field).is_some() {
                Color::Red
            } else {
                Color::Reset
            };
            self.app
                .attr(&Id::color(field), Attribute::Foreground, AttrValue::Color(color))?;
        }

        if let Some((text, color)) = status_line(&view) {
            self.app
                .attr(&Id::StatusBar, Attribute::Text, AttrValue::String(text))?;
            self.app
                .attr(&Id::StatusBar, Attribute::Foreground, AttrValue::Color(color))?;
        }

        let mounted = reconcile_result(&mut self.app, &view, &self.output)?;
        if !mounted && self.focus == Id::ResultPanel {
            self.focus_on(Id::Trigger)?;
        }

        Ok(())
    }

    fn focus_on(&mut self, id: Id) -> Result<(), QrFormError> {
        self.app.active(&id)?;
        self.focus = id;
        Ok(())
    }

    fn cycle_focus(&mut self, forward: bool) -> Result<(), QrFormError> {
        let order: Vec<Id> = FOCUS_ORDER
            .into_iter()
            .filter(|id| *id != Id::ResultPanel || self.app.mounted(id))
            .collect();
        let current = order.iter().position(|id| *id == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus_on(order[next])?;
        self.sync()
    }

    fn submit(&mut self) -> Result<(), QrFormError> {
        if let Some(request) = self.form.begin_submit() {
            self.dispatcher.dispatch(request);
        }
        self.sync()
    }

    fn save(&mut self) -> Result<(), QrFormError> {
        let Some(image) = self.form.view().image() else {
            return Ok(());
        };

        let (text, color) = match image.save(&self.output) {
            Ok(len) => (
                format!("saved {len} bytes to {}", self.output.display()),
                Color::Green,
            ),
            Err(err) => {
                tracing::warn!(%err, "could not save generated image");
                (format!("save failed: {err}"), Color::Red)
            }
        };
        self.app
            .attr(&Id::ResultPanel, Attribute::Text, AttrValue::String(text))?;
        self.app
            .attr(&Id::ResultPanel, Attribute::Foreground, AttrValue::Color(color))?;
        Ok(())
    }

    fn log_failure(&self, res: Result<(), QrFormError>) -> Option<Msg> {
        if let Err(err) = res {
            crate::tracelog::trace_dbg!(level: tracing::Level::ERROR, err);
        }
        None
    }
}

impl Update<Msg> for Model<CrosstermTerminalAdapter> {
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        if let Some(msg) = msg {
            self.redraw = true;
            match msg {
                Msg::None => None,
                Msg::FocusNext => {
                    let res = self.cycle_focus(true);
                    self.log_failure(res)
                }
                Msg::FocusPrev => {
                    let res = self.cycle_focus(false);
                    self.log_failure(res)
                }
                Msg::TextChanged(text) => {
                    self.form.set_text(text);
                    let res = self.sync();
                    self.log_failure(res)
                }
                Msg::ColorChanged(field, value) => {
                    self.form.set_color(field, value);
                    let res = self.sync();
                    self.log_failure(res)
                }
                Msg::Submit => {
                    let res = self.submit();
                    self.log_failure(res)
                }
                Msg::Generated(outcome) => {
                    self.form.complete(outcome);
                    let res = self.sync();
                    self.log_failure(res)
                }
                Msg::Save => {
                    let res = self.save();
                    self.log_failure(res)
                }
                Msg::Quit => {
                    self.quit = true;
                    None
                }
            }
        } else {
            None
        }
    }
}
