use thiserror::Error;

use crate::color::{ColorError, HexColor};
use crate::generate::{GenerateError, GenerateRequest, Generator};
use crate::image_ref::ImageRef;

pub const DEFAULT_TEXT: &str = "https://www.google.com";
pub const DEFAULT_DARK: &str = "#000000";
pub const DEFAULT_LIGHT: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Dark,
    Light,
}

/// Why the trigger is disabled for the current inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("text is empty")]
    EmptyText,
    #[error("{field:?} color is invalid: {source}")]
    Color {
        field: ColorField,
        #[source]
        source: ColorError,
    },
    #[error("a request is already in flight")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success(ImageRef),
    Error(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            ViewState::Success(image) => Some(image),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// The form's fields as typed, plus the request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    text: String,
    color_dark: String,
    color_light: String,
    view: ViewState,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT, DEFAULT_DARK, DEFAULT_LIGHT)
    }
}

impl FormState {
    pub fn new(
        text: impl Into<String>,
        color_dark: impl Into<String>,
        color_light: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            color_dark: color_dark.into(),
            color_light: color_light.into(),
            view: ViewState::Idle,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self, field: ColorField) -> &str {
        match field {
            ColorField::Dark => &self.color_dark,
            ColorField::Light => &self.color_light,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, field: ColorField, value: impl Into<String>) {
        match field {
            ColorField::Dark => self.color_dark = value.into(),
            ColorField::Light => self.color_light = value.into(),
        }
    }

    pub fn color_error(&self, field: ColorField) -> Option<ColorError> {
        self.color(field).parse::<HexColor>().err()
    }

    /// Builds the request the current fields describe, without looking at
    /// the request lifecycle.
    pub fn request(&self) -> Result<GenerateRequest, InputRejected> {
        if self.text.is_empty() {
            return Err(InputRejected::EmptyText);
        }
        let parse = |field: ColorField| {
            self.color(field)
                .parse::<HexColor>()
                .map_err(|source| InputRejected::Color { field, source })
        };

        Ok(GenerateRequest {
            text: self.text.clone(),
            color_dark: parse(ColorField::Dark)?,
            color_light: parse(ColorField::Light)?,
        })
    }

    pub fn admit(&self) -> Result<GenerateRequest, InputRejected> {
        if self.view.is_loading() {
            return Err(InputRejected::Busy);
        }
        self.request()
    }

    /// Whether the trigger control is enabled.
    pub fn can_submit(&self) -> bool {
        self.admit().is_ok()
    }

    /// Enters `Loading`, dropping any previous result or error. Returns
    /// `None` when the trigger is disabled.
    pub fn begin_submit(&mut self) -> Option<GenerateRequest> {
        match self.admit() {
            Ok(request) => {
                self.view = ViewState::Loading;
                Some(request)
            }
            Err(reason) => {
                tracing::debug!(%reason, "submit suppressed");
                None
            }
        }
    }

    pub fn complete(&mut self, outcome: Result<ImageRef, GenerateError>) {
        if !self.view.is_loading() {
            tracing::warn!(?outcome, "dropping response that arrived outside of a request");
            return;
        }

        self.view = match outcome {
            Ok(image) => ViewState::Success(image),
            Err(err) => {
                tracing::warn!(%err, "generate request failed");
                ViewState::Error(err.user_message())
            }
        };
    }
}

/// Runs one submit to completion. Returns `false` when the trigger was
/// disabled and nothing was sent.
pub async fn submit(form: &mut FormState, generator: &dyn Generator) -> bool {
    let Some(request) = form.begin_submit() else {
        return false;
    };
    let outcome = generator.generate(request).await;
    form.complete(outcome);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_submittable() {
        let form = FormState::default();
        assert_eq!(form.view(), &ViewState::Idle);
        assert!(form.can_submit());
    }

    #[test]
    fn empty_text_disables_trigger() {
        let mut form = FormState::default();
        form.set_text("");
        assert_eq!(form.admit(), Err(InputRejected::EmptyText));
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.view(), &ViewState::Idle);
    }

    #[test]
    fn invalid_color_disables_trigger() {
        let mut form = FormState::default();
        form.set_color(ColorField::Light, "#ffff");
        assert!(matches!(
            form.admit(),
            Err(InputRejected::Color {
                field: ColorField::Light,
                ..
            })
        ));
        assert!(form.color_error(ColorField::Light).is_some());
        assert!(form.color_error(ColorField::Dark).is_none());
    }

    #[test]
    fn trigger_disabled_while_loading() {
        let mut form = FormState::default();
        let request = form.begin_submit().unwrap();
        assert_eq!(request.text, DEFAULT_TEXT);
        assert!(form.view().is_loading());
        assert!(!form.can_submit());
        assert_eq!(form.begin_submit(), None);

        form.complete(Err(GenerateError::Transport("offline".to_string())));
        assert!(form.can_submit());
    }

    #[test]
    fn new_submit_clears_previous_result() {
        let mut form = FormState::default();
        form.begin_submit().unwrap();
        form.complete(Ok(ImageRef::new("R")));
        assert_eq!(form.view().image(), Some(&ImageRef::new("R")));

        form.begin_submit().unwrap();
        assert_eq!(form.view(), &ViewState::Loading);
        assert_eq!(form.view().image(), None);
    }

    #[test]
    fn failure_message_is_prefixed() {
        let mut form = FormState::default();
        form.begin_submit().unwrap();
        form.complete(Err(GenerateError::Rejected("Failed to generate".to_string())));
        assert_eq!(
            form.view().error(),
            Some("connection failed: Failed to generate")
        );
    }

    #[test]
    fn stray_outcome_is_ignored() {
        let mut form = FormState::default();
        form.complete(Ok(ImageRef::new("R")));
        assert_eq!(form.view(), &ViewState::Idle);
    }
}
