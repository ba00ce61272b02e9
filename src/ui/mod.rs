mod components;
mod model;

pub use model::Model;

use crate::form::ColorField;
use crate::generate::GenerateError;
use crate::image_ref::ImageRef;

#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    None,
    Quit,
    FocusNext,
    FocusPrev,
    TextChanged(String),
    ColorChanged(ColorField, String),
    Submit,
    Generated(Result<ImageRef, GenerateError>),
    Save,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum Id {
    TextField,
    DarkField,
    LightField,
    Trigger,
    StatusBar,
    ResultPanel,
    Courier,
}

impl Id {
    pub fn color(field: ColorField) -> Self {
        match field {
            ColorField::Dark => Id::DarkField,
            ColorField::Light => Id::LightField,
        }
    }
}
