use std::path::PathBuf;

use crossbeam::channel;
use tokio::runtime::Handle;

use crate::config::Config;
use crate::error::QrFormError;
use crate::event::{Dispatcher, FormEvent, GenerateListener};
use crate::form::ViewState;
use crate::generate::Generator;

pub mod color;
pub mod config;
pub mod error;
mod event;
pub mod form;
pub mod generate;
pub mod image_ref;
pub mod preview;
mod ui;

// Based on https://ratatui.rs/recipes/apps/log-with-tracing/
pub(crate) mod tracelog {
    /// Similar to the `std::dbg!` macro, but generates `tracing` events rather
    /// than printing to stdout.
    ///
    /// By default, the verbosity level for the generated events is `DEBUG`, but
    /// this can be customized.
    #[macro_export]
    macro_rules! trace_dbg {
        (target: $target:expr, level: $level:expr, $ex:expr) => {{
            match $ex {
                value => {
                    tracing::event!(target: $target, $level, ?value, stringify!($ex));
                    value
                }
            }
        }};
        (level: $level:expr, $ex:expr) => {
            $crate::trace_dbg!(target: module_path!(), level: $level, $ex)
        };
        (target: $target:expr, $ex:expr) => {
            $crate::trace_dbg!(target: $target, level: tracing::Level::DEBUG, $ex)
        };
        ($ex:expr) => {
            $crate::trace_dbg!(level: tracing::Level::DEBUG, $ex)
        };
    }

    pub(crate) use trace_dbg;
}

pub async fn run_main(config: Config) -> Result<(), QrFormError> {
    let generator = config.generator()?;

    if config.once {
        let path = run_once(&config, generator.as_ref()).await?;
        println!("{}", path.display());
        return Ok(());
    }

    let (event_tx, event_rx) = channel::unbounded::<FormEvent>();
    let dispatcher = Dispatcher::new(generator, Handle::current(), event_tx);

    let mut model = ui::Model::new(&config, dispatcher, GenerateListener::new(event_rx))?;
    model.run()
}

/// Submits the configured fields once and saves the result to the
/// configured output path.
pub async fn run_once(config: &Config, generator: &dyn Generator) -> Result<PathBuf, QrFormError> {
    let mut form = config.initial_form();
    form.admit()?;
    form::submit(&mut form, generator).await;

    match form.view() {
        ViewState::Success(image) => {
            image.save(&config.output)?;
            Ok(config.output.clone())
        }
        ViewState::Error(message) => Err(QrFormError::GenerateFailed(message.clone())),
        state => Err(QrFormError::GenerateFailed(format!(
            "request ended in unexpected state {state:?}"
        ))),
    }
}
