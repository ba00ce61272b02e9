use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender, TryRecvError};
use tokio::runtime::Handle;
use tuirealm::listener::{ListenerError, ListenerResult, Poll};
use tuirealm::Event;

use crate::generate::{GenerateError, GenerateRequest, Generator};
use crate::image_ref::ImageRef;

// tuirealm requires user events to be PartialOrd; the ordering is unused.
#[derive(Debug, PartialEq, Eq, Clone, PartialOrd)]
pub enum FormEvent {
    Generated(Result<ImageRef, GenerateError>),
}

/// Runs generate requests on the tokio runtime and reports each outcome on
/// a channel the UI listens to.
pub struct Dispatcher {
    generator: Arc<dyn Generator>,
    runtime: Handle,
    tx: Sender<FormEvent>,
}

impl Dispatcher {
    pub fn new(generator: Arc<dyn Generator>, runtime: Handle, tx: Sender<FormEvent>) -> Self {
        Self {
            generator,
            runtime,
            tx,
        }
    }

    pub fn dispatch(&self, request: GenerateRequest) {
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        tracing::info!(text = %request.text, "dispatching generate request");

        self.runtime.spawn(async move {
            let outcome = generator.generate(request).await;
            if tx.send(FormEvent::Generated(outcome)).is_err() {
                tracing::warn!("form closed before the generate response arrived");
            }
        });
    }
}

/// Port that hands finished requests to the application loop.
pub struct GenerateListener {
    rx: Receiver<FormEvent>,
}

impl GenerateListener {
    pub fn new(rx: Receiver<FormEvent>) -> Self {
        Self { rx }
    }
}

impl Poll<FormEvent> for GenerateListener {
    fn poll(&mut self) -> ListenerResult<Option<Event<FormEvent>>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(Event::User(event))),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ListenerError::PollFailed),
        }
    }
}
