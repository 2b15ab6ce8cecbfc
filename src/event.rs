use crossterm::event::Event;

use crate::gallery::FetchCompletion;
use crate::viewer::PreviewEvent;

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Fetched(FetchCompletion),
    Preview(PreviewEvent),
    Tick,
}
