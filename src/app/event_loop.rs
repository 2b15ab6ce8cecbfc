use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::gallery::{FetchWorker, Notice, NoticeLevel, Notifier};
use crate::viewer::PreviewLoader;

use super::actors::UiActor;
use super::core::App;
use super::event_bus::EventBusRuntime;
use super::terminal_session::{TerminalSession, TerminalSurface};

struct LoopRuntime {
    ui_actor: UiActor,
    session: TerminalSession,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    /// Runs the UI until the user quits. `initial_query` is submitted as if
    /// typed into the search field.
    pub async fn run(&mut self, initial_query: Option<String>) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;
        if let Some(raw) = initial_query {
            self.submit_initial_query(&raw);
        }

        let result = self.drive(&mut runtime).await;

        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        result
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let session = TerminalSession::enter()?;
        self.mount.initialize_terminal();

        let tick = Duration::from_millis(self.config.ui.tick_ms);
        let (loop_event_rx, loop_event_runtime) = EventBusRuntime::spawn(tick);
        tracing::info!(
            tick_ms = self.config.ui.tick_ms,
            protocol = self.mount.protocol_label(),
            "event loop started"
        );

        Ok(LoopRuntime {
            ui_actor: UiActor::new(),
            session,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    async fn drive(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        loop {
            if runtime.ui_actor.needs_redraw() {
                self.render_frame(&mut runtime.session)?;
                runtime.ui_actor.clear_redraw();
            }

            let waited = wait_next_event(
                &mut runtime.loop_event_rx,
                &mut self.fetcher,
                &mut self.previews,
            )
            .await;
            if matches!(
                self.handle_waited_event(waited, runtime)?,
                LoopControl::Break
            ) {
                return Ok(());
            }
        }
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        runtime: &mut LoopRuntime,
    ) -> AppResult<LoopControl> {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let outcome = self.handle_input_event(event);
                if outcome.quit_requested {
                    tracing::info!("quit requested");
                    return Ok(LoopControl::Break);
                }
                if outcome.clear_terminal {
                    runtime.session.clear()?;
                }
                if outcome.redraw {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                self.toasts.notify(Notice::new(
                    NoticeLevel::Error,
                    format!("input error: {message}"),
                ));
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Fetched(completion)) => {
                if self.handle_fetch_completion(completion) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Event(DomainEvent::Preview(event)) => {
                if self.handle_preview_event(event) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Event(DomainEvent::Tick) => {
                if self.toasts.expire(Instant::now()) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Closed => return Ok(LoopControl::Break),
        }
        Ok(LoopControl::Continue)
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    fetcher: &mut FetchWorker,
    previews: &mut PreviewLoader,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
        maybe_fetch = fetcher.recv() => {
            match maybe_fetch {
                Some(completion) => WaitEvent::Event(DomainEvent::Fetched(completion)),
                None => WaitEvent::Closed,
            }
        },
        maybe_preview = previews.recv() => {
            match maybe_preview {
                Some(event) => WaitEvent::Event(DomainEvent::Preview(event)),
                None => WaitEvent::Closed,
            }
        },
    }
}
