use crate::types::Event;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use futures_util::{FutureExt, StreamExt};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io::{stdout, Write};
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time;

pub fn io() -> impl Write {
    stdout()
}

pub struct Tui<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    task: Option<JoinHandle<()>>,
    event_tx: UnboundedSender<Event>,
    event_rx: UnboundedReceiver<Event>,
}

impl<B> Tui<B>
where
    B: Backend,
{
    pub fn new(terminal: Terminal<B>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            terminal,
            task: None,
            event_tx,
            event_rx,
        }
    }
    /// Enters the alternate screen and starts forwarding terminal events,
    /// interleaved with a tick every `tick_rate`.
    pub fn start(&mut self, tick_rate: Duration) -> Result<()> {
        init()?;
        let event_tx = self.event_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = time::interval(tick_rate);
            let mut tick = 0;
            loop {
                let event = reader.next().fuse();
                let tick_tick = tick_interval.tick();
                tokio::select! {
                    e = event => handle_crossterm_event(e, &event_tx),
                    _ = tick_tick => {
                        tick += 1;
                        if let Err(e) = event_tx.send(Event::Tick(tick)) {
                            break log::error!("failed to send tick event: {e}");
                        }
                    },
                }
            }
        }));
        if let Err(e) = self.event_tx.send(Event::Render) {
            log::error!("failed to send render event: {e}");
        }
        Ok(())
    }
    pub fn end(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        restore()?;
        Ok(())
    }
    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl<B> Deref for Tui<B>
where
    B: Backend,
{
    type Target = Terminal<B>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl<B> DerefMut for Tui<B>
where
    B: Backend,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

fn handle_crossterm_event(
    event: Option<std::io::Result<CrosstermEvent>>,
    tx: &UnboundedSender<Event>,
) {
    let event = match event {
        Some(Ok(CrosstermEvent::Mouse(mouse))) => Event::Mouse(mouse),
        Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
            Event::Key(key)
        }
        Some(Ok(CrosstermEvent::Resize(width, height))) => Event::Resize(width, height),
        Some(Err(err)) => Event::Error(err.to_string()),
        _ => return,
    };
    if let Err(e) = tx.send(event) {
        log::error!("failed to send event: {e}");
    }
}

/// Initialize the terminal
fn init() -> Result<()> {
    execute!(io(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
    enable_raw_mode()?;
    Ok(())
}

/// Restore the terminal to its original state
pub(crate) fn restore() -> Result<()> {
    execute!(io(), LeaveAlternateScreen, DisableMouseCapture, cursor::Show)?;
    disable_raw_mode()?;
    Ok(())
}
