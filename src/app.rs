use crate::backend::{FeedLoader, UnsplashClient};
use crate::components::{Component, FeedComponent, StatusComponent};
use crate::config::Config;
use crate::tui::{io, Tui};
use crate::types::{Action, Event};
use color_eyre::{eyre, Result};
use crossterm::event::KeyEvent;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::Terminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct App {
    config: Config,
    components: Vec<Box<dyn Component>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        log::debug!("App::new({config:?})");
        Self {
            config,
            components: Vec::new(),
        }
    }
    pub async fn run(&mut self) -> Result<()> {
        let client = UnsplashClient::from_config(&self.config.unsplash).ok_or_else(|| {
            eyre::eyre!(
                "missing Unsplash access key: set UNSPLASH_ACCESS_KEY, pass --access-key, \
                 or add `access_key` to the [unsplash] section of the config file"
            )
        })??;
        let loader = FeedLoader::new(Arc::new(client), self.config.unsplash.per_page());
        let mut main_component = FeedComponent::new(loader, &self.config);
        if self.config.dev {
            self.components
                .push(Box::new(StatusComponent::new(&self.config.keybindings)));
        }

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let terminal = Terminal::new(CrosstermBackend::new(io()))?;
        log::debug!("terminal size: {:?}", terminal.size()?);
        let mut tui = Tui::new(terminal);
        tui.start(Duration::from_millis(self.config.feed.tick_rate_ms.max(10)))?;

        let result = self
            .event_loop(&mut tui, &mut main_component, action_tx, action_rx)
            .await;
        tui.end()?;
        result
    }
    async fn event_loop<B>(
        &mut self,
        tui: &mut Tui<B>,
        main_component: &mut dyn Component,
        action_tx: UnboundedSender<Action>,
        mut action_rx: UnboundedReceiver<Action>,
    ) -> Result<()>
    where
        B: Backend,
    {
        main_component.register_action_handler(action_tx.clone())?;
        for component in self.components.iter_mut() {
            component.register_action_handler(action_tx.clone())?;
        }
        main_component.init(tui.size()?)?;
        for component in self.components.iter_mut() {
            component.init(tui.size()?)?;
        }

        // the bottom line is for the status bar
        let mut constraints = vec![Constraint::Percentage(100)];
        if self.config.dev {
            constraints.push(Constraint::Length(1));
        }
        loop {
            if let Some(e) = tui.next_event().await {
                if let Some(action) = self.handle_events(e.clone()) {
                    action_tx.send(action)?;
                }
                if let Some(action) = main_component.handle_events(Some(e.clone()))? {
                    action_tx.send(action)?;
                }
                for component in self.components.iter_mut() {
                    if let Some(action) = component.handle_events(Some(e.clone()))? {
                        action_tx.send(action)?;
                    }
                }
            }
            while let Ok(action) = action_rx.try_recv() {
                if !matches!(action, Action::Tick(_) | Action::Render) {
                    log::info!("Action {action:?}");
                }
                match action {
                    Action::Quit => return Ok(()),
                    Action::Error(e) => log::error!("{e}"),
                    Action::Render => {
                        tui.draw(|f| {
                            let layout = Layout::vertical(&constraints).split(f.area());
                            if let Err(e) = main_component.draw(f, layout[0]) {
                                if let Err(e) =
                                    action_tx.send(Action::Error(format!("failed to draw: {e:?}")))
                                {
                                    log::error!("failed to send error: {e}");
                                }
                            }
                            for component in self.components.iter_mut() {
                                if let Err(e) = component.draw(f, layout[layout.len() - 1]) {
                                    if let Err(e) = action_tx
                                        .send(Action::Error(format!("failed to draw: {e:?}")))
                                    {
                                        log::error!("failed to send error: {e}");
                                    }
                                }
                            }
                        })?;
                    }
                    _ => {
                        if let Some(action) = main_component.update(action.clone())? {
                            action_tx.send(action)?;
                        }
                        for component in self.components.iter_mut() {
                            if let Some(action) = component.update(action.clone())? {
                                action_tx.send(action)?;
                            }
                        }
                    }
                }
            }
        }
    }
    fn handle_events(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Tick(i) => Some(Action::Tick(i)),
            Event::Render | Event::Resize(_, _) => Some(Action::Render),
            Event::Key(key_event) => self.handle_key_events(key_event),
            Event::Error(e) => Some(Action::Error(e)),
            Event::Mouse(_) => None,
        }
    }
    fn handle_key_events(&mut self, key_event: KeyEvent) -> Option<Action> {
        self.config
            .keybindings
            .global
            .get(&key_event.into())
            .map(Action::from)
    }
}
