use super::Component;
use crate::backend::types::{FeedState, PhotoItem};
use crate::backend::{FeedLoader, PhotoSource};
use crate::config::{Config, FeedAction, Key};
use crate::types::Action;
use crate::widgets::SpinnerWidget;
use color_eyre::{eyre, Result};
use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};
use ratatui::Frame;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

const ITEM_HEIGHT: u16 = 3;

/// What the feed shows for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Full-screen indicator in place of the list.
    Loading,
    /// The list, with a trailing indicator after the last item if `footer`.
    List { footer: bool },
}

impl From<&FeedState> for Presentation {
    fn from(state: &FeedState) -> Self {
        if state.busy && state.items.is_empty() {
            Self::Loading
        } else {
            Self::List { footer: state.busy }
        }
    }
}

/// Less than one screenful of items is left below the visible ones, or the
/// selection is within `threshold` items of the end.
fn end_reached(list: &ListState, len: usize, page_size: usize, threshold: usize) -> bool {
    let page_size = page_size.max(1);
    len.saturating_sub(list.offset() + page_size) < page_size
        || list.selected().is_some_and(|s| s + threshold.max(1) >= len)
}

pub struct FeedComponent<S> {
    loader: FeedLoader<S>,
    state: FeedState,
    list_state: ListState,
    keybindings: HashMap<Key, FeedAction>,
    end_reached_threshold: usize,
    action_tx: Option<UnboundedSender<Action>>,
    handle: Option<JoinHandle<()>>,
    frame: usize,
    page_size: usize,
}

impl<S> FeedComponent<S>
where
    S: PhotoSource,
{
    pub fn new(loader: FeedLoader<S>, config: &Config) -> Self {
        Self {
            loader,
            state: FeedState::default(),
            list_state: ListState::default(),
            keybindings: config.keybindings.feed.clone(),
            end_reached_threshold: config.feed.end_reached_threshold,
            action_tx: None,
            handle: None,
            frame: 0,
            page_size: 1,
        }
    }
    /// Subscribes to the loader and requests the first page.
    fn activate(&mut self) -> Result<()> {
        let tx = self
            .action_tx
            .clone()
            .ok_or_else(|| eyre::eyre!("action handler not registered"))?;
        let mut rx = self.loader.subscribe();
        self.handle = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if let Err(e) = tx.send(Action::Update(Box::new(rx.borrow_and_update().clone()))) {
                    log::error!("failed to send update action: {e}");
                    break;
                }
            }
            log::debug!("subscription finished");
        }));
        self.loader.load_more();
        Ok(())
    }
    fn deactivate(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
    fn select(&mut self, f: impl FnOnce(usize, usize) -> usize) -> Option<Action> {
        let len = self.state.items.len();
        if len > 0 {
            let selected = self.list_state.selected().unwrap_or_default();
            self.list_state.select(Some(f(selected, len).min(len - 1)));
        }
        Some(Action::Render)
    }
    fn load_if_end_reached(&self) {
        if end_reached(
            &self.list_state,
            self.state.items.len(),
            self.page_size,
            self.end_reached_threshold,
        ) {
            self.loader.load_more();
        }
    }
    fn selected_item(&self) -> Option<&PhotoItem> {
        self.list_state
            .selected()
            .and_then(|i| self.state.items.get(i))
    }
    fn list_item(item: &PhotoItem) -> ListItem<'_> {
        let mut title = vec![
            Span::from(format!("#{:<4} ", item.id)).dim(),
            Span::from(item.title.as_deref().unwrap_or("Untitled")).bold(),
        ];
        if let Some(author) = &item.author {
            title.push(Span::from(format!(" by {author}")).gray());
        }
        ListItem::new(Text::from(vec![
            Line::from(title),
            Line::from(format!("      {}", item.image_url)).blue(),
            Line::from(""),
        ]))
    }
}

impl<S> Drop for FeedComponent<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<S> Component for FeedComponent<S>
where
    S: PhotoSource,
{
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }
    fn init(&mut self, _size: Size) -> Result<()> {
        self.deactivate();
        self.activate()
    }
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(self.keybindings.get(&key.into()).map(Action::from))
    }
    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(match mouse.kind {
            MouseEventKind::ScrollDown => Some(Action::NextItem),
            MouseEventKind::ScrollUp => Some(Action::PrevItem),
            _ => None,
        })
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let page_size = self.page_size;
        match action {
            Action::Tick(_) if self.state.busy => {
                self.frame = self.frame.wrapping_add(1);
                return Ok(Some(Action::Render));
            }
            Action::NextItem | Action::NextPage | Action::Last => {
                let action = self.select(|s, len| match action {
                    Action::NextItem => s + 1,
                    Action::NextPage => s + page_size,
                    _ => len - 1,
                });
                self.load_if_end_reached();
                return Ok(action);
            }
            Action::PrevItem => return Ok(self.select(|s, _| s.saturating_sub(1))),
            Action::PrevPage => return Ok(self.select(|s, _| s.saturating_sub(page_size))),
            Action::First => return Ok(self.select(|_, _| 0)),
            Action::Open => {
                if let Some(item) = self.selected_item() {
                    log::info!("open photo #{}: {}", item.id, item.image_url);
                    if let Err(e) = open::that(&item.image_url) {
                        log::error!("failed to open: {e}");
                    }
                }
            }
            Action::LoadMore => {
                self.loader.load_more();
            }
            Action::Update(state) => {
                let grown = state.items.len() > self.state.items.len();
                self.state = *state;
                if self.list_state.selected().is_none() && !self.state.items.is_empty() {
                    self.list_state.select(Some(0));
                }
                // keep loading until the screen is filled
                if grown {
                    self.load_if_end_reached();
                }
                return Ok(Some(Action::Render));
            }
            _ => {}
        }
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let footer = match Presentation::from(&self.state) {
            Presentation::Loading => {
                f.render_widget(SpinnerWidget::new(self.frame, "Loading photos..."), area);
                return Ok(());
            }
            Presentation::List { footer } => footer,
        };
        let header = Paragraph::new(vec![
            Line::from("Unsplash").bold(),
            Line::from("The internet's source for visuals. Powered by creators everywhere.").dim(),
        ])
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Color::Gray)
                .padding(Padding::horizontal(1)),
        );
        let mut items = self
            .state
            .items
            .iter()
            .map(Self::list_item)
            .collect::<Vec<_>>();
        if footer {
            items.push(ListItem::new(
                SpinnerWidget::new(self.frame, "Loading more...")
                    .line()
                    .centered(),
            ));
        }

        let layout =
            Layout::vertical([Constraint::Length(3), Constraint::Percentage(100)]).split(area);
        let page_size = usize::from(layout[1].height / ITEM_HEIGHT).max(1);
        f.render_widget(header, layout[0]);
        f.render_stateful_widget(
            List::new(items)
                .highlight_style(Style::default().reset().reversed())
                .scroll_padding(1)
                .block(Block::default().padding(Padding::horizontal(1))),
            layout[1],
            &mut self.list_state,
        );
        if page_size != self.page_size {
            self.page_size = page_size;
            self.load_if_end_reached();
        }
        Ok(())
    }
}
