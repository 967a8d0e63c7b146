use crate::backend::types::FeedState;
use crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub enum Action {
    Error(String),
    Quit,
    Tick(usize),
    Render,
    NextItem,
    PrevItem,
    NextPage,
    PrevPage,
    First,
    Last,
    Open,
    LoadMore,
    Update(Box<FeedState>),
}

#[derive(Debug, Clone)]
pub enum Event {
    Tick(usize),
    Render,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Error(String),
}
