use crate::types::Action as AppAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Upper bound accepted by the photo listing endpoint.
pub const MAX_PER_PAGE: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub keybindings: Keybindings,
    #[serde(default)]
    pub unsplash: UnsplashConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub dev: bool,
}

impl Config {
    /// Binds every action that has no key yet. Bindings from the config file
    /// are kept as they are.
    pub fn set_default_keybindings(&mut self) {
        fill_defaults(
            &mut self.keybindings.global,
            [
                ("Ctrl-c", GlobalAction::Quit),
                ("q", GlobalAction::Quit),
            ],
        );
        fill_defaults(
            &mut self.keybindings.feed,
            [
                ("j", FeedAction::NextItem),
                ("Down", FeedAction::NextItem),
                ("k", FeedAction::PrevItem),
                ("Up", FeedAction::PrevItem),
                ("Ctrl-f", FeedAction::NextPage),
                ("PageDown", FeedAction::NextPage),
                ("Ctrl-b", FeedAction::PrevPage),
                ("PageUp", FeedAction::PrevPage),
                ("g", FeedAction::First),
                ("Home", FeedAction::First),
                ("G", FeedAction::Last),
                ("End", FeedAction::Last),
                ("Enter", FeedAction::Open),
                ("o", FeedAction::Open),
                ("m", FeedAction::LoadMore),
            ],
        );
    }
}

fn fill_defaults<A, const N: usize>(bindings: &mut HashMap<Key, A>, defaults: [(&str, A); N])
where
    A: PartialEq + Clone,
{
    let bound = bindings.values().cloned().collect::<Vec<_>>();
    for (key, action) in defaults {
        if bound.contains(&action) {
            continue;
        }
        if let Ok(key) = key.parse::<Key>() {
            bindings.entry(key).or_insert(action);
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UnsplashConfig {
    pub access_key: Option<String>,
    pub base_url: String,
    pub per_page: u32,
}

impl UnsplashConfig {
    pub fn per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }
}

impl fmt::Debug for UnsplashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsplashConfig")
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: String::from("https://api.unsplash.com"),
            per_page: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// Besides loading whenever less than a screenful remains below the visible
    /// items, load the next page once the selection is this many items from the end.
    pub end_reached_threshold: usize,
    pub tick_rate_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            end_reached_threshold: 2,
            tick_rate_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Keybindings {
    #[serde(default)]
    pub global: HashMap<Key, GlobalAction>,
    #[serde(default)]
    pub feed: HashMap<Key, FeedAction>,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Key(KeyCode, Option<KeyModifiers>);

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        Self(
            event.code,
            match event.modifiers {
                KeyModifiers::CONTROL => Some(KeyModifiers::CONTROL),
                // the character itself already carries the case
                KeyModifiers::SHIFT if !matches!(event.code, KeyCode::Char(_)) => {
                    Some(KeyModifiers::SHIFT)
                }
                _ => None,
            },
        )
    }
}

const NAMED_KEYS: [(&str, KeyCode); 12] = [
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
];

fn parse_code(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, code)| *code)
}

fn code_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => Some(c.to_string()),
        _ => NAMED_KEYS
            .iter()
            .find(|(_, named)| *named == code)
            .map(|(name, _)| name.to_string()),
    }
}

impl std::str::FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(code) = parse_code(s) {
            return Ok(Self(code, None));
        }
        let Some((modifier, code)) = s.split_once('-') else {
            return Err(format!("invalid key: {s}"));
        };
        let code = parse_code(code).ok_or_else(|| format!("invalid key: {s}"))?;
        let modifier = match modifier {
            "Ctrl" => KeyModifiers::CONTROL,
            "Shift" if !matches!(code, KeyCode::Char(_)) => KeyModifiers::SHIFT,
            _ => return Err(format!("invalid key modifier: {modifier}")),
        };
        Ok(Self(code, Some(modifier)))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = code_name(self.0).ok_or(fmt::Error)?;
        match self.1 {
            Some(KeyModifiers::CONTROL) => write!(f, "Ctrl-{code}"),
            Some(KeyModifiers::SHIFT) => write!(f, "Shift-{code}"),
            Some(_) => Err(fmt::Error),
            None => write!(f, "{code}"),
        }
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if code_name(self.0).is_none() {
            return Err(serde::ser::Error::custom("invalid key code"));
        }
        if !matches!(self.1, None | Some(KeyModifiers::CONTROL | KeyModifiers::SHIFT)) {
            return Err(serde::ser::Error::custom("invalid key modifier"));
        }
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
}

impl From<&GlobalAction> for AppAction {
    fn from(action: &GlobalAction) -> Self {
        match action {
            GlobalAction::Quit => AppAction::Quit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeedAction {
    NextItem,
    PrevItem,
    NextPage,
    PrevPage,
    First,
    Last,
    Open,
    LoadMore,
}

impl From<&FeedAction> for AppAction {
    fn from(action: &FeedAction) -> Self {
        match action {
            FeedAction::NextItem => AppAction::NextItem,
            FeedAction::PrevItem => AppAction::PrevItem,
            FeedAction::NextPage => AppAction::NextPage,
            FeedAction::PrevPage => AppAction::PrevPage,
            FeedAction::First => AppAction::First,
            FeedAction::Last => AppAction::Last,
            FeedAction::Open => AppAction::Open,
            FeedAction::LoadMore => AppAction::LoadMore,
        }
    }
}
