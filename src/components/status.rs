use super::Component;
use crate::backend::types::FeedState;
use crate::config::Keybindings;
use crate::types::Action;
use color_eyre::Result;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// One-line summary of the feed state, shown in dev mode.
pub struct StatusComponent {
    state: FeedState,
    hints: String,
}

impl StatusComponent {
    pub fn new(keybindings: &Keybindings) -> Self {
        let mut keys = keybindings
            .global
            .iter()
            .map(|(key, action)| format!("{key}: {action:?}"))
            .chain(
                keybindings
                    .feed
                    .iter()
                    .map(|(key, action)| format!("{key}: {action:?}")),
            )
            .collect::<Vec<_>>();
        keys.sort();
        Self {
            state: FeedState::default(),
            hints: keys.join("  "),
        }
    }
    fn line(&self) -> Line<'_> {
        Line::from(vec![
            Span::from(format!(" page {} ", self.state.page)).reversed(),
            Span::from(format!(" {} photos ", self.state.items.len())),
            if self.state.busy {
                Span::from("loading ").yellow()
            } else {
                Span::from("idle ").green()
            },
            Span::from(self.hints.as_str()).dim(),
        ])
    }
}

impl Component for StatusComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Update(state) = action {
            self.state = *state;
        }
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        f.render_widget(Paragraph::new(self.line()), area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_utils::photos;

    #[test]
    fn follows_updates() {
        let mut config = Config::default();
        config.set_default_keybindings();
        let mut status = StatusComponent::new(&config.keybindings);
        assert!(status.hints.contains("Ctrl-c: Quit"));
        assert!(status.hints.contains("End: Last"));

        let mut state = FeedState::default();
        state.append(photos(10, "p1"));
        state.busy = true;
        let action = status
            .update(Action::Update(Box::new(state)))
            .expect("failed to update");
        assert!(action.is_none());
        let line = status
            .line()
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect::<String>();
        assert!(line.starts_with(" page 2  10 photos loading "), "{line}");
    }
}
