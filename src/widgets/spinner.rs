use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn symbol(frame: usize) -> &'static str {
    FRAMES[frame % FRAMES.len()]
}

/// An animated loading indicator, vertically centered in its area.
pub struct SpinnerWidget<'a> {
    frame: usize,
    label: &'a str,
}

impl<'a> SpinnerWidget<'a> {
    pub fn new(frame: usize, label: &'a str) -> Self {
        Self { frame, label }
    }
    pub fn line(&self) -> Line<'a> {
        Line::from(vec![
            Span::from(symbol(self.frame)).cyan().bold(),
            Span::from(" "),
            Span::from(self.label).dim(),
        ])
    }
}

impl Widget for SpinnerWidget<'_> {
    fn render(self, area: Rect, buffer: &mut Buffer) {
        let y = area.y + area.height / 2;
        let line_area = Rect::new(area.x, y, area.width, area.height.min(1));
        Paragraph::new(self.line())
            .alignment(Alignment::Center)
            .render(line_area, buffer);
    }
}
