use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::theme::{ACCENT_TEAL, BG_PANEL_ALT, TEXT_DIM, TEXT_MAIN};

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
}

/// Single-line name search drawn over the header.
#[derive(Default)]
pub struct SearchBar;

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) if !ch.is_control() => Some(Action::SearchInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(Style::default().fg(ACCENT_TEAL))
            .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
        let line = if props.query.is_empty() {
            Line::from(vec![
                Span::styled("name or dex number", Style::default().fg(TEXT_DIM)),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        } else {
            Line::from(vec![
                Span::raw(props.query.to_string()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        };
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
