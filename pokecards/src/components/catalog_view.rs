use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{Component, EntryCard, EntryCardProps};
use crate::action::Action;
use crate::assets::EMPTY_STATE_ART;
use crate::state::{AppState, CARD_HEIGHT, CARD_WIDTH};
use crate::theme::{
    ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};

pub const EMPTY_MESSAGE: &str = "No Pokemon found";

pub struct CatalogViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Header, card grid and status bar.
pub struct CatalogView {
    scroll_row: usize,
    card: EntryCard,
    status_bar: StatusBar,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            scroll_row: 0,
            card: EntryCard,
            status_bar: StatusBar::new(),
        }
    }
}

/// Splits the screen into header, grid and footer.
pub fn catalog_layout(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(3),
    ])
    .areas(area)
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the selected row inside the visible window.
    fn follow_selection(&mut self, selected_row: usize, visible_rows: usize) {
        if selected_row < self.scroll_row {
            self.scroll_row = selected_row;
        } else if selected_row >= self.scroll_row + visible_rows {
            self.scroll_row = selected_row + 1 - visible_rows;
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let status = if let Some(message) = state.message.as_deref() {
            Span::styled(format!("  {message}"), Style::default().fg(ACCENT_RED))
        } else if state.catalog_loading {
            Span::styled("  loading...", Style::default().fg(TEXT_DIM))
        } else {
            Span::styled(
                format!("  {} cards", state.cells.len()),
                Style::default().fg(TEXT_DIM),
            )
        };
        let line = Line::from(vec![
            Span::styled(
                "POKECARDS",
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            Span::styled(state.source.label(), Style::default().fg(ACCENT_GOLD)),
            status,
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if state.catalog_empty {
            let mut lines: Vec<Line> = EMPTY_STATE_ART
                .iter()
                .map(|row| Line::styled(*row, Style::default().fg(TEXT_DIM)))
                .collect();
            lines.push(Line::default());
            lines.push(Line::styled(EMPTY_MESSAGE, Style::default().fg(ACCENT_GOLD)));
            frame.render_widget(
                Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
                area,
            );
            return;
        }
        if state.cells.is_empty() {
            let label = if state.catalog_loading {
                "Loading catalog..."
            } else {
                ""
            };
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                area,
            );
            return;
        }

        let columns = state.grid_columns();
        let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
        self.follow_selection(state.selected_index / columns, visible_rows);

        let first = self.scroll_row * columns;
        let last = ((self.scroll_row + visible_rows) * columns).min(state.cells.len());
        for (index, cell) in state.cells.iter().enumerate().take(last).skip(first) {
            let row = ((index - first) / columns) as u16;
            let column = (index % columns) as u16;
            let card_area = Rect::new(
                area.x + column * CARD_WIDTH,
                area.y + row * CARD_HEIGHT,
                CARD_WIDTH,
                CARD_HEIGHT,
            )
            .intersection(area);
            if card_area.is_empty() {
                continue;
            }
            let artwork = cell
                .displayed_artwork()
                .url()
                .and_then(|url| state.artwork.get(url));
            self.card.render(
                frame,
                card_area,
                EntryCardProps {
                    cell,
                    artwork,
                    is_selected: index == state.selected_index,
                    tick: state.tick,
                },
            );
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let status = match state.selected_cell() {
            Some(cell) => format!(
                "{}  {}/{}",
                cell.identifier,
                state.selected_index + 1,
                state.cells.len()
            ),
            None => String::new(),
        };
        let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
        let status_items = [StatusBarItem::span(status_span)];
        let hints = [
            StatusBarHint::new("hjkl", "Move"),
            StatusBarHint::new("Enter", "Detail"),
            StatusBarHint::new("s", "Shiny"),
            StatusBarHint::new("r", "Reload"),
            StatusBarHint::new("t/T", "Type"),
            StatusBarHint::new("c", "Clear"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("q", "Quit"),
        ];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };
        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}

impl Component<Action> for CatalogView {
    type Props<'a> = CatalogViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionRow(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionRow(1)),
                KeyCode::Enter => Some(Action::OverlayOpen),
                KeyCode::Char('s') => Some(Action::VariantToggle),
                KeyCode::Char('r') => Some(Action::EntryReload),
                KeyCode::Char('t') => Some(Action::TypeFilterNext),
                KeyCode::Char('T') => Some(Action::TypeFilterPrev),
                KeyCode::Char('c') => Some(Action::TypeFilterClear),
                KeyCode::Char('/') => Some(Action::SearchStart),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => Some(Action::SelectionRow(*delta as i16)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let [header, grid, footer] = catalog_layout(area);
        self.render_header(frame, header, state);
        self.render_grid(frame, grid, state);
        self.render_footer(frame, footer, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn keys(state: &AppState, input: &str) -> Vec<Action> {
        let mut view = CatalogView::new();
        input
            .split_whitespace()
            .flat_map(|code| {
                view.handle_event(
                    &EventKind::Key(key(code)),
                    CatalogViewProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn maps_navigation_keys() {
        let state = AppState::default();
        let actions = keys(&state, "h l k j");
        assert_eq!(
            actions,
            vec![
                Action::SelectionMove(-1),
                Action::SelectionMove(1),
                Action::SelectionRow(-1),
                Action::SelectionRow(1),
            ]
        );
    }

    #[test]
    fn maps_command_keys() {
        let state = AppState::default();
        let actions = keys(&state, "s r t c / q");
        assert_eq!(
            actions,
            vec![
                Action::VariantToggle,
                Action::EntryReload,
                Action::TypeFilterNext,
                Action::TypeFilterClear,
                Action::SearchStart,
                Action::Quit,
            ]
        );
    }

    #[test]
    fn follows_selection_when_scrolling() {
        let mut view = CatalogView::new();
        view.follow_selection(5, 2);
        assert_eq!(view.scroll_row, 4);
        view.follow_selection(4, 2);
        assert_eq!(view.scroll_row, 4);
        view.follow_selection(1, 2);
        assert_eq!(view.scroll_row, 1);
    }

    #[test]
    fn renders_empty_state() {
        let state = AppState {
            catalog_empty: true,
            ..Default::default()
        };
        let mut view = CatalogView::new();
        let mut render = RenderHarness::new(80, 30);
        let output = render.render_to_string_plain(|frame| {
            view.render(
                frame,
                frame.area(),
                CatalogViewProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });
        assert!(output.contains(EMPTY_MESSAGE));
        assert!(output.contains("#1-#151"));
    }
}
