use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::artwork::ArtworkImage;
use crate::assets::{LOADER_BALL, LOADER_FRAMES, PLACEHOLDER_ART};
use crate::cell::{CellPhase, EntryCell};
use crate::theme::{
    theme_color, ACCENT_GOLD, ACCENT_RED, BG_PANEL, BG_PANEL_ALT, FLASH, TEXT_DIM, TEXT_MAIN,
};

/// Layout height units per artwork row.
const LAYOUT_UNITS_PER_ROW: u32 = 40;
const MIN_ART_ROWS: u16 = 4;

pub struct EntryCardProps<'a> {
    pub cell: &'a EntryCell,
    pub artwork: Option<&'a ArtworkImage>,
    pub is_selected: bool,
    pub tick: u64,
}

/// One collapsed card of the catalog grid.
#[derive(Default)]
pub struct EntryCard;

impl EntryCard {
    fn border_style(props: &EntryCardProps<'_>) -> Style {
        let cell = props.cell;
        if cell.reveal_pulse_active {
            return Style::default().fg(FLASH).add_modifier(Modifier::BOLD);
        }
        let style = Style::default().fg(theme_color(cell.theme_token()));
        if props.is_selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    fn art_rows(cell: &EntryCell, available: u16) -> u16 {
        let rows = (cell.layout_height() / LAYOUT_UNITS_PER_ROW) as u16;
        rows.max(MIN_ART_ROWS).min(available)
    }

    fn render_loader(frame: &mut Frame, area: Rect, tick: u64) {
        let bounce = LOADER_FRAMES[(tick as usize) % LOADER_FRAMES.len()];
        let top = area.y + area.height.saturating_sub(LOADER_BALL.len() as u16) / 2;
        let y = (top + bounce).saturating_sub(1).max(area.y);
        let lines: Vec<Line> = LOADER_BALL
            .iter()
            .map(|row| Line::styled(*row, Style::default().fg(ACCENT_RED)))
            .collect();
        let height = (LOADER_BALL.len() as u16).min(area.bottom().saturating_sub(y));
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            Rect::new(area.x, y, area.width, height),
        );
    }

    fn render_art(frame: &mut Frame, area: Rect, props: &EntryCardProps<'_>) {
        match props.artwork {
            Some(image) => image.render(area, frame.buffer_mut(), BG_PANEL),
            None => {
                let lines: Vec<Line> = PLACEHOLDER_ART
                    .iter()
                    .map(|row| Line::styled(*row, Style::default().fg(TEXT_DIM)))
                    .collect();
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
            }
        }
    }
}

impl Component<Action> for EntryCard {
    type Props<'a> = EntryCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let cell = props.cell;
        let text = cell.card_text();
        let bg = if props.is_selected {
            BG_PANEL_ALT
        } else {
            BG_PANEL
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if props.is_selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(Self::border_style(&props))
            .style(Style::default().bg(bg).fg(TEXT_MAIN))
            .title(Line::from(vec![
                Span::styled(text.id, Style::default().fg(ACCENT_GOLD)),
                Span::raw(" "),
                Span::styled(text.name, Style::default().add_modifier(Modifier::BOLD)),
            ]));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        let info_rows = 4;
        let art_rows = Self::art_rows(cell, inner.height.saturating_sub(info_rows));
        let chunks = Layout::vertical([
            Constraint::Length(art_rows),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

        match cell.phase() {
            CellPhase::Loading | CellPhase::Idle => {
                Self::render_loader(frame, chunks[0], props.tick);
                frame.render_widget(
                    Paragraph::new("Loading...")
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(TEXT_DIM)),
                    chunks[4],
                );
                return;
            }
            CellPhase::Failed => {
                let error = cell.error.as_deref().unwrap_or_default();
                frame.render_widget(
                    Paragraph::new(Text::from(vec![
                        Line::styled("Failed to load", Style::default().fg(ACCENT_RED)),
                        Line::styled(error.to_string(), Style::default().fg(TEXT_DIM)),
                        Line::styled("r: retry", Style::default().fg(TEXT_DIM)),
                    ]))
                    .alignment(Alignment::Center),
                    inner,
                );
                return;
            }
            CellPhase::Loaded => {}
        }

        Self::render_art(frame, chunks[0], &props);
        frame.render_widget(Paragraph::new(text.region), chunks[1]);
        frame.render_widget(
            Paragraph::new(format!("{}  {}", text.height, text.weight)),
            chunks[2],
        );
        frame.render_widget(
            Paragraph::new(text.name_jp).style(Style::default().fg(TEXT_DIM)),
            chunks[3],
        );
        if cell.shows_variant_toggle() {
            let label = if cell.variant_selected {
                "s: default"
            } else {
                "s: shiny ★"
            };
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(ACCENT_GOLD)),
                chunks[4],
            );
        }
    }
}
