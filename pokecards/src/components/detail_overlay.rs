use std::collections::HashMap;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::Component;
use crate::action::Action;
use crate::artwork::ArtworkImage;
use crate::assets::TypeIconRegistry;
use crate::cell::EntryCell;
use crate::detail::{DetailSheet, StatRow};
use crate::format::title_case;
use crate::theme::{theme_color, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};

pub const OVERLAY_WIDTH: u16 = 84;
pub const OVERLAY_HEIGHT: u16 = 34;
const ART_COLUMN_WIDTH: u16 = 20;
const STATS_COLUMN_WIDTH: u16 = 30;
const EVOLUTION_HEIGHT: u16 = 9;
/// Label and base value in front of each stat bar.
const STAT_PREFIX_WIDTH: u16 = 8;

pub struct DetailOverlayProps<'a> {
    pub cell: &'a EntryCell,
    pub artwork: &'a HashMap<String, ArtworkImage>,
    pub icons: &'a TypeIconRegistry,
    pub is_focused: bool,
}

/// Modal with the full record of one cell.
pub struct DetailOverlay {
    modal: Modal,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(area: Rect) -> Rect {
        centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area)
    }
}

fn stat_bar(stat: &StatRow, bar_width: u16) -> Line<'static> {
    let filled = (u32::from(stat.percentage) * u32::from(bar_width) / 100) as usize;
    let empty = usize::from(bar_width).saturating_sub(filled);
    Line::from(vec![
        Span::styled(format!("{:<4}", stat.label), Style::default().fg(TEXT_DIM)),
        Span::raw(format!("{:>3} ", stat.base)),
        Span::styled("█".repeat(filled), Style::default().fg(ACCENT_TEAL)),
        Span::styled("░".repeat(empty), Style::default().fg(TEXT_DIM)),
    ])
}

/// Heading plus one bar per stat, sized to the column.
fn stats_text(sheet: &DetailSheet<'_>, width: u16) -> Text<'static> {
    let bar_width = width.saturating_sub(STAT_PREFIX_WIDTH);
    let mut lines = vec![Line::styled("Base stats", Style::default().fg(ACCENT_TEAL))];
    lines.extend(sheet.stats.iter().map(|stat| stat_bar(stat, bar_width)));
    Text::from(lines)
}

fn summary_text(sheet: &DetailSheet<'_>) -> Text<'static> {
    let accent = theme_color(sheet.theme);
    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(TEXT_DIM)),
            Span::raw(value.to_string()),
        ])
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(sheet.dex_number.clone(), Style::default().fg(ACCENT_GOLD)),
            Span::raw(" "),
            Span::styled(
                sheet.name_en.clone(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(sheet.name_jp.clone(), Style::default().fg(TEXT_DIM)),
        ]),
        Line::from(
            sheet
                .types
                .iter()
                .flat_map(|badge| {
                    let span = match badge.icon {
                        Some(icon) => Span::styled(
                            format!(" {} ", icon.label),
                            Style::default()
                                .fg(BG_PANEL)
                                .bg(icon.color)
                                .add_modifier(Modifier::BOLD),
                        ),
                        None => Span::raw(format!(" {} ", badge.name)),
                    };
                    [span, Span::raw(" ")]
                })
                .collect::<Vec<_>>(),
        ),
        field("Height: ", &sheet.height),
        field("Weight: ", &sheet.weight),
        field("Region: ", &sheet.region),
        field("Generation: ", &sheet.generation),
        Line::styled("Abilities", Style::default().fg(ACCENT_TEAL)),
    ];
    for ability in &sheet.abilities {
        let mut spans = vec![
            Span::styled(ability.slot.clone(), Style::default().fg(TEXT_DIM)),
            Span::raw(ability.name.clone()),
        ];
        if ability.hidden {
            spans.push(Span::styled(" (hidden)", Style::default().fg(TEXT_DIM)));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn render_evolution(
    frame: &mut Frame,
    area: Rect,
    sheet: &DetailSheet<'_>,
    artwork: &HashMap<String, ArtworkImage>,
) {
    if sheet.evolution.is_empty() || area.height < 3 {
        return;
    }
    let block = Block::default()
        .borders(Borders::TOP)
        .title("Evolution")
        .border_style(Style::default().fg(TEXT_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slots = Layout::horizontal(
        sheet
            .evolution
            .iter()
            .map(|_| Constraint::Ratio(1, sheet.evolution.len() as u32)),
    )
    .split(inner);
    for (node, slot) in sheet.evolution.iter().zip(slots.iter()) {
        let [art, label] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(*slot);
        if let Some(image) = node.artwork.as_ref().and_then(|url| artwork.get(url)) {
            image.render(art, frame.buffer_mut(), BG_PANEL);
        }
        frame.render_widget(
            Paragraph::new(title_case(&node.name))
                .centered()
                .style(Style::default().fg(TEXT_MAIN)),
            label,
        );
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

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
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::OverlayClose),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Some(record) = props.cell.record.as_ref() else {
            return;
        };
        let sheet = DetailSheet::new(record, props.cell.theme_token(), props.icons);
        let default_art = record
            .artwork
            .default
            .as_deref()
            .and_then(|url| props.artwork.get(url));

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let evolution_height = if sheet.evolution.is_empty() {
                0
            } else {
                EVOLUTION_HEIGHT
            };
            let [top, bottom, link] = Layout::vertical([
                Constraint::Min(8),
                Constraint::Length(evolution_height),
                Constraint::Length(1),
            ])
            .areas(content_area);
            let [left, summary, stats] = Layout::horizontal([
                Constraint::Length(ART_COLUMN_WIDTH),
                Constraint::Fill(1),
                Constraint::Length(STATS_COLUMN_WIDTH),
            ])
            .spacing(1)
            .areas(top);
            let [art, description] =
                Layout::vertical([Constraint::Percentage(55), Constraint::Fill(1)]).areas(left);

            if let Some(image) = default_art {
                image.render(art, frame.buffer_mut(), BG_PANEL);
            }
            frame.render_widget(
                Paragraph::new(sheet.description.clone())
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(TEXT_DIM)),
                description,
            );
            frame.render_widget(
                Paragraph::new(summary_text(&sheet)).wrap(Wrap { trim: false }),
                summary,
            );
            frame.render_widget(Paragraph::new(stats_text(&sheet, stats.width)), stats);
            render_evolution(frame, bottom, &sheet, props.artwork);
            frame.render_widget(
                Paragraph::new(sheet.link.clone()).style(
                    Style::default()
                        .fg(ACCENT_TEAL)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                link,
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: Self::area(area),
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::all(1),
                        border: None,
                        fg: Some(TEXT_MAIN),
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::OverlayClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::tests::record;
    use crate::state::{EvolutionNode, StatValue};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn open_cell() -> EntryCell {
        let mut entry = record("ivysaur", false);
        entry.stats = vec![StatValue {
            name: "hp".into(),
            base: 60,
        }];
        entry.evolution = ["bulbasaur", "ivysaur", "venusaur"]
            .into_iter()
            .map(|name| EvolutionNode {
                name: name.into(),
                artwork: None,
            })
            .collect();
        let mut cell = EntryCell::mount(1, "ivysaur");
        cell.apply_record(entry);
        cell.open_overlay();
        cell
    }

    #[test]
    fn closes_on_escape_keys() {
        let cell = open_cell();
        let artwork = HashMap::new();
        let icons = TypeIconRegistry::builtin();
        let mut overlay = DetailOverlay::new();
        for code in [KeyCode::Char('q'), KeyCode::Esc, KeyCode::Enter] {
            let actions: Vec<_> = overlay
                .handle_event(
                    &EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE)),
                    DetailOverlayProps {
                        cell: &cell,
                        artwork: &artwork,
                        icons: &icons,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect();
            actions.assert_first(Action::OverlayClose);
        }
    }

    #[test]
    fn variant_key_is_ignored() {
        let cell = open_cell();
        let artwork = HashMap::new();
        let icons = TypeIconRegistry::builtin();
        let mut overlay = DetailOverlay::new();
        let actions: Vec<_> = overlay
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)),
                DetailOverlayProps {
                    cell: &cell,
                    artwork: &artwork,
                    icons: &icons,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn renders_sheet_and_chain() {
        let cell = open_cell();
        let artwork = HashMap::new();
        let icons = TypeIconRegistry::builtin();
        let mut overlay = DetailOverlay::new();
        let mut render = RenderHarness::new(100, 40);
        let output = render.render_to_string_plain(|frame| {
            overlay.render(
                frame,
                frame.area(),
                DetailOverlayProps {
                    cell: &cell,
                    artwork: &artwork,
                    icons: &icons,
                    is_focused: true,
                },
            );
        });
        assert!(output.contains("#025"));
        assert!(output.contains("Ivysaur"));
        assert!(output.contains("ELECTRIC"));
        assert!(output.contains("HP"));
        assert!(output.contains("Bulbasaur"));
        assert!(output.contains("Venusaur"));
        assert!(output.contains("pokedex/ivysaur"));
    }
}
