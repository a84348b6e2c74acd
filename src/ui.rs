use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventContext, EventKind, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use pokebox::action::Action;
use pokebox::format::{capitalize, format_height, format_name, format_stat_name, format_weight};
use pokebox::reducer::{DETAIL_ERROR_MESSAGE, LIST_ERROR_MESSAGE};
use pokebox::state::{AppState, CreatureDetail, DetailTab, GenderRatio, Screen};

use crate::PokeComponentId;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(150, 168, 180);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const STAT_GOOD: Color = Color::Rgb(96, 200, 112);
const STAT_POOR: Color = Color::Rgb(226, 96, 82);

const STAT_MAX: u32 = 150;
const STAT_TOTAL_MAX: u32 = 900;
const STAT_GOOD_THRESHOLD: u32 = 50;
const BAR_WIDTH: usize = 24;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub struct PokeUi {
    dex_list: SelectList,
    evolution_list: SelectList,
    status_bar: StatusBar,
}

impl PokeUi {
    pub fn new() -> Self {
        Self {
            dex_list: SelectList::new(),
            evolution_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        match state.screen {
            Screen::List => {
                render_list_header(frame, layout[0], state, event_ctx);
                render_list(frame, layout[1], state, event_ctx, &mut self.dex_list);
            }
            Screen::Detail => {
                render_detail_header(frame, layout[0], state);
                render_detail(frame, layout[1], state, event_ctx, &mut self.evolution_list);
            }
        }
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_list_event(event, state, &mut self.dex_list)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_detail_event(event, state, &mut self.evolution_list)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }
}

// ============================================================================
// Events
// ============================================================================

fn handle_list_event(
    event: &EventKind,
    state: &AppState,
    dex_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Enter => vec![Action::OpenSelected],
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::PageDown => vec![Action::SelectionPage(1)],
            KeyCode::PageUp => vec![Action::SelectionPage(-1)],
            _ => {
                let items = dex_items(state);
                let props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected_index.min(items.len().saturating_sub(1)),
                    is_focused: true,
                    style: list_style(None),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::DexSelect,
                    render_item: &|item| item.clone(),
                };
                let actions: Vec<_> = dex_list.handle_event(event, props).into_iter().collect();
                return handler_response(actions);
            }
        },
        EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
        _ => vec![],
    };
    handler_response(actions)
}

fn handle_detail_event(
    event: &EventKind,
    state: &AppState,
    evolution_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc | KeyCode::Backspace => vec![Action::Back],
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => vec![Action::DetailTabPrev],
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => vec![Action::DetailTabNext],
            KeyCode::Enter if state.detail_tab == DetailTab::Evolution => {
                vec![Action::EvolutionOpen]
            }
            _ => vec![],
        },
        _ => vec![],
    };
    if !actions.is_empty() {
        return handler_response(actions);
    }
    if state.detail_tab != DetailTab::Evolution {
        return HandlerResponse::ignored();
    }
    let Some(detail) = state.current_detail() else {
        return HandlerResponse::ignored();
    };
    let items = evolution_items(detail);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state
            .evolution_selected_index
            .min(items.len().saturating_sub(1)),
        is_focused: true,
        style: list_style(Some(BG_PANEL)),
        behavior: SelectListBehavior {
            show_scrollbar: false,
            wrap_navigation: false,
        },
        on_select: Action::EvolutionSelect,
        render_item: &|item| item.clone(),
    };
    let actions: Vec<_> = evolution_list
        .handle_event(event, props)
        .into_iter()
        .collect();
    handler_response(actions)
}

fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

// ============================================================================
// List screen
// ============================================================================

fn render_list_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PokeComponentId>,
) {
    if state.search.active {
        event_ctx.set_component_area(PokeComponentId::Search, area);
    }
    let search = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.search.query)
    };
    let loaded = state.entries().len();
    let shown = state.filtered_indices.len();
    let line = Line::from(vec![
        Span::styled(
            "POKEDEX",
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  Search: "),
        Span::styled(search, Style::default().fg(ACCENT_TEAL)),
        Span::raw("  |  "),
        Span::styled(
            format!("{shown}/{loaded} shown"),
            Style::default().fg(ACCENT_GOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PokeComponentId>,
    dex_list: &mut SelectList,
) {
    event_ctx.set_component_area(PokeComponentId::DexList, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let footer = list_footer(state);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(if footer.is_some() { 1 } else { 0 }),
        ])
        .split(inner);

    let items = dex_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: !state.search.active,
        style: list_style(None),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DexSelect,
        render_item: &|item| item.clone(),
    };
    dex_list.render(frame, layout[0], props);

    if let Some(footer) = footer {
        frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), layout[1]);
    }
}

/// Trailing row under the list: page progress or the last page error.
fn list_footer(state: &AppState) -> Option<Line<'static>> {
    if state.pager.is_loading() {
        return Some(Line::styled(
            format!("{} Loading...", spinner(state)),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    state.pager.error().map(|error| {
        Line::from(vec![
            Span::styled(
                format!("{LIST_ERROR_MESSAGE}: {error}"),
                Style::default().fg(STAT_POOR),
            ),
            Span::styled("  (r to retry)", Style::default().fg(TEXT_DIM)),
        ])
    })
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .filtered_indices
        .iter()
        .filter_map(|idx| state.entries().get(*idx))
        .map(|entry| {
            let Some(detail) = state.detail(&entry.name) else {
                let number = entry
                    .number()
                    .map(|number| format!("#{number:03}"))
                    .unwrap_or_else(|| "#---".to_string());
                return Line::from(vec![
                    Span::styled(format!("{number} "), Style::default().fg(TEXT_DIM)),
                    Span::raw(capitalize(&entry.name)),
                ]);
            };
            Line::from(vec![
                Span::styled(
                    format!("#{:03} ", detail.national_dex_number),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::styled(
                    format!("{:<14}", capitalize(&entry.name)),
                    Style::default().fg(species_color(&detail.color)),
                ),
                Span::styled(
                    format!("{:<18}", type_label(&detail.types)),
                    Style::default().fg(ACCENT_GOLD),
                ),
                Span::styled(detail.flavor_text.clone(), Style::default().fg(TEXT_DIM)),
            ])
        })
        .collect()
}

// ============================================================================
// Detail screen
// ============================================================================

fn render_detail_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let Some(detail) = state.current_detail() else {
        let name = state.detail_name.as_deref().map(capitalize).unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::styled(
                name,
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ))
            .block(block.border_style(Style::default().fg(TEXT_DIM))),
            area,
        );
        return;
    };
    let accent = species_color(&detail.color);
    let line = Line::from(vec![
        Span::styled(
            capitalize(&detail.name),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  #{:03}", detail.national_dex_number),
            Style::default().fg(TEXT_DIM),
        ),
        Span::raw("  |  "),
        Span::styled(type_label(&detail.types), Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  "),
        Span::styled(detail.species_label.clone(), Style::default().fg(TEXT_MAIN)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(block.border_style(Style::default().fg(accent))),
        area,
    );
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PokeComponentId>,
    evolution_list: &mut SelectList,
) {
    event_ctx.set_component_area(PokeComponentId::Detail, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(inner);

    let tabs = Tabs::new(DetailTab::ALL.iter().map(|tab| tab.title()))
        .select(state.detail_tab.index())
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, layout[0]);

    let Some(detail) = state.current_detail() else {
        render_detail_placeholder(frame, layout[1], state);
        return;
    };
    match state.detail_tab {
        DetailTab::Info => frame.render_widget(
            Paragraph::new(info_text(detail)).wrap(Wrap { trim: true }),
            layout[1],
        ),
        DetailTab::Stats => frame.render_widget(Paragraph::new(stats_text(detail)), layout[1]),
        DetailTab::Evolution => {
            render_evolution(frame, layout[1], state, detail, evolution_list)
        }
    }
}

fn render_detail_placeholder(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.detail_loading {
        Text::styled(
            format!("{} Loading...", spinner(state)),
            Style::default().fg(ACCENT_GOLD),
        )
    } else if let Some(error) = state.detail_error.as_ref() {
        Text::from(vec![
            Line::styled(DETAIL_ERROR_MESSAGE, Style::default().fg(STAT_POOR)),
            Line::styled(error.clone(), Style::default().fg(TEXT_DIM)),
        ])
    } else {
        Text::styled("Nothing selected.", Style::default().fg(TEXT_DIM))
    };
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn info_text(detail: &CreatureDetail) -> Text<'static> {
    let heading = Style::default()
        .fg(species_color(&detail.color))
        .add_modifier(Modifier::BOLD);
    let abilities = detail
        .abilities
        .iter()
        .map(|ability| format_name(ability))
        .collect::<Vec<_>>()
        .join(", ");
    let egg_groups = detail
        .egg_groups
        .iter()
        .map(|group| format_name(group))
        .collect::<Vec<_>>()
        .join(", ");
    Text::from(vec![
        Line::from(detail.flavor_text.clone()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Height  ", Style::default().fg(TEXT_DIM)),
            Span::raw(format_height(detail.height_m)),
            Span::styled("    Weight  ", Style::default().fg(TEXT_DIM)),
            Span::raw(format_weight(detail.weight_kg)),
        ]),
        Line::from(vec![
            Span::styled("Abilities  ", Style::default().fg(TEXT_DIM)),
            Span::raw(abilities),
        ]),
        Line::from(""),
        Line::styled("Breeding", heading),
        Line::from(vec![
            Span::styled("Gender     ", Style::default().fg(TEXT_DIM)),
            Span::raw(gender_label(&detail.gender_ratio)),
        ]),
        Line::from(vec![
            Span::styled("Egg Groups ", Style::default().fg(TEXT_DIM)),
            Span::raw(egg_groups),
        ]),
        Line::from(vec![
            Span::styled("Egg Cycle  ", Style::default().fg(TEXT_DIM)),
            Span::raw(detail.egg_cycle.clone()),
        ]),
    ])
}

fn stats_text(detail: &CreatureDetail) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = detail
        .base_stats
        .iter()
        .map(|stat| stat_line(&format_stat_name(&stat.key), stat.value, STAT_MAX))
        .collect();
    lines.push(Line::from(""));
    lines.push(stat_line("Total", detail.stat_total(), STAT_TOTAL_MAX));
    Text::from(lines)
}

fn stat_line(label: &str, value: u32, max: u32) -> Line<'static> {
    let good = value * STAT_MAX >= STAT_GOOD_THRESHOLD * max;
    let color = if good { STAT_GOOD } else { STAT_POOR };
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(TEXT_DIM)),
        Span::styled(format!("{value:>4} "), Style::default().fg(TEXT_MAIN)),
        Span::styled(stat_bar(value, max), Style::default().fg(color)),
    ])
}

fn stat_bar(value: u32, max: u32) -> String {
    let filled = (value.min(max) as usize * BAR_WIDTH) / max.max(1) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn render_evolution(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    detail: &CreatureDetail,
    evolution_list: &mut SelectList,
) {
    if !detail.has_evolutions() {
        frame.render_widget(
            Paragraph::new("No evolutions")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            area,
        );
        return;
    }
    let items = evolution_items(detail);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state
            .evolution_selected_index
            .min(items.len().saturating_sub(1)),
        is_focused: true,
        style: list_style(Some(BG_PANEL)),
        behavior: SelectListBehavior {
            show_scrollbar: false,
            wrap_navigation: false,
        },
        on_select: Action::EvolutionSelect,
        render_item: &|item| item.clone(),
    };
    evolution_list.render(frame, area, props);
}

fn evolution_items(detail: &CreatureDetail) -> Vec<Line<'static>> {
    detail
        .evolution_chain
        .iter()
        .enumerate()
        .map(|(idx, stage)| {
            if idx == 0 {
                return Line::from(stage.display_name.clone());
            }
            Line::from(vec![
                Span::styled(
                    format!("  {} -> ", stage.evolution_method),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::raw(stage.display_name.clone()),
            ])
        })
        .collect()
}

// ============================================================================
// Footer
// ============================================================================

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.detail_loading {
            "Loading pokemon...".to_string()
        } else if state.pager.is_loading() {
            "Loading pokedex...".to_string()
        } else {
            format!("{} cached", state.details.len())
        }
    });
    let hints = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

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
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    match state.screen {
        Screen::List => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("r", "Retry"),
            StatusBarHint::new("q", "Quit"),
        ],
        Screen::Detail => {
            let mut hints = vec![
                StatusBarHint::new("h/l", "Tabs"),
                StatusBarHint::new("Esc", "Back"),
            ];
            if state.detail_tab == DetailTab::Evolution {
                hints.push(StatusBarHint::new("j/k", "Stage"));
                hints.push(StatusBarHint::new("Enter", "Open"));
            }
            hints.push(StatusBarHint::new("q", "Quit"));
            hints
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn list_style(bg: Option<Color>) -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn spinner(state: &AppState) -> char {
    SPINNER[(state.tick % SPINNER.len() as u64) as usize]
}

fn type_label(types: &[String]) -> String {
    types
        .iter()
        .map(|name| capitalize(name))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn gender_label(ratio: &GenderRatio) -> String {
    if ratio.is_genderless() {
        "Genderless".to_string()
    } else {
        format!("♂ {:.1}%  ♀ {:.1}%", ratio.male, ratio.female)
    }
}

fn species_color(name: &str) -> Color {
    match name {
        "black" => Color::Rgb(88, 88, 88),
        "blue" => Color::Rgb(104, 144, 240),
        "brown" => Color::Rgb(176, 112, 48),
        "gray" => Color::Rgb(160, 160, 160),
        "green" => Color::Rgb(120, 200, 80),
        "pink" => Color::Rgb(240, 152, 200),
        "purple" => Color::Rgb(168, 112, 200),
        "red" => Color::Rgb(240, 80, 72),
        "white" => Color::Rgb(240, 240, 240),
        "yellow" => Color::Rgb(248, 208, 48),
        _ => Color::Rgb(200, 200, 200),
    }
}

/// Plain-text card for the `show` subcommand.
pub fn describe(detail: &CreatureDetail) -> String {
    let mut lines = vec![
        format!(
            "{} #{:03}  {}",
            capitalize(&detail.name),
            detail.national_dex_number,
            type_label(&detail.types)
        ),
        detail.species_label.clone(),
        String::new(),
        detail.flavor_text.clone(),
        String::new(),
        format!("Height:     {}", format_height(detail.height_m)),
        format!("Weight:     {}", format_weight(detail.weight_kg)),
        format!(
            "Abilities:  {}",
            detail
                .abilities
                .iter()
                .map(|ability| format_name(ability))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        format!("Gender:     {}", gender_label(&detail.gender_ratio)),
        format!(
            "Egg groups: {}",
            detail
                .egg_groups
                .iter()
                .map(|group| format_name(group))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        format!("Egg cycle:  {}", detail.egg_cycle),
        String::new(),
    ];
    for stat in &detail.base_stats {
        lines.push(format!(
            "{:<8} {:>4} {}",
            format_stat_name(&stat.key),
            stat.value,
            stat_bar(stat.value, STAT_MAX)
        ));
    }
    lines.push(format!(
        "{:<8} {:>4} {}",
        "Total",
        detail.stat_total(),
        stat_bar(detail.stat_total(), STAT_TOTAL_MAX)
    ));
    lines.push(String::new());
    if detail.has_evolutions() {
        let chain = detail
            .evolution_chain
            .iter()
            .enumerate()
            .map(|(idx, stage)| {
                if idx == 0 {
                    stage.display_name.clone()
                } else {
                    format!("({}) {}", stage.evolution_method, stage.display_name)
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ");
        lines.push(format!("Evolution:  {chain}"));
    } else {
        lines.push("Evolution:  No evolutions".to_string());
    }
    lines.join("\n")
}
