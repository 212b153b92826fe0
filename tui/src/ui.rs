//! Rendering
//!
//! Pure functions from [`DisplayState`] to ratatui widgets. Nothing here
//! mutates state; the App owns the loop and calls [`draw`] once per frame.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use greenhero_core::{AnalysisPhase, SignalKind};

use crate::display::DisplayState;
use crate::input::{InputMode, Tab};
use crate::theme;

/// View state the renderer needs from the App
pub struct View<'a> {
    /// Active tab
    pub tab: Tab,
    /// Selected row on the active tab
    pub selected: usize,
    /// Input mode
    pub mode: &'a InputMode,
}

/// Draw one frame
pub fn draw(frame: &mut Frame, display: &DisplayState, view: &View<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], display);
    draw_tabs(frame, chunks[1], view.tab);

    match view.tab {
        Tab::Tasks => draw_tasks(frame, chunks[2], display, view.selected),
        Tab::Achievements => draw_achievements(frame, chunks[2], display, view.selected),
        Tab::Social => draw_social(frame, chunks[2], display, view.selected),
        Tab::Rewards => draw_rewards(frame, chunks[2], display, view.selected),
        Tab::Analysis => draw_analysis(frame, chunks[2], display),
    }

    draw_footer(frame, chunks[3], display, view);
}

// ============================================================================
// Chrome
// ============================================================================

fn draw_header(frame: &mut Frame, area: Rect, display: &DisplayState) {
    let mut spans = vec![
        Span::styled(" GreenHero ", theme::title_style()),
        Span::raw("  "),
        Span::styled(
            format!("{} Green Coins", format_coins(display.balance)),
            theme::coin_style(),
        ),
    ];

    if let Some(delta) = display.last_delta {
        let (text, color) = if delta >= 0 {
            (format!("  +{delta}"), theme::LEAF_GREEN)
        } else {
            (format!("  {delta}"), theme::WARNING_AMBER)
        };
        spans.push(Span::styled(text, Style::default().fg(color)));
    }

    if let Some(profile) = display.profile() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            profile.level.badge(),
            Style::default().fg(theme::level_color(profile.level)),
        ));
        spans.push(Span::styled(
            format!("  {}-day streak", profile.streak_days),
            Style::default().fg(theme::DIM_GRAY),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::FOREST_GREEN)),
    );
    frame.render_widget(header, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(Block::default().borders(Borders::BOTTOM))
        .highlight_style(theme::title_style().add_modifier(Modifier::UNDERLINED));
    frame.render_widget(tabs, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, display: &DisplayState, view: &View<'_>) {
    let line = if let InputMode::ImagePath(buf) = view.mode {
        Line::from(vec![
            Span::styled("Image path: ", theme::title_style()),
            Span::raw(buf.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled("  (Enter load, Esc cancel)", Style::default().fg(theme::DIM_GRAY)),
        ])
    } else if let Some(quote) = &display.pending_quote {
        Line::from(vec![
            Span::styled(
                format!(
                    "Redeem {} for {} coins? Balance after: {}  ",
                    quote.reward_name,
                    quote.cost,
                    format_coins(quote.balance_after)
                ),
                theme::coin_style(),
            ),
            Span::styled("[y/n]", theme::title_style()),
        ])
    } else if let Some(n) = &display.notification {
        Line::from(Span::styled(
            n.message.clone(),
            Style::default().fg(theme::notify_color(n.level)),
        ))
    } else {
        Line::from(Span::styled(
            "Tab/1-5 switch  ↑↓ select  Enter do/redeem  o photo  a analyze  c cancel  q quit",
            Style::default().fg(theme::DIM_GRAY),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

// ============================================================================
// Tabs
// ============================================================================

fn draw_tasks(frame: &mut Frame, area: Rect, display: &DisplayState, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(area);

    let items: Vec<ListItem> = display
        .tasks()
        .iter()
        .map(|task| {
            let check = if task.completed { "[x]" } else { "[ ]" };
            let style = if task.completed {
                Style::default().fg(theme::DIM_GRAY)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{check} "), style),
                Span::raw(format!("{} ", task.category.icon())),
                Span::styled(pad_to_width(&task.title, 28), style),
                Span::styled(
                    pad_to_width(task.category.label(), 11),
                    Style::default().fg(theme::DIM_GRAY),
                ),
                Span::styled(format!("+{}", task.coins), theme::coin_style()),
            ]))
        })
        .collect();

    render_list(frame, chunks[0], "Green Tasks", items, selected);

    let detail = display.tasks().get(selected).map_or_else(Vec::new, |task| {
        let mut lines = vec![Line::from(task.description.clone())];
        if task.trigger == Some(SignalKind::VegetarianMeal) {
            lines.push(Line::from(Span::styled(
                "Completes automatically when a meal photo is judged vegetarian",
                Style::default().fg(theme::LEAF_GREEN),
            )));
        }
        lines
    });
    frame.render_widget(
        Paragraph::new(detail)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP)),
        chunks[1],
    );
}

fn draw_achievements(frame: &mut Frame, area: Rect, display: &DisplayState, selected: usize) {
    let items: Vec<ListItem> = display
        .achievements()
        .iter()
        .map(|a| {
            let pct = a.percent();
            ListItem::new(Line::from(vec![
                Span::styled(
                    pad_to_width(&a.level.badge(), 9),
                    Style::default().fg(theme::level_color(a.level)),
                ),
                Span::raw(pad_to_width(&a.title, 24)),
                Span::styled(progress_bar(pct, 20), Style::default().fg(theme::LEAF_GREEN)),
                Span::raw(format!(" {pct:>3}%  {}/{}", a.progress, a.total)),
                Span::styled(
                    if a.is_unlocked() { "  unlocked" } else { "" },
                    theme::coin_style(),
                ),
            ]))
        })
        .collect();

    render_list(frame, area, "Achievements", items, selected);
}

fn draw_social(frame: &mut Frame, area: Rect, display: &DisplayState, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let profile_lines = display.profile().map_or_else(Vec::new, |p| {
        vec![
            Line::from(vec![
                Span::styled("Level ", Style::default().fg(theme::DIM_GRAY)),
                Span::styled(p.level.label(), Style::default().fg(theme::level_color(p.level))),
                Span::styled("   Streak ", Style::default().fg(theme::DIM_GRAY)),
                Span::raw(format!("{} days", p.streak_days)),
            ]),
            Line::from(vec![
                Span::styled("This month ", Style::default().fg(theme::DIM_GRAY)),
                Span::raw(p.monthly_label()),
                Span::styled("   Carbon saved ", Style::default().fg(theme::DIM_GRAY)),
                Span::raw(format!("{:.1} kg", p.carbon_saved_kg)),
            ]),
        ]
    });
    frame.render_widget(
        Paragraph::new(profile_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Your profile ", theme::title_style())),
        ),
        chunks[0],
    );

    let rows: Vec<Row> = display
        .leaderboard()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut style = if e.is_self {
                Style::default()
                    .fg(theme::LEAF_GREEN)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            if i == selected {
                style = theme::selected_style();
            }
            let rank = if e.is_podium() {
                format!("#{} *", e.rank)
            } else {
                format!("#{}", e.rank)
            };
            Row::new(vec![
                rank,
                e.avatar.clone(),
                e.name.clone(),
                format_coins(e.coins),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["Rank", "", "Name", "Coins"]).style(theme::title_style()))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Leaderboard ", theme::title_style())),
    );
    frame.render_widget(table, chunks[1]);
}

fn draw_rewards(frame: &mut Frame, area: Rect, display: &DisplayState, selected: usize) {
    let enabled = display.redemption_enabled();
    let items: Vec<ListItem> = display
        .rewards()
        .iter()
        .map(|view| {
            let r = &view.reward;
            let status = if !enabled {
                Span::styled("redemption off", Style::default().fg(theme::DIM_GRAY))
            } else if view.affordable {
                Span::styled("Enter to redeem", Style::default().fg(theme::LEAF_GREEN))
            } else {
                Span::styled(
                    format!("need {} more", r.coins.saturating_sub(display.balance)),
                    Style::default().fg(theme::DIM_GRAY),
                )
            };
            ListItem::new(Line::from(vec![
                Span::raw(pad_to_width(&r.name, 28)),
                Span::styled(
                    pad_to_width(&r.category, 12),
                    Style::default().fg(theme::DIM_GRAY),
                ),
                Span::styled(pad_to_width(&format_coins(r.coins), 8), theme::coin_style()),
                status,
            ]))
        })
        .collect();

    render_list(frame, area, "Reward Shop", items, selected);
}

fn draw_analysis(frame: &mut Frame, area: Rect, display: &DisplayState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(columns[0]);

    // Photo and phase
    let mut photo = vec![Line::from(vec![
        Span::styled("Status: ", Style::default().fg(theme::DIM_GRAY)),
        Span::styled(display.phase.label(), phase_style(display.phase)),
    ])];
    match &display.image {
        Some(img) => {
            photo.push(Line::from(img.file_name.clone()));
            photo.push(Line::from(Span::styled(
                format!(
                    "{}  {}x{}  {}",
                    img.mime,
                    img.width,
                    img.height,
                    format_bytes(img.byte_len as u64)
                ),
                Style::default().fg(theme::DIM_GRAY),
            )));
        }
        None => photo.push(Line::from(Span::styled(
            "Press o to choose a meal photo",
            Style::default().fg(theme::DIM_GRAY),
        ))),
    }
    if display.phase.can_begin() {
        photo.push(Line::from(Span::styled(
            "Press a to analyze",
            Style::default().fg(theme::LEAF_GREEN),
        )));
    }
    frame.render_widget(
        Paragraph::new(photo).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Meal photo ", theme::title_style())),
        ),
        left[0],
    );

    // Activity feed, newest at the bottom
    let feed_height = usize::from(left[1].height.saturating_sub(2));
    let skip = display.activity.len().saturating_sub(feed_height);
    let feed: Vec<Line> = display.activity[skip..]
        .iter()
        .map(|l| Line::from(l.clone()))
        .collect();
    frame.render_widget(
        Paragraph::new(feed).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Activity ", theme::title_style())),
        ),
        left[1],
    );

    // Result
    let mut lines = Vec::new();
    if let Some(result) = &display.result {
        let (verdict, color) = if result.is_vegetarian {
            ("Vegetarian meal", theme::LEAF_GREEN)
        } else {
            ("Not vegetarian", theme::WARNING_AMBER)
        };
        lines.push(Line::from(vec![
            Span::styled(verdict, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw("  confidence "),
            Span::styled(
                result.confidence_label(),
                Style::default().fg(theme::confidence_color(result.confidence_band())),
            ),
        ]));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Ingredients", theme::title_style())));
        lines.push(Line::from(result.detected_ingredients.join(", ")));
        lines.push(Line::default());
        let n = &result.nutrition_estimate;
        lines.push(Line::from(Span::styled("Nutrition estimate", theme::title_style())));
        lines.push(Line::from(format!(
            "{} kcal   protein {} g   carbs {} g   fat {} g",
            n.calories, n.protein, n.carbs, n.fat
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Suggestions", theme::title_style())));
        for s in &result.suggestions {
            lines.push(Line::from(format!("- {s}")));
        }
    } else if let Some(error) = &display.analysis_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme::ERROR_RED),
        )));
        lines.push(Line::from(Span::styled(
            "Press a to try again",
            Style::default().fg(theme::DIM_GRAY),
        )));
    } else if display.phase == AnalysisPhase::Analyzing {
        lines.push(Line::from(Span::styled(
            "Looking at your meal...  (c to cancel)",
            Style::default().fg(theme::INFO_BLUE),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Result ", theme::title_style())),
        ),
        columns[1],
    );
}

// ============================================================================
// Helpers
// ============================================================================

fn render_list(frame: &mut Frame, area: Rect, title: &str, items: Vec<ListItem>, selected: usize) {
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(selected.min(items.len() - 1)));
    }
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {title} "), theme::title_style())),
        )
        .highlight_style(theme::selected_style())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn phase_style(phase: AnalysisPhase) -> Style {
    let color = match phase {
        AnalysisPhase::Idle | AnalysisPhase::ImageLoaded => theme::DIM_GRAY,
        AnalysisPhase::Analyzing => theme::INFO_BLUE,
        AnalysisPhase::ResultReady => theme::LEAF_GREEN,
        AnalysisPhase::Failed => theme::ERROR_RED,
    };
    Style::default().fg(color)
}

/// `1250` -> `1,250`
pub fn format_coins(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Human-readable byte count
pub fn format_bytes(n: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if n >= MIB {
        format!("{:.1} MiB", n as f64 / MIB as f64)
    } else if n >= KIB {
        format!("{:.1} KiB", n as f64 / KIB as f64)
    } else {
        format!("{n} B")
    }
}

/// Text progress bar, e.g. `[#####-----]`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Pad with spaces to a display width, truncating with `…` when too long
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = s.width();
    if w < width {
        return format!("{s}{}", " ".repeat(width - w));
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + cw + 2 > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push('…');
    out.push_str(&" ".repeat(width.saturating_sub(used + 1)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(0), "0");
        assert_eq!(format_coins(999), "999");
        assert_eq!(format_coins(1250), "1,250");
        assert_eq!(format_coins(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(50, 10), "[#####-----]");
        assert_eq!(progress_bar(100, 4), "[####]");
        assert_eq!(progress_bar(0, 4), "[----]");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("abc", 6), "abc   ");
        let cut = pad_to_width("a very long reward name", 8);
        assert_eq!(cut.width(), 8);
        assert!(cut.contains('…'));
    }
}
