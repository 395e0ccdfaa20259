// TUI module for rendering the review screen
pub mod app;
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use app::{App, AppFlow};
pub use colors::*;
pub use helpers::{calculate_progress, format_date, truncate_middle};
pub use input::{handle_confirm_input, handle_key_event, DragTracker, KeyAction};

use crate::deletion::DeletionCounts;
use crate::domain::{
    Decision, Polarity, ReviewItem, SessionPhase, SessionStats, SwipeDirection, SwipeFeedback,
};
use crate::session::SessionSnapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Welcome screen shown on first launch
    Welcome,
    /// Main swipe view
    Reviewing,
    /// Help overlay visible
    Help,
    /// Kept/deleted counts, opened mid-session
    Results,
    /// Confirmation dialog before a delete is applied
    ConfirmDelete,
    /// Confirmation dialog before starting over
    ConfirmReload,
    /// Summary screen at the end or on quit
    Summary,
}

/// Everything the main view needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub feedback: Option<SwipeFeedback>,
    pub polarity: Polarity,
    pub dry_run: bool,
    pub status: Option<&'a str>,
}

/// Renders the header, the current card and the footer
pub fn render(frame: &mut Frame, ctx: &ViewContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header with progress
            Constraint::Min(0),    // Card
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], ctx);
    render_content(frame, chunks[1], ctx);
    render_footer(frame, chunks[2], ctx);
}

fn arrow(direction: SwipeDirection) -> &'static str {
    match direction {
        SwipeDirection::Left => "←",
        SwipeDirection::Right => "→",
    }
}

/// Renders the summary box; `complete` switches the title and the key hints
pub fn render_summary(
    frame: &mut Frame,
    stats: &SessionStats,
    deletions: &DeletionCounts,
    complete: bool,
) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let title = if complete {
        " Session Complete "
    } else {
        " Results "
    };
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("   Total:    "),
            Span::styled(
                stats.total.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   ✓ ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Kept:     "),
            Span::styled(
                stats.kept.to_string(),
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("   ✗ ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("Deleted:  "),
            Span::styled(
                stats.deleted.to_string(),
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("   ○ ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Left:     "),
            Span::styled(
                stats.remaining.to_string(),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
    ];

    if deletions.pending > 0 || deletions.failed > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "   {} deleting, {} could not be removed",
                deletions.pending, deletions.failed
            ),
            Style::default().fg(TEXT_SECONDARY),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(""));
    let hint = if complete {
        "Press r to start over, any other key to exit"
    } else {
        "Press any key to continue"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame, polarity: Polarity) {
    let area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let keep = arrow(polarity.direction_for(Decision::Keep));
    let delete = arrow(polarity.direction_for(Decision::Delete));

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Controls",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} ", keep), Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("or "),
            Span::styled("k", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("     Keep"),
        ]),
        Line::from(vec![
            Span::styled(format!("  {} ", delete), Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("or "),
            Span::styled("d", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("     Delete"),
        ]),
        Line::from(Span::styled(
            "  (or drag the card with the mouse)",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  s", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("           Results"),
        ]),
        Line::from(vec![
            Span::styled("  r", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("           Reload"),
        ]),
        Line::from(vec![
            Span::styled("  q ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("or "),
            Span::styled("Esc", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("     Quit"),
        ]),
        Line::from(vec![
            Span::styled("  ?", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("           Toggle help"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame, polarity: Polarity, dry_run: bool) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let keep = arrow(polarity.direction_for(Decision::Keep));
    let delete = arrow(polarity.direction_for(Decision::Delete));
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to gswp!",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Go through your photos and videos one at a time and decide what stays."),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Swipe "),
            Span::styled(keep, Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" to "),
            Span::styled("keep", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(", swipe "),
            Span::styled(delete, Style::default().fg(ACCENT_PRIMARY)),
            Span::raw(" to "),
            Span::styled("delete", Style::default().fg(ACCENT_PRIMARY)),
        ]),
        Line::from("  Drag the card with the mouse, or use the arrow keys."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Deleted files go to your system "),
            Span::styled("trash", bold),
            Span::raw(" when it is available"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Run with "),
            Span::styled("--dry-run", bold),
            Span::raw(" to try it without touching any file"),
        ]),
    ];

    if dry_run {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  [DRY RUN] No files will be deleted in this session",
            Style::default().fg(ACCENT_HIGHLIGHT),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to start...",
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    )));

    let welcome = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Welcome ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome, area);
}

/// Renders the confirmation dialog shown before a delete is applied
pub fn render_confirm_delete_overlay(frame: &mut Frame, item: &ReviewItem) {
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" ⚠ Confirm Delete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this item?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Name: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(item.name.as_str(), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  Type: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(item.kind.label(), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_SECONDARY)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the confirmation dialog shown before reloading
pub fn render_confirm_reload_overlay(frame: &mut Frame, stats: &SessionStats) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Reload ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Start over from the first item?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} kept and {} deleted decisions will be forgotten.",
                stats.kept, stats.deleted
            ),
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "Deletions already started are not undone.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw("es  "),
            Span::styled("[N]", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("o"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Header: position, running counts and a reviewed-so-far gauge
fn render_header(frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let snapshot = ctx.snapshot;
    let stats = snapshot.stats;

    let title_text = match snapshot.phase {
        SessionPhase::Reviewing { cursor } => format!(" Item {}/{} ", cursor + 1, stats.total),
        _ => " gswp ".to_string(),
    };

    let mut title_spans = vec![Span::styled(
        title_text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    )];
    if ctx.dry_run {
        title_spans.push(Span::styled(
            " [DRY RUN]",
            Style::default().fg(TEXT_SECONDARY),
        ));
    }

    let mut counts = vec![
        Span::styled(" Kept ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(
            stats.kept.to_string(),
            Style::default().fg(ACCENT_SECONDARY),
        ),
        Span::styled("  Deleted ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(
            stats.deleted.to_string(),
            Style::default().fg(ACCENT_PRIMARY),
        ),
        Span::styled("  Left ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(
            stats.remaining.to_string(),
            Style::default().fg(TEXT_PRIMARY),
        ),
    ];
    if snapshot.deletions.pending > 0 {
        counts.push(Span::styled(
            format!("  ({} deleting)", snapshot.deletions.pending),
            Style::default().fg(TEXT_SECONDARY),
        ));
    }

    let header = Paragraph::new(vec![Line::from(title_spans), Line::from(counts)])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let reviewed = snapshot.cursor;
    let progress = calculate_progress(reviewed, stats.total);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress)
        .label(format!(
            "{}% ({}/{})",
            (progress * 100.0) as u16,
            reviewed,
            stats.total
        ));

    frame.render_widget(gauge, chunks[1]);
}

fn render_content(frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    match (ctx.snapshot.phase, &ctx.snapshot.current) {
        (SessionPhase::Reviewing { .. }, Some(item)) => render_card(frame, area, item, ctx),
        (SessionPhase::Loading, _) => match ctx.status {
            Some(message) => frame.render_widget(
                message_widget(
                    "Could not load photos",
                    &[message, "", "Press r to retry or q to quit."],
                    ACCENT_PRIMARY,
                ),
                area,
            ),
            None => frame.render_widget(
                message_widget("Loading photos...", &[], ACCENT_HIGHLIGHT),
                area,
            ),
        },
        (SessionPhase::Empty, _) => frame.render_widget(
            message_widget(
                "No photos found",
                &[
                    "This folder has no photos or videos to review.",
                    "",
                    "Press r to reload or q to quit.",
                ],
                ACCENT_HIGHLIGHT,
            ),
            area,
        ),
        _ => frame.render_widget(
            message_widget(
                "No more photos!",
                &[
                    "You have reviewed everything in this folder.",
                    "",
                    "Press r to start over or q to quit.",
                ],
                ACCENT_SECONDARY,
            ),
            area,
        ),
    }
}

fn message_widget<'a>(
    title: &'a str,
    body: &[&'a str],
    accent: ratatui::style::Color,
) -> Paragraph<'a> {
    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        body.iter()
            .map(|text| Line::from(Span::styled(*text, Style::default().fg(TEXT_SECONDARY)))),
    );

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
}

/// The current item, tinted and labelled while a drag leans one way
fn render_card(frame: &mut Frame, area: Rect, item: &ReviewItem, ctx: &ViewContext) {
    let leaning = ctx.feedback.and_then(|f| f.leaning);
    let border = leaning.map(decision_color).unwrap_or(BORDER_COLOR);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", item.name));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Details
            Constraint::Length(2), // Decision label
            Constraint::Length(1), // Swipe progress
        ])
        .split(inner);

    let width = usize::from(inner.width.saturating_sub(14)).max(10);
    let mut details = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Type:     ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(item.kind.label(), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  Taken:    ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(format_date(item.created), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  Location: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(
                truncate_middle(&item.locator, width),
                Style::default().fg(TEXT_PRIMARY),
            ),
        ]),
    ];
    if let Some(next) = &ctx.snapshot.next {
        details.push(Line::from(""));
        details.push(Line::from(vec![
            Span::styled("  Up next:  ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(
                truncate_middle(&next.name, width),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(details), chunks[0]);

    if let (Some(feedback), Some(decision)) = (ctx.feedback, leaning) {
        let mut style = Style::default()
            .fg(decision_color(decision))
            .add_modifier(Modifier::BOLD);
        if feedback.progress < 0.5 {
            style = style.add_modifier(Modifier::DIM);
        } else if feedback.progress >= 1.0 {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let label = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", decision.label()),
            style,
        )))
        .alignment(Alignment::Center);
        frame.render_widget(label, chunks[1]);
    }

    let progress = ctx.feedback.map(|f| f.progress).unwrap_or(0.0);
    let keep = arrow(ctx.polarity.direction_for(Decision::Keep));
    let delete = arrow(ctx.polarity.direction_for(Decision::Delete));
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(border).bg(BG_DARK))
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{} keep   delete {}", keep, delete));
    frame.render_widget(gauge, chunks[2]);
}

/// Footer with key hints, or the status line when there is one
fn render_footer(frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let keep = arrow(ctx.polarity.direction_for(Decision::Keep));
    let delete = arrow(ctx.polarity.direction_for(Decision::Delete));

    let controls = Line::from(vec![
        Span::styled(
            format!(" {} ", delete),
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Delete", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} ", keep),
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Keep", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("s ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("Results", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}
