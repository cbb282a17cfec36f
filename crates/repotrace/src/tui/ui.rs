//! TUI rendering using ratatui.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use repotrace_core::formatter::{category_rows, compliance_checks, key_metrics};
use repotrace_core::{color_band_of, grade_of, roadmap_view, RoadmapView, SessionState};
use repotrace_models::AnalysisReport;

use super::app::{App, Notice};
use super::theme::{category_color, check_color, score_color, Palette};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Width of the category progress bars, in cells.
const BAR_WIDTH: usize = 20;

/// Draw the TUI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let palette = app.palette();

    // Paint the whole screen in the mode's background
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Input
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, &palette, chunks[0]);
    draw_input(frame, app, &palette, chunks[1]);
    let max_scroll = draw_body(frame, app, &palette, chunks[2]);
    app.set_report_max_scroll(max_scroll);
    draw_status(frame, app, &palette, chunks[3]);
    draw_footer(frame, &palette, chunks[4]);
}

/// Draw the header bar.
fn draw_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let header_text = format!(" RepoTrace - repository health  [{}] ", app.display_mode());
    let header = Paragraph::new(header_text).style(
        Style::default()
            .bg(palette.accent)
            .fg(palette.background)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, area);
}

/// Draw the reference input. Dimmed while a request is pending.
fn draw_input(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let pending = app.is_pending();
    let (style, title) = if pending {
        (Style::default().fg(palette.muted), " Analyzing... ")
    } else {
        (Style::default().fg(palette.text), " Repository (owner/name or URL) ")
    };

    let input = Paragraph::new(app.input.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(title),
    );
    frame.render_widget(input, area);

    if !pending {
        let inner_width = area.width.saturating_sub(2) as usize;
        let col = app.cursor_pos.min(inner_width.saturating_sub(1));
        frame.set_cursor_position((area.x + 1 + col as u16, area.y + 1));
    }
}

/// Draw the body for the current session state.
///
/// Returns the largest scroll offset that still shows report content.
fn draw_body(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) -> u16 {
    match app.state() {
        SessionState::Idle => {
            draw_welcome(frame, palette, area);
            0
        }
        SessionState::Pending => {
            let reference = app.pending_reference.as_deref().unwrap_or_default();
            let text = format!(
                "\n {} Analyzing {} ...",
                SPINNER[app.tick % SPINNER.len()],
                reference
            );
            let body = Paragraph::new(text)
                .style(Style::default().fg(palette.muted))
                .block(body_block(palette, " Report "));
            frame.render_widget(body, area);
            0
        }
        SessionState::Failure(message) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            let banner = Paragraph::new(message.as_str())
                .style(Style::default().fg(palette.error()))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(palette.error()))
                        .title(" Error "),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(banner, chunks[0]);
            0
        }
        SessionState::Success(report) => {
            let title = format!(" {} ", report.repo_name);
            let text = report_text(report, palette);
            let inner_height = area.height.saturating_sub(2) as usize;
            let total = wrapped_height(&text, area.width.saturating_sub(2) as usize);
            let max_scroll = total.saturating_sub(inner_height).min(u16::MAX as usize) as u16;

            let body = Paragraph::new(text)
                .block(body_block(palette, &title))
                .wrap(Wrap { trim: false })
                .scroll((app.report_scroll.min(max_scroll), 0));
            frame.render_widget(body, area);
            max_scroll
        }
    }
}

fn body_block<'a>(palette: &Palette, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(title)
}

/// Draw the screen shown before the first analysis.
fn draw_welcome(frame: &mut Frame, palette: &Palette, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            " Enter a GitHub repository and press Enter.",
            Style::default().fg(palette.text),
        )),
        Line::from(Span::styled(
            " Example: octocat/Hello-World",
            Style::default().fg(palette.muted),
        )),
    ];
    let welcome = Paragraph::new(lines).block(body_block(palette, " Report "));
    frame.render_widget(welcome, area);
}

/// Build the report view.
fn report_text(report: &AnalysisReport, palette: &Palette) -> Text<'static> {
    let heading = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(palette.muted);
    let band = color_band_of(report.score);

    let mut lines = Vec::new();

    // Summary card
    if let Some(description) = &report.description {
        lines.push(Line::from(Span::styled(description.clone(), muted)));
    }
    lines.push(Line::from(vec![
        Span::styled(
            format!("{}/100", report.score),
            Style::default()
                .fg(score_color(band))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Grade {}", grade_of(report.score)),
            Style::default().fg(score_color(band)),
        ),
    ]));
    lines.push(Line::from(report.summary.clone()));

    let metrics = key_metrics(&report.details)
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("   ");
    lines.push(Line::from(Span::styled(metrics, muted)));

    if !report.tech_stack.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Stack: {}", report.tech_stack.join(", ")),
            muted,
        )));
    }

    // Categories
    let rows = category_rows(report);
    if !rows.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Categories", heading)));
        let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
        for row in rows {
            let color = category_color(row.band);
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<width$}  ", row.name, width = name_width)),
                Span::styled(bar(row.ratio, BAR_WIDTH), Style::default().fg(color)),
                Span::styled(format!(" {:>2}/25", row.score), Style::default().fg(color)),
            ]));
        }
    }

    // Roadmap
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Roadmap", heading)));
    match roadmap_view(report) {
        RoadmapView::Complete(message) => {
            lines.push(Line::from(format!("  {}", message)));
        }
        RoadmapView::Steps(steps) => {
            for step in steps {
                lines.push(Line::from(format!("  {}. {}", step.number, step.text)));
            }
        }
    }

    // Deep dive
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Deep Dive", heading)));
    for check in compliance_checks(&report.details) {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<16}", check.label)),
            Span::styled(check.status(), Style::default().fg(check_color(check.passed))),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("  Recent commits: {}", report.details.recent_commits),
        muted,
    )));

    Text::from(lines)
}

/// Estimate how many rows `text` takes when wrapped to `width` columns.
fn wrapped_height(text: &Text, width: usize) -> usize {
    text.lines
        .iter()
        .map(|line| {
            if width == 0 {
                1
            } else {
                line.width().div_ceil(width).max(1)
            }
        })
        .sum()
}

/// Render `ratio` as a fixed-width bar.
fn bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Draw the status bar.
fn draw_status(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (text, fg) = match (&app.notice, app.state()) {
        (_, SessionState::Pending) => (
            format!(" {} Working...", SPINNER[app.tick % SPINNER.len()]),
            palette.bar_fg,
        ),
        (Some(Notice::Info(msg)), _) => (format!(" {}", msg), palette.bar_fg),
        (Some(Notice::Warning(msg)), _) => (format!(" {}", msg), palette.error()),
        (None, SessionState::Success(report)) => {
            (format!(" Ready - {}", report.repo_name), palette.bar_fg)
        }
        (None, _) => (" Ready".to_string(), palette.bar_fg),
    };
    let status = Paragraph::new(text).style(Style::default().bg(palette.bar_bg).fg(fg));
    frame.render_widget(status, area);
}

/// Draw the footer with keybindings.
fn draw_footer(frame: &mut Frame, palette: &Palette, area: Rect) {
    let footer = Paragraph::new(
        " Enter: analyze | Ctrl+S: download | F2: theme | ↑/↓ PgUp/PgDn: scroll | Esc: quit ",
    )
    .style(Style::default().bg(palette.bar_bg).fg(palette.muted));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use repotrace_models::{DisplayMode, RepoDetails};

    fn report(roadmap: Vec<String>) -> AnalysisReport {
        AnalysisReport {
            repo_name: "octocat/Hello-World".into(),
            description: None,
            score: 85,
            summary: "Solid project".into(),
            category_scores: [("Testing".to_string(), 8)].into_iter().collect(),
            tech_stack: vec!["Rust".into()],
            details: RepoDetails {
                has_readme: true,
                ..RepoDetails::default()
            },
            roadmap,
            extra: Default::default(),
        }
    }

    fn plain(text: &Text) -> String {
        text.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0, 4), "░░░░");
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(1.0, 4), "████");
        assert_eq!(bar(1.7, 4), "████");
    }

    #[test]
    fn test_wrapped_height() {
        let text = Text::from(vec![
            Line::from("short"),
            Line::default(),
            Line::from("x".repeat(25)),
        ]);
        assert_eq!(wrapped_height(&text, 10), 1 + 1 + 3);
        assert_eq!(wrapped_height(&text, 0), 3);
    }

    #[test]
    fn test_report_text_sections() {
        let palette = Palette::for_mode(DisplayMode::Dark);
        let text = plain(&report_text(&report(vec!["Add CI".into()]), &palette));

        assert!(text.contains("85/100  Grade B"));
        assert!(text.contains("Stack: Rust"));
        assert!(text.contains(" 8/25"));
        assert!(text.contains("1. Add CI"));
        assert!(text.contains("Documentation   Pass"));
        assert!(text.contains("License         Missing"));
    }

    #[test]
    fn test_report_text_empty_roadmap() {
        let palette = Palette::for_mode(DisplayMode::Light);
        let text = plain(&report_text(&report(Vec::new()), &palette));

        assert!(text.contains("Outstanding work!"));
        assert!(!text.contains("1. "));
    }
}
