use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::locale;
use crate::tui::app::{App, Tab};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);

    match app.tab {
        Tab::Today => draw_today(f, app, main_chunks[1]),
        Tab::History => draw_history(f, app, main_chunks[1]),
    }

    let footer_text = match app.tab {
        Tab::Today => "s: smoke | d: delete | r: rollover | Tab: history | l: lang | q: quit",
        Tab::History => "j/k: navigate | d: delete | Tab: today | l: lang | q: quit",
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let tab_style = |tab: Tab| {
        if app.tab == tab {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let title = Line::from(vec![
        Span::styled("PUFFTRACK", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Today", tab_style(Tab::Today)),
        Span::raw(" / "),
        Span::styled(
            locale::text(app.lang, "history.title"),
            tab_style(Tab::History),
        ),
        Span::raw("   "),
        Span::styled(app.lang.code().to_uppercase(), Style::default().fg(Color::Yellow)),
    ]);
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, area);
}

fn draw_today(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_today_summary(f, app, chunks[0]);
    draw_event_list(f, app, chunks[1]);
}

fn draw_today_summary(f: &mut Frame, app: &App, area: Rect) {
    let lang = app.lang;
    let tally = app.tally_service.tally();

    let elapsed = tally
        .seconds_since_last(Utc::now())
        .map(crate::format_elapsed)
        .unwrap_or_else(|| "--:--:--".to_string());

    let mut lines = vec![
        Line::from(locale::format_date(lang, Local::now().date_naive())),
        Line::from(""),
        Line::from(Span::styled(
            elapsed,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            locale::text(lang, "home.timeSinceLast"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(locale::text(lang, "home.smokedCount"), Style::default().fg(Color::Blue)),
            Span::raw(format!(" {}", tally.smoked_count)),
        ]),
        Line::from(vec![
            Span::styled(locale::text(lang, "home.limit"), Style::default().fg(Color::Blue)),
            Span::raw(format!(" {}", app.limit)),
        ]),
    ];

    let over = tally.over_limit(app.limit);
    if over > 0 {
        lines.push(Line::from(Span::styled(
            locale::text(lang, "home.overLimit").replace("{count}", &over.to_string()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled(locale::text(lang, "home.remaining"), Style::default().fg(Color::Blue)),
            Span::raw(format!(" {}", tally.remaining(app.limit))),
        ]));
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let summary = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Today ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(summary, area);
}

fn draw_event_list(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .tally_service
        .tally()
        .smoke_times
        .iter()
        .map(|event| {
            Row::new(vec![
                Span::styled(event.time.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(event.key.clone(), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(7), Constraint::Min(10)])
        .header(Row::new(vec!["Time", "Key"]).style(Style::default().fg(Color::Yellow)))
        .block(
            Block::default()
                .title(format!(" {} ", locale::text(app.lang, "history.times")))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.today_state);
}

fn draw_history(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_history_list(f, app, chunks[0]);
    draw_history_detail(f, app, chunks[1]);
}

fn draw_history_list(f: &mut Frame, app: &mut App, area: Rect) {
    let lang = app.lang;
    let rows: Vec<Row> = app
        .history
        .iter()
        .map(|entry| {
            let over_style = if entry.over_limit > 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Row::new(vec![
                Span::raw(locale::format_date(lang, entry.date)),
                Span::raw(format!("{} / {}", entry.smoked_count, entry.limit)),
                Span::styled(entry.over_limit.to_string(), over_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(18),
            Constraint::Length(9),
            Constraint::Length(5),
        ],
    )
    .header(Row::new(vec!["Date", "Count", "Over"]).style(Style::default().fg(Color::Yellow)))
    .block(
        Block::default()
            .title(format!(" {} ", locale::text(lang, "history.title")))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.history_state);
}

fn draw_history_detail(f: &mut Frame, app: &App, area: Rect) {
    let lang = app.lang;
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let Some(entry) = app.history_state.selected().and_then(|i| app.history.get(i)) else {
        f.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            locale::format_date(lang, entry.date),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Id: ", Style::default().fg(Color::DarkGray)),
            Span::raw(entry.id.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                locale::text(lang, "history.smokedCount"),
                Style::default().fg(Color::Blue),
            ),
            Span::raw(format!(" {} / {}", entry.smoked_count, entry.limit)),
        ]),
    ];

    if entry.over_limit > 0 {
        lines.push(Line::from(Span::styled(
            locale::text(lang, "history.overLimit").replace("{count}", &entry.over_limit.to_string()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{}:", locale::text(lang, "history.times")),
        Style::default().fg(Color::Blue),
    )));
    lines.push(Line::from(
        entry
            .smoke_times
            .iter()
            .map(|e| e.time.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    ));

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}
