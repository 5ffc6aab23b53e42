use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
    },
};
use serde_json::Value;
use tnkb_core::model::{LookupSource, VehicleInfo};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let mode = if app.offline { "offline" } else { "online" };
    let header = Paragraph::new(format!(
        "tnkb – Indonesian vehicle registration plates ({mode})"
    ))
    .block(Block::default().borders(Borders::ALL).title("TNKB"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::PlateCheck => draw_plate_check(frame, app, *content_area),
        Screen::RegionList => draw_region_list(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::PlateCheck => {
            "Type a plate · Enter check · ↑/↓ history · Tab regions · Esc/Ctrl-C quit"
        }
        Screen::RegionList => "↑/↓ move · Tab/Esc/b back · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Checking… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_plate_check(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // history + details
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, body_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.plate_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Plate number (e.g. B 1234 ABC, Enter)"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(*body_area);

    let body = body_chunks.as_ref();
    let [history_area, details_area] = body else {
        return;
    };

    let items = if app.results.is_empty() {
        vec![ListItem::new("No plates checked yet.")]
    } else {
        app.results
            .iter()
            .map(|info| {
                let marker = if info.is_valid() { "✓" } else { "✗" };
                ListItem::new(format!("{marker} {}", info.plate_number()))
                    .style(Style::default().fg(source_color(info.source())))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("History (↑/↓)"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.results.is_empty() {
        state.select(Some(app.result_index));
    }
    frame.render_stateful_widget(list, *history_area, &mut state);

    let Some(info) = app.selected_result() else {
        let paragraph = Paragraph::new("Check a plate to see its region.")
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *details_area);
        return;
    };

    let province = app
        .service
        .region_info(info.region_code())
        .map_or_else(|| "-".to_owned(), |region| region.province);

    let mut rows = vec![
        detail_row("Plate", info.plate_number().to_owned()),
        detail_row("Valid", if info.is_valid() { "yes" } else { "no" }.to_owned()),
        detail_row("Region code", info.region_code().to_owned()),
        detail_row("Region", info.region_name().to_owned()),
        detail_row("Province", province),
        detail_row("Vehicle type", info.vehicle_type().to_owned()),
        detail_row("Source", source_label(info.source()).to_owned()),
        detail_row(
            "Checked at",
            info.created_at()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        ),
    ];
    rows.extend(
        info.details()
            .iter()
            .map(|(key, value)| detail_row(key, value_label(value))),
    );

    let column_widths = [Constraint::Length(14), Constraint::Min(20)];

    let table = Table::new(rows, column_widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(info.to_string()),
        )
        .style(Style::default().fg(source_color(info.source())))
        .column_spacing(1);

    frame.render_widget(table, *details_area);
}

fn draw_region_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = app.regions.iter().map(|region| {
        Row::new(vec![
            Cell::from(region.code.clone()),
            Cell::from(region.name.clone()),
            Cell::from(region.province.clone()),
        ])
    });

    let column_widths = [
        Constraint::Length(6),
        Constraint::Length(20),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Code", "Region", "Province"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Regions ({})", app.regions.len())),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    if !app.regions.is_empty() {
        state.select(Some(app.region_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn detail_row<'row>(label: &str, value: String) -> Row<'row> {
    Row::new(vec![Cell::from(label.to_owned()), Cell::from(value)])
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn source_label(source: LookupSource) -> &'static str {
    match source {
        LookupSource::Remote => "remote API",
        LookupSource::LocalParsing => "local parsing",
        LookupSource::Invalid => "invalid input",
    }
}

fn source_color(source: LookupSource) -> Color {
    match source {
        LookupSource::Remote => Color::Green,
        LookupSource::LocalParsing => Color::Cyan,
        LookupSource::Invalid => Color::Red,
    }
}

/// One-line summary used by the batch mode.
pub(crate) fn summary_line(info: &VehicleInfo) -> String {
    let marker = if info.is_valid() { "✓" } else { "✗" };
    format!(
        "{marker} {:15} -> {} ({})",
        info.plate_number(),
        info.region_name(),
        source_label(info.source())
    )
}
