use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap,
    },
    Frame,
};
use unicode_width::UnicodeWidthChar;
use mapty_core::{MapState, WorkoutType};

use crate::tui::app::{App, Focus, FormField};

// Popup max width is in pixels; a terminal cell is roughly eight.
const PIXELS_PER_CELL: u16 = 8;

fn kind_color(kind: WorkoutType) -> Color {
    match kind {
        WorkoutType::Running => Color::Green,
        WorkoutType::Cycling => Color::Yellow,
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Header and Main Content Split
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("MAPTY")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    // Sidebar (form + list) on the left, map on the right
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(main_chunks[1]);

    draw_sidebar(f, app, content_chunks[0]);
    draw_map(f, app, content_chunks[1]);

    let help = match app.focus {
        Focus::Map => "arrows: Pan | +/-: Zoom | Enter: Log workout here | Tab: List | R: Reset | q: Quit",
        Focus::List => "j/k: Navigate | Enter: Show on map | Tab: Map | R: Reset | q: Quit",
        Focus::Form => "Tab: Next field | ←/→: Type | Enter: Save | Esc: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);

    if let Some(message) = &app.ui().alert {
        draw_alert(f, message, size);
    }
}

fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let constraints = if app.ui().form_visible {
        [Constraint::Length(6), Constraint::Min(1)]
    } else {
        [Constraint::Length(0), Constraint::Min(1)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if app.ui().form_visible {
        draw_form(f, app, chunks[0]);
    }
    draw_list(f, app, chunks[1]);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let ui = app.ui();
    let field = |label: &str, value: &str, this: FormField| -> Line<'static> {
        let style = if ui.focused_field == this {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::Blue)),
            Span::styled(format!(" {:<8}", value), style),
        ])
    };

    let (extra_label, extra_value) = match ui.extra_field {
        WorkoutType::Running => ("Cadence", ui.form.cadence.as_str()),
        WorkoutType::Cycling => ("Elev Gain", ui.form.elevation.as_str()),
    };

    let lines = vec![
        field("Type", ui.form.kind.label(), FormField::Kind),
        field("Distance", &ui.form.distance, FormField::Distance),
        field("Duration", &ui.form.duration, FormField::Duration),
        field(extra_label, extra_value, FormField::Extra),
    ];

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" New workout ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style(app.focus == Focus::Form)),
    );
    f.render_widget(form, area);
}

fn draw_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app.ui().entries.iter().map(|entry| {
        let color = kind_color(entry.kind);
        let details: Vec<Span> = entry
            .details()
            .into_iter()
            .flat_map(|(icon, value, unit)| {
                vec![
                    Span::raw(format!("{} ", icon)),
                    Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!(" {}  ", unit), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();

        ListItem::new(vec![
            Line::from(Span::styled(
                entry.title.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(details),
            Line::from(""),
        ])
    }).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Workouts ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style(app.focus == Focus::List)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▌");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_map(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Map ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(app.focus == Focus::Map));

    let map = app.map();
    let center = match (app.controller.map_state(), map.center) {
        (MapState::Ready, Some(center)) => center,
        (MapState::Unavailable, _) => {
            let p = Paragraph::new("Map unavailable: your position could not be read.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(p, area);
            return;
        }
        _ => {
            let p = Paragraph::new("Waiting for your position...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(p, area);
            return;
        }
    };

    let (lng_span, lat_span) = map.span();
    let canvas = Canvas::default()
        .block(block)
        .x_bounds([center.lng - lng_span / 2.0, center.lng + lng_span / 2.0])
        .y_bounds([center.lat - lat_span / 2.0, center.lat + lat_span / 2.0])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            for marker in &map.markers {
                let color = kind_color(marker.kind);
                ctx.draw(&Points {
                    coords: &[(marker.coords.lng, marker.coords.lat)],
                    color,
                });
                let label = fit_width(&marker.label, marker.max_width / PIXELS_PER_CELL);
                ctx.print(
                    marker.coords.lng,
                    marker.coords.lat,
                    Span::styled(format!(" {}", label), Style::default().fg(color)),
                );
            }

            ctx.print(center.lng, center.lat, Span::styled("+", Style::default().fg(Color::Red)));
        });
    f.render_widget(canvas, area);
}

fn draw_alert(f: &mut Frame, message: &str, area: Rect) {
    let width = (message.chars().count() as u16 + 6).min(area.width);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(5) / 2,
        width,
        height: 5.min(area.height),
    };
    let alert = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(alert, popup);
}

/// Truncates to `max_cols` terminal columns, counting wide glyphs as two.
fn fit_width(text: &str, max_cols: u16) -> String {
    let mut used = 0usize;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_cols as usize {
            out.push('…');
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("Running on May 1", 31), "Running on May 1");
        assert_eq!(fit_width("Running on May 1", 7), "Running…");
    }
}
