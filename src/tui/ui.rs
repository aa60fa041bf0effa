//! UI rendering for the machine panel.

use super::app::InteractiveApp;
use crate::Letter;
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &InteractiveApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_rotors(frame, chunks[0], app);
    draw_lamps(frame, chunks[1], app);
    draw_message(frame, chunks[2], app);
    draw_sequencer(frame, chunks[3], app);
    draw_status(frame, chunks[4], app);
}

/// Draw the rotor windows, slow wheel on the left like the real machine.
fn draw_rotors(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let mut spans = vec![Span::raw("  ")];
    for s in (0..3).rev() {
        let slot = app.machine.rotors.slot(s);
        spans.push(Span::styled(
            format!(" {} ", slot.rotor_type),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            format!("[{}]", slot.position),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" ring {} ", slot.ring_setting),
            Style::default().fg(Color::DarkGray),
        ));
        if s != 0 {
            spans.push(Span::raw(" │ "));
        }
    }

    let plugs = app.machine.plugboard.pairs();
    let plug_line = if plugs.is_empty() {
        "plugboard: —".to_string()
    } else {
        let pairs: Vec<String> = plugs.iter().map(|(a, b)| format!("{}{}", a, b)).collect();
        format!("plugboard: {}", pairs.join(" "))
    };

    let paragraph = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(plug_line, Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .title(" Rotors ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw the lamp field: two rows of 13 letters, lit lamp highlighted.
fn draw_lamps(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let rows: Vec<Line> = [0u8, 13]
        .iter()
        .map(|&start| {
            let spans: Vec<Span> = (start..start + 13)
                .map(|i| {
                    let letter = Letter::from_raw(i);
                    let lit = app.lamp == Some(letter);
                    let style = if lit {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    Span::styled(format!(" {} ", letter), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(rows).block(
        Block::default()
            .title(" Lamps ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw the running plaintext/ciphertext log in five-letter groups.
fn draw_message(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let group = |text: &str| -> String {
        text.chars()
            .collect::<Vec<_>>()
            .chunks(5)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let content = vec![
        Line::from(vec![
            Span::raw("plain:  "),
            Span::styled(group(&app.plaintext), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::raw("cipher: "),
            Span::styled(
                group(&app.ciphertext),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(content).wrap(ratatui::widgets::Wrap { trim: false }).block(
        Block::default()
            .title(" Message ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw the sequencer state.
fn draw_sequencer(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let seq = &app.machine.sequencer;
    let content = vec![
        Line::from(vec![
            Span::raw("phase: "),
            Span::styled(
                format!("{:?}", seq.phase()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("   double step: "),
            Span::styled(
                if seq.double_step_pending() { "armed" } else { "—" },
                if seq.double_step_pending() {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            ),
        ]),
        Line::from(vec![
            Span::raw("ticks: "),
            Span::styled(format!("{}", app.machine.ticks), Style::default().fg(Color::Cyan)),
            Span::raw("   mode: "),
            Span::styled(
                if app.step_mode { "single-tick" } else { "auto" },
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Sequencer ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw status bar with key help.
fn draw_status(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default().title(" Status ").borders(Borders::ALL));

    frame.render_widget(status, area);
}
