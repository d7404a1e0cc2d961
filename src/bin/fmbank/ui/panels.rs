//! Parameter list and active-voice panels

use fmbank::{GlobalParams, ParamAddress};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::state::{EngineSnapshot, SessionInfo};
use crate::keyboard::note_name;

/// One row per parameter: requested value, and what the engine is rendering
/// with while a glide is in flight.
pub fn render_params(
    frame: &mut Frame,
    area: Rect,
    requested: &GlobalParams,
    snapshot: &EngineSnapshot,
    selected: ParamAddress,
    patch_name: &str,
) {
    let lines: Vec<Line> = ParamAddress::ALL
        .iter()
        .map(|&address| {
            let target = requested.get(address);
            let live = snapshot.params.get(address);
            let marker = if address == selected { "▶" } else { " " };

            let style = if address == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(
                    format!("{marker} {} {:<22}", address.index() + 1, address.name()),
                    style,
                ),
                Span::styled(format!("{target:>9.3}"), style),
            ];
            if (target - live).abs() > f32::EPSILON {
                spans.push(Span::styled(
                    format!("  → {live:.3}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Patch: {patch_name} "))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_voices(
    frame: &mut Frame,
    area: Rect,
    snapshot: &EngineSnapshot,
    info: &SessionInfo,
    octave: i8,
) {
    let notes: Vec<String> = snapshot
        .sounding
        .iter()
        .enumerate()
        .filter(|(_, sounding)| **sounding)
        .map(|(note, _)| note_name(note as u8))
        .collect();

    let lines = vec![
        Line::from(format!(
            "{} @ {} Hz, {} ch",
            info.device_name, info.sample_rate, info.channels
        )),
        Line::from(format!("Octave: {octave}   Voices: {}", snapshot.voice_count)),
        Line::from(""),
        Line::from(Span::styled(
            notes.join(" "),
            Style::default().fg(Color::Green),
        )),
    ];

    let block = Block::default().title(" Voices ").borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
