//! Terminal UI rendering with ratatui

use crate::animation::Animation;
use crate::settings::Settings;
use crate::surface::Scene;
use crate::tetromino::Shape;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, canvas::Canvas},
    Frame,
};

/// Canvas marker for a settings name; unknown names fall back to half blocks
pub fn marker_from_name(name: &str) -> Marker {
    match name.to_lowercase().as_str() {
        "braille" => Marker::Braille,
        "block" => Marker::Block,
        "dot" => Marker::Dot,
        _ => Marker::HalfBlock,
    }
}

/// Render the presented scene plus the optional status line
pub fn render_demo(frame: &mut Frame, scene: &Scene, anim: &Animation, shape: &Shape, settings: &Settings) {
    let area = frame.area();

    let constraints = if settings.visual.show_status {
        vec![Constraint::Min(3), Constraint::Length(1)]
    } else {
        vec![Constraint::Min(3)]
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let block = Block::default()
        .title(" TETRODEMO ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let canvas = Canvas::default()
        .block(block)
        .marker(marker_from_name(&settings.visual.marker))
        .background_color(Color::from(scene.background()))
        .x_bounds([0.0, f64::from(scene.width())])
        .y_bounds([0.0, f64::from(scene.height())])
        .paint(|ctx| ctx.draw(scene));
    frame.render_widget(canvas, layout[0]);

    if settings.visual.show_status {
        frame.render_widget(status_line(anim, shape, settings), layout[1]);
    }
}

/// One-line summary of the animation state and the key hints
fn status_line<'a>(anim: &Animation, shape: &Shape, settings: &Settings) -> Paragraph<'a> {
    let hint = format!(
        "  {} next  {}/{} rotate  {} quit",
        settings.keys.next_shape.join(","),
        settings.keys.rotate_left.join(","),
        settings.keys.rotate_right.join(","),
        settings.keys.quit.join(","),
    );
    let line = Line::from(vec![
        Span::styled(format!(" {} ", shape.name()), Style::default().fg(Color::from(shape.color())).bold()),
        Span::styled(
            format!(
                " orientation {}  ({}, {})  {}",
                anim.orientation.index(),
                anim.x,
                anim.y,
                settings.visual.bevel.name()
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);
    Paragraph::new(line)
}
