use census_map_core::{HexColor, LayerId, LayerStatus};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

pub const fn layer_color(color: &HexColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

const fn checkbox(status: LayerStatus) -> &'static str {
    match status {
        LayerStatus::Unloaded => "[ ] ",
        LayerStatus::Loading => "[~] ",
        LayerStatus::Attached => "[x] ",
    }
}

/// One row per configured layer: checkbox and label in the overlay colour.
pub fn render_layer_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Layers")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<TextLine<'_>> = app
        .panel
        .items()
        .into_iter()
        .map(|item| {
            let status = app
                .panel
                .status(item.id)
                .unwrap_or(LayerStatus::Unloaded);
            let selected = item.id == LayerId(app.selected_layer);

            let mut label_style = Style::default().fg(layer_color(item.color));
            if selected {
                label_style = label_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }

            TextLine::from(vec![
                Span::styled(checkbox(status), Style::default().fg(Color::White)),
                Span::styled(item.label, label_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
