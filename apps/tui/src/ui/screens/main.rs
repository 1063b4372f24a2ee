use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::layer_list::render_layer_list;
use crate::ui::widgets::map_canvas::render_map;
use crate::ui::widgets::popup::{
    anchored_rect, centered_rect, lookup_height, render_lookup_popup,
};

const LOOKUP_POPUP_WIDTH: u16 = 44;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let panes = app.panes();

    render_layer_list(app, f, panes.list);
    render_map(app, f, panes.map);
    render_status_section(app, f, panes.status);

    if let Some(popup) = app.panel.surface().popup() {
        let height = lookup_height(&popup.outcome);
        let area = match app.viewport.latlng_to_cell(panes.map_inner, popup.at) {
            Some(anchor) => anchored_rect(anchor, LOOKUP_POPUP_WIDTH, height, panes.map_inner),
            None => anchored_rect(
                (panes.map_inner.x, panes.map_inner.y),
                LOOKUP_POPUP_WIDTH,
                height,
                panes.map_inner,
            ),
        };
        render_lookup_popup(f, area, &popup.outcome);
    }

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let style = if app.status_message.starts_with("Error") || app.status_message.starts_with("Failed") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut spans = vec![Span::styled(app.status_message.as_str(), style)];
    if app.pending_lookups > 0 {
        spans.push(Span::styled(
            format!("  ({} lookup(s) pending)", app.pending_lookups),
            Style::default().fg(Color::Gray),
        ));
    }

    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });

    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };

    f.render_widget(hint, hint_area);
}

fn shortcut(keys: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {keys}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {description}")),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    vec![
        TextLine::from(Span::styled(
            "Census Language Map",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Tick a layer to draw it. Click a state or county to see the languages spoken there.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        shortcut("Up/Down, Tab", "Select a layer"),
        shortcut("Space/Enter", "Toggle the selected layer"),
        shortcut("1-9", "Toggle a layer by number"),
        shortcut("w a s d", "Pan the map"),
        shortcut("+ / -", "Zoom in / out"),
        shortcut("b", "Switch base map"),
        shortcut("f", "Centre on the selected layer"),
        shortcut("c", "Look up the shape under the map center"),
        shortcut("Esc", "Close the popup"),
        shortcut("?", "Toggle this help popup"),
        shortcut("q", "Quit"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Mouse:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        shortcut("Click a layer", "Toggle it"),
        shortcut("Click the map", "Look up the shape under the cursor"),
        shortcut("Scroll", "Zoom"),
    ]
}
