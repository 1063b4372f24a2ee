use census_map_core::LookupOutcome;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` box with its top-left corner next to `anchor`,
/// shifted back inside `area` when it would overflow.
pub fn anchored_rect(anchor: (u16, u16), width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let right = area.x + area.width;
    let bottom = area.y + area.height;

    let x = (anchor.0 + 1).min(right - width).max(area.x);
    let y = (anchor.1 + 1).min(bottom - height).max(area.y);

    Rect::new(x, y, width, height)
}

/// Rows the lookup popup needs, borders and header included.
pub fn lookup_height(outcome: &LookupOutcome) -> u16 {
    match outcome {
        Ok(table) => u16::try_from(table.rows.len()).unwrap_or(u16::MAX).saturating_add(4),
        Err(_) => 5,
    }
}

pub fn render_lookup_popup(f: &mut Frame<'_>, area: Rect, outcome: &LookupOutcome) {
    f.render_widget(Clear, area);

    match outcome {
        Ok(table) => {
            let block = Block::default()
                .title(format!(" {} ", table.location))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow));

            let header = Row::new(vec![
                Cell::from("Language"),
                Cell::from("Estimate"),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows = table.rows.iter().map(|row| {
                Row::new(vec![
                    Cell::from(row.label.as_str()),
                    Cell::from(row.estimate.as_str()),
                ])
            });

            let widget = Table::new(rows, [Constraint::Min(12), Constraint::Length(10)])
                .header(header)
                .block(block);
            f.render_widget(widget, area);
        }
        Err(e) => {
            let block = Block::default()
                .title(" Lookup failed ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red));
            let paragraph = Paragraph::new(e.user_message())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(paragraph, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::anchored_rect;
    use ratatui::layout::Rect;

    #[test]
    fn popup_opens_beside_the_anchor() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(anchored_rect((10, 5), 30, 10, area), Rect::new(11, 6, 30, 10));
    }

    #[test]
    fn popup_is_pushed_back_inside() {
        let area = Rect::new(10, 2, 50, 20);
        assert_eq!(anchored_rect((58, 20), 30, 10, area), Rect::new(30, 12, 30, 10));
        assert_eq!(anchored_rect((0, 0), 80, 40, area), area);
    }
}
