use census_map_core::overlay::{OverlayFeature, Shape};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style, Stylize};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line, Map};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use census_map_tui::map::Bounds;

use crate::app::App;

/// Base map, overlays in attach order, and a marker where the popup points.
pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let inner = app.panes().map_inner;
    let bounds = app.viewport.bounds(inner.width, inner.height);
    let surface = app.panel.surface();
    let resolution = app.base_map.resolution();

    let title = format!(
        " Map | {} | zoom {} | {:.2}, {:.2} ",
        app.base_map.label(),
        app.viewport.zoom,
        app.viewport.center.lat,
        app.viewport.center.lng
    );

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution,
            });

            for drawn in surface.overlays() {
                ctx.layer();
                let (r, g, b) = drawn.rgb;
                let color = Color::Rgb(r, g, b);
                for feature in drawn.overlay.features() {
                    draw_feature(ctx, feature, &bounds, color);
                }
            }

            if let Some(popup) = surface.popup() {
                ctx.layer();
                ctx.print(popup.at.lng, popup.at.lat, "X".yellow().bold());
            }
        });

    f.render_widget(canvas, area);
}

fn draw_feature(ctx: &mut Context<'_>, feature: &OverlayFeature, bounds: &Bounds, color: Color) {
    match &feature.shape {
        Shape::Area(area) => {
            for polygon in &area.0 {
                draw_ring(ctx, polygon.exterior().0.iter().map(|c| (c.x, c.y)), bounds, color);
                for hole in polygon.interiors() {
                    draw_ring(ctx, hole.0.iter().map(|c| (c.x, c.y)), bounds, color);
                }
            }
        }
        Shape::Path(path) => {
            for line in &path.0 {
                draw_ring(ctx, line.0.iter().map(|c| (c.x, c.y)), bounds, color);
            }
        }
    }
}

/// Segments entirely off one side of the view are skipped.
fn draw_ring(
    ctx: &mut Context<'_>,
    points: impl Iterator<Item = (f64, f64)>,
    bounds: &Bounds,
    color: Color,
) {
    let mut previous: Option<(f64, f64)> = None;
    for (x, y) in points {
        if let Some((px, py)) = previous {
            if segment_visible(bounds, (px, py), (x, y)) {
                ctx.draw(&Line::new(px, py, x, y, color));
            }
        }
        previous = Some((x, y));
    }
}

fn segment_visible(bounds: &Bounds, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> bool {
    !(x1.max(x2) < bounds.west
        || x1.min(x2) > bounds.east
        || y1.max(y2) < bounds.south
        || y1.min(y2) > bounds.north)
}

#[cfg(test)]
mod tests {
    use super::segment_visible;
    use census_map_tui::map::Bounds;

    const VIEW: Bounds = Bounds {
        west: -10.0,
        east: 10.0,
        south: -5.0,
        north: 5.0,
    };

    #[test]
    fn segments_crossing_the_view_are_kept() {
        assert!(segment_visible(&VIEW, (-20.0, 0.0), (20.0, 0.0)));
        assert!(segment_visible(&VIEW, (0.0, 0.0), (1.0, 1.0)));
    }

    #[test]
    fn segments_beside_the_view_are_culled() {
        assert!(!segment_visible(&VIEW, (-30.0, 0.0), (-20.0, 1.0)));
        assert!(!segment_visible(&VIEW, (0.0, 6.0), (3.0, 9.0)));
    }
}
