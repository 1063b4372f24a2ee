mod helpers;

use crate::app::state::{Action, App};
use census_map_core::LayerId;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

use helpers::{wrap_decrement, wrap_increment};

pub fn handle_input(app: &mut App, key: KeyCode) -> Option<Action> {
    if app.show_help {
        if matches!(key, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return None;
    }

    match key {
        KeyCode::Char('q') => {
            app.running = false;
            None
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            None
        }
        KeyCode::Esc => {
            app.panel.surface_mut().close_popup();
            None
        }
        KeyCode::Up => {
            app.selected_layer = wrap_decrement(app.selected_layer, app.layer_count());
            None
        }
        KeyCode::Down | KeyCode::Tab => {
            app.selected_layer = wrap_increment(app.selected_layer, app.layer_count());
            None
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if index < app.layer_count() {
                app.selected_layer = index;
                app.toggle_layer(LayerId(index))
            } else {
                None
            }
        }
        KeyCode::Char('w') => pan(app, 0, 1),
        KeyCode::Char('s') => pan(app, 0, -1),
        KeyCode::Char('a') => pan(app, -1, 0),
        KeyCode::Char('d') => pan(app, 1, 0),
        KeyCode::Char('+' | '=') => {
            app.viewport.zoom_in();
            None
        }
        KeyCode::Char('-') => {
            app.viewport.zoom_out();
            None
        }
        KeyCode::Char('b') => {
            app.base_map = app.base_map.next();
            app.status_message = format!("Base map: {}", app.base_map.label());
            None
        }
        KeyCode::Char('f') => {
            app.fit_selected();
            None
        }
        KeyCode::Char('c') => {
            let center = app.viewport.center;
            app.click_map(center)
        }
        _ => None,
    }
}

pub fn handle_mouse(app: &mut App, event: MouseEvent) -> Option<Action> {
    if app.show_help {
        return None;
    }

    let panes = app.panes();
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(row) = panes.layer_row(event.column, event.row) {
                if row < app.layer_count() {
                    app.selected_layer = row;
                    return app.toggle_layer(LayerId(row));
                }
                return None;
            }
            let at = app
                .viewport
                .cell_to_latlng(panes.map_inner, event.column, event.row)?;
            app.click_map(at)
        }
        MouseEventKind::ScrollUp => {
            app.viewport.zoom_in();
            None
        }
        MouseEventKind::ScrollDown => {
            app.viewport.zoom_out();
            None
        }
        _ => None,
    }
}

fn pan(app: &mut App, east: i32, north: i32) -> Option<Action> {
    app.viewport.pan(east, north);
    None
}

#[cfg(test)]
mod tests {
    use super::{handle_input, handle_mouse};
    use crate::app::state::{Action, App};
    use census_map_core::{LatLng, LayerId, LayerStatus, LookupError, MapConfig};
    use census_map_tui::AppConfig;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut app = App::new(&AppConfig {
            map: MapConfig::default(),
            layer_base: "./public".into(),
            log_file: "test.log".into(),
        })
        .unwrap();
        app.screen = Rect::new(0, 0, 120, 40);
        app
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn space_toggles_the_selected_layer() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Down);
        let action = handle_input(&mut app, KeyCode::Char(' '));

        match action {
            Some(Action::Load(ticket)) => assert_eq!(ticket.layer, LayerId(1)),
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(app.panel.status(LayerId(1)), Ok(LayerStatus::Loading));

        assert_eq!(handle_input(&mut app, KeyCode::Char(' ')), None);
        assert_eq!(app.panel.status(LayerId(1)), Ok(LayerStatus::Unloaded));
    }

    #[test]
    fn selection_wraps() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Up);
        assert_eq!(app.selected_layer, 3);
        handle_input(&mut app, KeyCode::Down);
        assert_eq!(app.selected_layer, 0);
    }

    #[test]
    fn number_keys_toggle_directly() {
        let mut app = app();
        assert!(matches!(handle_input(&mut app, KeyCode::Char('3')), Some(Action::Load(_))));
        assert_eq!(app.selected_layer, 2);
        assert_eq!(handle_input(&mut app, KeyCode::Char('9')), None);
    }

    #[test]
    fn escape_closes_the_popup() {
        let mut app = app();
        app.apply_lookup(LatLng::new(0.0, 0.0), &Err(LookupError::MissingRegion));
        assert!(app.panel.surface().popup().is_some());

        handle_input(&mut app, KeyCode::Esc);
        assert!(app.panel.surface().popup().is_none());
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        assert_eq!(handle_input(&mut app, KeyCode::Char(' ')), None);
        assert_eq!(app.panel.status(LayerId(0)), Ok(LayerStatus::Unloaded));

        handle_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn clicking_a_list_row_toggles_that_layer() {
        let mut app = app();
        let action = handle_mouse(&mut app, click(4, 3));

        assert!(matches!(action, Some(Action::Load(ticket)) if ticket.layer == LayerId(2)));
        assert_eq!(app.selected_layer, 2);
    }

    #[test]
    fn clicking_empty_map_reports_no_layer() {
        let mut app = app();
        assert_eq!(handle_mouse(&mut app, click(70, 20)), None);
        assert!(app.status_message.starts_with("No lookup layer"));
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
