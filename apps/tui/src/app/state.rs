use census_map_core::geojson::FeatureCollection;
use census_map_core::{
    ConfigError, LatLng, LayerId, LayerStatus, LoadError, LoadOutcome, LoadTicket,
    LookupOutcome, LookupQuery, MapPanel,
};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::widgets::canvas::MapResolution;

use census_map_tui::map::{TerminalSurface, Viewport};
use census_map_tui::AppConfig;

const LIST_WIDTH: u16 = 32;

/// Work the event loop has to start on behalf of the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Load(LoadTicket),
    Lookup { at: LatLng, query: LookupQuery },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseMap {
    Detailed,
    Outline,
}

impl BaseMap {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Detailed => "Detailed",
            Self::Outline => "Outline",
        }
    }

    pub const fn resolution(self) -> MapResolution {
        match self {
            Self::Detailed => MapResolution::High,
            Self::Outline => MapResolution::Low,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Detailed => Self::Outline,
            Self::Outline => Self::Detailed,
        }
    }
}

/// Screen regions, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub list: Rect,
    pub map: Rect,
    pub map_inner: Rect,
    pub status: Rect,
}

impl Panes {
    pub fn split(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LIST_WIDTH), Constraint::Min(10)])
            .split(rows[0]);

        Self {
            list: columns[0],
            map: columns[1],
            map_inner: columns[1].inner(Margin::new(1, 1)),
            status: rows[1],
        }
    }

    /// Layer row under a list-pane cell (the pane has a one-cell border).
    pub const fn layer_row(&self, column: u16, row: u16) -> Option<usize> {
        let inside_x = column > self.list.x && column < self.list.x + self.list.width - 1;
        let inside_y = row > self.list.y && row < self.list.y + self.list.height - 1;
        if inside_x && inside_y {
            Some((row - self.list.y - 1) as usize)
        } else {
            None
        }
    }
}

pub struct App {
    pub running: bool,
    pub panel: MapPanel<TerminalSurface>,
    pub layer_base: String,
    pub selected_layer: usize,
    pub viewport: Viewport,
    pub base_map: BaseMap,
    pub status_message: String,
    pub show_help: bool,
    pub pending_lookups: usize,
    pub screen: Rect,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let panel = MapPanel::new(&config.map, TerminalSurface::default())?;

        Ok(Self {
            running: true,
            panel,
            layer_base: config.layer_base.clone(),
            selected_layer: 0,
            viewport: Viewport::new(config.map.view.center, config.map.view.zoom),
            base_map: BaseMap::Detailed,
            status_message: "Space toggles a layer, click a shape for language data, ? for help"
                .to_string(),
            show_help: false,
            pending_lookups: 0,
            screen: Rect::default(),
        })
    }

    pub fn panes(&self) -> Panes {
        Panes::split(self.screen)
    }

    pub fn layer_count(&self) -> usize {
        self.panel.descriptors().len()
    }

    /// Flips the layer's checkbox.
    pub fn toggle_layer(&mut self, layer: LayerId) -> Option<Action> {
        let checked = match self.panel.status(layer) {
            Ok(LayerStatus::Unloaded) => true,
            Ok(LayerStatus::Loading | LayerStatus::Attached) => false,
            Err(e) => {
                self.status_message = format!("Error: {e}");
                return None;
            }
        };

        match self.panel.toggle(layer, checked) {
            Ok(Some(ticket)) => {
                self.status_message = format!("Loading {}...", self.layer_label(layer));
                Some(Action::Load(ticket))
            }
            Ok(None) => {
                self.status_message = format!("Removed {}", self.layer_label(layer));
                None
            }
            Err(e) => {
                self.status_message = format!("Error: {e}");
                None
            }
        }
    }

    pub fn toggle_selected(&mut self) -> Option<Action> {
        self.toggle_layer(LayerId(self.selected_layer))
    }

    pub fn apply_load(&mut self, ticket: &LoadTicket, result: Result<FeatureCollection, LoadError>) {
        let label = self.layer_label(ticket.layer);
        match self.panel.complete_load(ticket, result) {
            Ok(LoadOutcome::Attached) => self.status_message = format!("Loaded {label}"),
            Ok(LoadOutcome::Discarded) => {}
            Err(e) => self.status_message = format!("Failed to load {label}: {e}"),
        }
    }

    /// A click on the map: closes any popup and, when a lookup-enabled shape
    /// is under the cursor, asks for its language data.
    pub fn click_map(&mut self, at: LatLng) -> Option<Action> {
        self.panel.surface_mut().close_popup();

        let hit = self.panel.clickable_layers().find_map(|(layer, handle)| {
            self.panel
                .surface()
                .overlay(*handle)
                .and_then(|drawn| drawn.overlay.feature_at(at))
                .map(|properties| (layer, properties.clone()))
        });

        let Some((layer, properties)) = hit else {
            self.status_message = format!("No lookup layer at {:.2}, {:.2}", at.lat, at.lng);
            return None;
        };

        match self.panel.lookup_for(layer, &properties) {
            Ok(Some(query)) => {
                self.pending_lookups += 1;
                self.status_message = format!("Looking up {}...", query.scope());
                Some(Action::Lookup { at, query })
            }
            Ok(None) => None,
            Err(e) => {
                self.panel.show_lookup(at, &Err(e));
                None
            }
        }
    }

    pub fn apply_lookup(&mut self, at: LatLng, outcome: &LookupOutcome) {
        self.pending_lookups = self.pending_lookups.saturating_sub(1);
        self.status_message = match outcome {
            Ok(table) => format!("{}: {} languages", table.location, table.rows.len()),
            Err(e) => e.to_string(),
        };
        self.panel.show_lookup(at, outcome);
    }

    /// Centres the view on the selected layer's overlay.
    pub fn fit_selected(&mut self) {
        let layer = LayerId(self.selected_layer);
        let surface = self.panel.surface();
        let bounds = self
            .panel
            .attached()
            .find(|(descriptor, _)| descriptor.id == layer)
            .and_then(|(_, handle)| surface.overlay(*handle))
            .and_then(|drawn| drawn.overlay.bounds());

        let label = self.layer_label(layer);
        match bounds {
            Some(rect) => {
                let center = rect.center();
                self.viewport.center = LatLng::new(center.y, center.x);
                self.status_message = format!("Centred on {label}");
            }
            None => self.status_message = format!("{label} is not on the map"),
        }
    }

    fn layer_label(&self, layer: LayerId) -> String {
        self.panel
            .descriptor(layer)
            .map_or_else(|_| format!("layer {layer}"), |d| d.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, App, Panes};
    use census_map_core::overlay::parse_feature_collection;
    use census_map_core::{LatLng, LayerId, LayerStatus, LoadError, LookupError, MapConfig};
    use census_map_tui::AppConfig;
    use ratatui::layout::Rect;

    const CALIFORNIA: &str = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "STATE": "06", "NAME": "California" },
          "geometry": { "type": "Polygon", "coordinates": [[[-124,32],[-114,32],[-114,42],[-124,42],[-124,32]]] } }
    ] }"#;

    fn app() -> App {
        App::new(&AppConfig {
            map: MapConfig::default(),
            layer_base: "./public".into(),
            log_file: "test.log".into(),
        })
        .unwrap()
    }

    fn attach(app: &mut App, layer: LayerId) {
        let Some(Action::Load(ticket)) = app.toggle_layer(layer) else {
            panic!("expected a load");
        };
        app.apply_load(&ticket, Ok(parse_feature_collection(CALIFORNIA).unwrap()));
    }

    #[test]
    fn toggling_twice_detaches() {
        let mut app = app();
        attach(&mut app, LayerId(1));
        assert_eq!(app.panel.status(LayerId(1)), Ok(LayerStatus::Attached));

        assert_eq!(app.toggle_layer(LayerId(1)), None);
        assert_eq!(app.panel.status(LayerId(1)), Ok(LayerStatus::Unloaded));
        assert_eq!(app.panel.surface().overlays().count(), 0);
    }

    #[test]
    fn failed_load_is_reported_and_unchecked() {
        let mut app = app();
        let Some(Action::Load(ticket)) = app.toggle_layer(LayerId(0)) else {
            panic!("expected a load");
        };
        app.apply_load(&ticket, Err(LoadError::Network("no such file".into())));

        assert!(app.status_message.contains("Failed to load US Country Border"));
        assert!(!app.panel.items()[0].checked);
    }

    #[test]
    fn clicking_a_state_starts_a_state_lookup() {
        let mut app = app();
        attach(&mut app, LayerId(1));

        let action = app.click_map(LatLng::new(37.0, -120.0));
        match action {
            Some(Action::Lookup { query, .. }) => assert_eq!(query.scope(), "state:06"),
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(app.pending_lookups, 1);
    }

    #[test]
    fn clicking_a_non_lookup_layer_does_nothing() {
        let mut app = app();
        attach(&mut app, LayerId(0));

        assert_eq!(app.click_map(LatLng::new(37.0, -120.0)), None);
        assert!(app.panel.surface().popup().is_none());
    }

    #[test]
    fn lookup_results_open_a_popup_and_new_clicks_close_it() {
        let mut app = app();
        attach(&mut app, LayerId(1));
        app.click_map(LatLng::new(37.0, -120.0));
        app.apply_lookup(
            LatLng::new(37.0, -120.0),
            &Err(LookupError::Network("timed out".into())),
        );

        assert_eq!(app.pending_lookups, 0);
        assert!(app.panel.surface().popup().is_some());

        app.click_map(LatLng::new(0.0, 0.0));
        assert!(app.panel.surface().popup().is_none());
    }

    #[test]
    fn fit_centres_on_the_selected_overlay() {
        let mut app = app();
        app.selected_layer = 1;
        app.fit_selected();
        assert!(app.status_message.contains("not on the map"));

        attach(&mut app, LayerId(1));
        app.fit_selected();
        assert!((app.viewport.center.lat - 37.0).abs() < 1e-9);
        assert!((app.viewport.center.lng + 119.0).abs() < 1e-9);
    }

    #[test]
    fn list_rows_map_from_cells() {
        let panes = Panes::split(Rect::new(0, 0, 120, 40));
        assert_eq!(panes.layer_row(3, 1), Some(0));
        assert_eq!(panes.layer_row(3, 4), Some(3));
        assert_eq!(panes.layer_row(0, 1), None);
        assert_eq!(panes.layer_row(50, 1), None);
    }
}
