use geojson::FeatureCollection;

use crate::census::LookupOutcome;
use crate::domain::{LatLng, LayerDescriptor};

/// The rendering backend a [`MapPanel`](super::MapPanel) drives.
///
/// Implementations own whatever the map library needs to draw an overlay and
/// hand back an opaque handle; the panel keeps at most one handle per layer
/// and gives it back through `remove_overlay` when the layer is switched off.
pub trait MapSurface {
    type Overlay;

    /// Draws `data` styled with the descriptor's colour. Lookup-enabled
    /// descriptors should have their features made clickable.
    fn add_overlay(&mut self, descriptor: &LayerDescriptor, data: FeatureCollection) -> Self::Overlay;

    fn remove_overlay(&mut self, overlay: Self::Overlay);

    fn open_popup(&mut self, at: LatLng, outcome: &LookupOutcome);
}
