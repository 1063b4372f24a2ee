use std::collections::BTreeMap;

use census_map_core::geojson::FeatureCollection;
use census_map_core::overlay::Overlay;
use census_map_core::{LatLng, LayerDescriptor, LayerId, LookupOutcome, MapSurface};

#[derive(Debug, Clone)]
pub struct DrawnOverlay {
    pub layer: LayerId,
    pub rgb: (u8, u8, u8),
    pub overlay: Overlay,
}

#[derive(Debug, Clone)]
pub struct LookupPopup {
    pub at: LatLng,
    pub outcome: LookupOutcome,
}

/// Overlays and the open popup as the terminal UI draws them.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    overlays: BTreeMap<u64, DrawnOverlay>,
    next_handle: u64,
    popup: Option<LookupPopup>,
}

impl TerminalSurface {
    pub fn overlay(&self, handle: u64) -> Option<&DrawnOverlay> {
        self.overlays.get(&handle)
    }

    /// In attach order, so later layers draw on top.
    pub fn overlays(&self) -> impl Iterator<Item = &DrawnOverlay> {
        self.overlays.values()
    }

    pub const fn popup(&self) -> Option<&LookupPopup> {
        self.popup.as_ref()
    }

    pub fn close_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }
}

impl MapSurface for TerminalSurface {
    type Overlay = u64;

    fn add_overlay(&mut self, descriptor: &LayerDescriptor, data: FeatureCollection) -> u64 {
        self.next_handle += 1;
        let overlay = Overlay::from_collection(&data);
        if overlay.is_empty() {
            log::warn!("'{}' has no polygon or line features to draw", descriptor.label);
        }
        log::debug!(
            "drawing {} shapes for '{}'",
            overlay.features().len(),
            descriptor.label
        );
        self.overlays.insert(
            self.next_handle,
            DrawnOverlay {
                layer: descriptor.id,
                rgb: descriptor.color.rgb(),
                overlay,
            },
        );
        self.next_handle
    }

    fn remove_overlay(&mut self, overlay: u64) {
        self.overlays.remove(&overlay);
    }

    fn open_popup(&mut self, at: LatLng, outcome: &LookupOutcome) {
        self.popup = Some(LookupPopup {
            at,
            outcome: outcome.clone(),
        });
    }
}
