//! Layer list state: which overlays are loading or attached, and the
//! tickets that tie an outstanding fetch to the toggle that started it.

mod item;
mod surface;

pub use item::LayerItem;
pub use surface::MapSurface;

use geojson::FeatureCollection;

use crate::census::{LookupOutcome, LookupQuery};
use crate::config::MapConfig;
use crate::domain::{FeatureProperties, LatLng, LayerDescriptor, LayerId};
use crate::error::{ConfigError, LoadError, LookupError, PanelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStatus {
    Unloaded,
    Loading,
    Attached,
}

/// Issued when a layer is switched on. The caller fetches `source_url` and
/// returns the result through [`MapPanel::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub layer: LayerId,
    pub source_url: String,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Attached,
    /// The layer was switched off or reloaded while this fetch was in flight.
    Discarded,
}

enum Slot<O> {
    Unloaded,
    Loading { generation: u64 },
    Attached { overlay: O },
}

impl<O> Slot<O> {
    const fn status(&self) -> LayerStatus {
        match self {
            Self::Unloaded => LayerStatus::Unloaded,
            Self::Loading { .. } => LayerStatus::Loading,
            Self::Attached { .. } => LayerStatus::Attached,
        }
    }
}

pub struct MapPanel<S: MapSurface> {
    descriptors: Vec<LayerDescriptor>,
    slots: Vec<Slot<S::Overlay>>,
    surface: S,
    next_generation: u64,
}

impl<S: MapSurface> MapPanel<S> {
    pub fn new(config: &MapConfig, surface: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let descriptors = config.descriptors()?;
        let slots = descriptors.iter().map(|_| Slot::Unloaded).collect();

        Ok(Self {
            descriptors,
            slots,
            surface,
            next_generation: 0,
        })
    }

    pub fn descriptors(&self) -> &[LayerDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, layer: LayerId) -> Result<&LayerDescriptor, PanelError> {
        self.descriptors
            .get(layer.index())
            .ok_or(PanelError::UnknownLayer(layer))
    }

    pub fn status(&self, layer: LayerId) -> Result<LayerStatus, PanelError> {
        self.slots
            .get(layer.index())
            .map(Slot::status)
            .ok_or(PanelError::UnknownLayer(layer))
    }

    pub fn items(&self) -> Vec<LayerItem<'_>> {
        self.descriptors
            .iter()
            .zip(&self.slots)
            .map(|(descriptor, slot)| LayerItem::new(descriptor, slot.status() != LayerStatus::Unloaded))
            .collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Checkbox handler. Switching on returns the fetch to perform; switching
    /// off detaches the overlay (or orphans the in-flight fetch) and never
    /// needs the network.
    pub fn toggle(&mut self, layer: LayerId, checked: bool) -> Result<Option<LoadTicket>, PanelError> {
        let descriptor = self
            .descriptors
            .get(layer.index())
            .ok_or(PanelError::UnknownLayer(layer))?;
        let slot = self
            .slots
            .get_mut(layer.index())
            .ok_or(PanelError::UnknownLayer(layer))?;

        if let Slot::Attached { overlay } = std::mem::replace(slot, Slot::Unloaded) {
            log::debug!("detaching overlay for layer {layer} ({})", descriptor.label);
            self.surface.remove_overlay(overlay);
        }

        if !checked {
            return Ok(None);
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        *slot = Slot::Loading { generation };
        log::debug!("loading layer {layer} from {}", descriptor.source_url);

        Ok(Some(LoadTicket {
            layer,
            source_url: descriptor.source_url.clone(),
            generation,
        }))
    }

    /// Applies the result of a ticket's fetch. A failed fetch puts the layer
    /// back to unloaded and returns the error for the caller to surface.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<FeatureCollection, LoadError>,
    ) -> Result<LoadOutcome, LoadError> {
        let Some(slot) = self.slots.get_mut(ticket.layer.index()) else {
            return Ok(LoadOutcome::Discarded);
        };

        match slot {
            Slot::Loading { generation } if *generation == ticket.generation => {}
            _ => {
                log::debug!("discarding stale load for layer {}", ticket.layer);
                return Ok(LoadOutcome::Discarded);
            }
        }

        match result {
            Ok(data) => {
                let descriptor = &self.descriptors[ticket.layer.index()];
                let overlay = self.surface.add_overlay(descriptor, data);
                *slot = Slot::Attached { overlay };
                log::info!("layer '{}' attached", descriptor.label);
                Ok(LoadOutcome::Attached)
            }
            Err(error) => {
                *slot = Slot::Unloaded;
                log::warn!("layer {} failed to load: {error}", ticket.layer);
                Err(error)
            }
        }
    }

    /// Query for a click on `layer`, or `None` when the layer is not an
    /// attached, lookup-enabled overlay.
    pub fn lookup_for(
        &self,
        layer: LayerId,
        properties: &FeatureProperties,
    ) -> Result<Option<LookupQuery>, LookupError> {
        let attached = matches!(self.slots.get(layer.index()), Some(Slot::Attached { .. }));
        let enabled = self
            .descriptors
            .get(layer.index())
            .is_some_and(|descriptor| descriptor.lookup_enabled);

        if !(attached && enabled) {
            return Ok(None);
        }
        LookupQuery::from_properties(properties).map(Some)
    }

    pub fn show_lookup(&mut self, at: LatLng, outcome: &LookupOutcome) {
        self.surface.open_popup(at, outcome);
    }

    /// Lookup-enabled layers that currently have an overlay, topmost first.
    pub fn clickable_layers(&self) -> impl Iterator<Item = (LayerId, &S::Overlay)> + '_ {
        self.descriptors
            .iter()
            .zip(&self.slots)
            .rev()
            .filter_map(|(descriptor, slot)| match slot {
                Slot::Attached { overlay } if descriptor.lookup_enabled => Some((descriptor.id, overlay)),
                _ => None,
            })
    }

    /// Every attached overlay, bottom first, for drawing.
    pub fn attached(&self) -> impl Iterator<Item = (&LayerDescriptor, &S::Overlay)> + '_ {
        self.descriptors
            .iter()
            .zip(&self.slots)
            .filter_map(|(descriptor, slot)| match slot {
                Slot::Attached { overlay } => Some((descriptor, overlay)),
                _ => None,
            })
    }
}
