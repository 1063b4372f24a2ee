use crate::domain::{HexColor, LayerDescriptor, LayerId};

/// One row of the layer list: a coloured label with a checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerItem<'a> {
    pub id: LayerId,
    pub label: &'a str,
    pub color: &'a HexColor,
    pub checked: bool,
}

impl<'a> LayerItem<'a> {
    pub fn new(descriptor: &'a LayerDescriptor, checked: bool) -> Self {
        Self {
            id: descriptor.id,
            label: &descriptor.label,
            color: &descriptor.color,
            checked,
        }
    }

    /// DOM id of the checkbox; the label's `for` attribute points at it.
    pub fn checkbox_id(&self) -> String {
        format!("chk{}", self.id)
    }
}
