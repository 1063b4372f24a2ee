use census_map_core::{LayerId, LayerItem, LoadOutcome};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement};

use crate::fetch;
use crate::surface::SharedPanel;

/// `<tr><td class="layerItem"><label style="color: ..." for="chkN"><input
/// type="checkbox" id="chkN">Label</label></td></tr>`
fn create_row(document: &Document, item: &LayerItem<'_>) -> Result<(Element, HtmlInputElement), JsValue> {
    let id = item.checkbox_id();

    let row = document.create_element("tr")?;
    let cell = document.create_element("td")?;
    cell.set_class_name("layerItem");

    let label = document.create_element("label")?;
    label.set_attribute("style", &format!("color: {}", item.color))?;
    label.set_attribute("for", &id)?;

    let input: HtmlInputElement = document
        .create_element("input")?
        .dyn_into()
        .map_err(JsValue::from)?;
    input.set_type("checkbox");
    input.set_id(&id);
    input.set_checked(item.checked);

    label.append_child(&input)?;
    label.append_with_str_1(item.label)?;
    cell.append_child(&label)?;
    row.append_child(&cell)?;

    Ok((row, input))
}

/// Fills `container_id` (a table body) with one row per layer and wires each
/// checkbox to the panel.
pub fn render_layer_list(container_id: &str, panel: &SharedPanel) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("#{container_id} not found")))?;

    let items: Vec<(LayerId, Element, HtmlInputElement)> = panel
        .borrow()
        .items()
        .iter()
        .map(|item| create_row(&document, item).map(|(row, input)| (item.id, row, input)))
        .collect::<Result<_, _>>()?;

    for (layer, row, input) in items {
        container.append_child(&row)?;

        let on_change = {
            let panel = panel.clone();
            let checkbox = input.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                toggle(&panel, layer, &checkbox);
            })
        };
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        // Rows live as long as the page.
        on_change.forget();
    }

    Ok(())
}

fn toggle(panel: &SharedPanel, layer: LayerId, checkbox: &HtmlInputElement) {
    let toggled = panel.borrow_mut().toggle(layer, checkbox.checked());
    let ticket = match toggled {
        Ok(Some(ticket)) => ticket,
        Ok(None) => return,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };

    let panel = panel.clone();
    let checkbox = checkbox.clone();
    spawn_local(async move {
        log::info!("loading layer {} from {}", ticket.layer, ticket.source_url);
        let result = fetch::fetch_layer(&ticket.source_url).await;
        let completed = panel.borrow_mut().complete_load(&ticket, result);
        match completed {
            Ok(LoadOutcome::Attached | LoadOutcome::Discarded) => {}
            Err(e) => {
                log::error!("failed to load layer {}: {e}", ticket.layer);
                checkbox.set_checked(false);
            }
        }
    });
}
