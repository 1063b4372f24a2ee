pub mod layer_list;
pub mod map_canvas;
pub mod popup;
