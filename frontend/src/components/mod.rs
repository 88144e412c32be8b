pub mod earthquake_map;
pub mod layer_switcher;
