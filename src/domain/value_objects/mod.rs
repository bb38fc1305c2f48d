pub mod aspect_ratios;
pub mod asset_keys;
pub mod media_types;
