pub mod aspect_ratio_probe;
pub mod fast_start;
