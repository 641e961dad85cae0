pub mod app;
pub mod heatmap_view;
