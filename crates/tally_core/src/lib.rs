pub mod clock;
pub mod demo;
pub mod document;
pub mod error;
pub mod heatmap;
pub mod hover;
pub mod progress;
pub mod registry;
pub mod service;
pub mod store;
pub mod years;

pub use crate::error::{Result, TallyError};
pub use crate::service::{TallyService, TallyServiceBuilder};
