pub mod service;

pub use service::{EmotionApiConfig, ServiceConfig};
