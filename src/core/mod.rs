pub mod discovery;
pub mod engine;
pub mod merger;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod source;
pub mod template;

pub use crate::domain::model::{Entry, MergeResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Renderer, Storage};
pub use crate::utils::error::Result;
