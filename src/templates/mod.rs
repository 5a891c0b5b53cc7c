mod renderer;

pub use renderer::{PromptTemplates, TemplateRenderer};
