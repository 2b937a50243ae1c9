//! Main-content extraction from loaded pages.

pub mod content;
pub mod js_scripts;
pub mod normalize;

pub use content::{
    CONTENT_SELECTORS, ContentLimits, Extraction, ExtractionStrategy, extract_content,
};
pub use normalize::{clean_evaluated_text, normalize_content};
