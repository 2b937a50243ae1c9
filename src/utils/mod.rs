pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{char_len, safe_truncate_chars};
pub use url_utils::{fill_keyword_template, is_valid_url, resolve_href};
