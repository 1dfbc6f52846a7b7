pub mod defaults;
pub mod model;
pub mod seo;
pub mod validate;

pub use defaults::{default_document, default_seo, is_default};
