//! Document rendering engine
//!
//! This crate turns stored HTML templates with `{{placeholder}}` tokens into
//! rendered documents:
//! - Placeholder substitution (editable preview and final render modes)
//! - Field collection: defaults, required-field and option validation
//! - Print/export document assembly with an embedded print stylesheet

pub mod fields;
pub mod placeholder;
pub mod print;

pub use fields::{collect_values, with_context, FieldError};
pub use placeholder::{render, RenderMode};
pub use print::{build_print_document, dispatch_print, PopupBlocked, PrintOutcome, PrintTarget};
