//! Document signing core logic
//!
//! This crate provides the signature half of the document pipeline:
//! - Per-signer capture state machine (draw or upload)
//! - Stroke canvas with the empty-signature guard and SVG export
//! - Upload validation (MIME allowlist plus magic-byte checks)
//! - Signature compositor: splicing captured blocks into rendered HTML in
//!   embedded or end-of-document mode, with the structural-section override
//!   on finalize

pub mod canvas;
pub mod capture;
pub mod compositor;
pub mod upload;

pub use canvas::SignatureCanvas;
pub use capture::{CaptureError, CaptureState, SignatureCapture};
pub use compositor::{can_finalize, compose, finalize, ComposeError};
pub use upload::{encode_data_url, validate_upload, UploadError, ALLOWED_UPLOAD_TYPES};
