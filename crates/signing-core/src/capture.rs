//! Per-signer signature capture
//!
//! State machine per signer slot:
//! `empty -> editing -> {drawing | uploading} -> confirming (drawn only) -> signed`.
//! `signed` is terminal for the widget; there is no automatic expiry. A
//! disabled widget freezes every transition.
//!
//! The widget's owner observes signed-ness through [`SignatureCapture::signature`]
//! after each transition; `accept` and `upload` return the produced
//! [`SignatureData`], `edit` returns the value that was cleared.

use chrono::Utc;
use shared_types::{SignatureData, SignatureKind, SignerRole};
use thiserror::Error;

use crate::canvas::{Point, SignatureCanvas};
use crate::upload::{encode_data_url, validate_upload, UploadError};

/// Default raster size of the drawing pad
const PAD_WIDTH: u32 = 400;
const PAD_HEIGHT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Empty,
    Editing,
    Drawing,
    Uploading,
    Confirming,
    Signed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Signature pad is disabled")]
    Disabled,

    #[error("Please draw your signature before confirming")]
    EmptySignature,

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Cannot {action} while {state:?}")]
    InvalidTransition {
        state: CaptureState,
        action: &'static str,
    },
}

pub struct SignatureCapture {
    role: SignerRole,
    state: CaptureState,
    canvas: SignatureCanvas,
    signer_name: String,
    signer_date: String,
    disabled: bool,
    captured: Option<SignatureData>,
}

impl SignatureCapture {
    pub fn new(role: SignerRole) -> Self {
        Self {
            role,
            state: CaptureState::Empty,
            canvas: SignatureCanvas::new(PAD_WIDTH, PAD_HEIGHT),
            signer_name: String::new(),
            signer_date: String::new(),
            disabled: false,
            captured: None,
        }
    }

    pub fn role(&self) -> SignerRole {
        self.role
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Current captured signature, if the slot is signed
    pub fn signature(&self) -> Option<&SignatureData> {
        self.captured.as_ref()
    }

    pub fn canvas(&self) -> &SignatureCanvas {
        &self.canvas
    }

    /// Freeze or unfreeze all transitions
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Bind the signer name/date form inputs
    pub fn set_signer(&mut self, name: &str, date: &str) {
        self.signer_name = name.to_string();
        self.signer_date = date.to_string();
    }

    /// `empty -> editing` (user clicks Add)
    pub fn begin(&mut self) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Empty => {
                self.state = CaptureState::Editing;
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "begin",
            }),
        }
    }

    /// `editing -> drawing`
    pub fn choose_draw(&mut self) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Editing => {
                self.state = CaptureState::Drawing;
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "choose draw",
            }),
        }
    }

    /// `editing -> uploading`
    pub fn choose_upload(&mut self) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Editing => {
                self.state = CaptureState::Uploading;
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "choose upload",
            }),
        }
    }

    /// Start a pen/touch stroke. Only legal while drawing.
    pub fn begin_stroke(&mut self, p: Point) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Drawing => {
                self.canvas.begin_stroke(p);
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "draw",
            }),
        }
    }

    /// Continue the current stroke. Only legal while drawing.
    pub fn extend_stroke(&mut self, p: Point) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Drawing => {
                self.canvas.extend_stroke(p);
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "draw",
            }),
        }
    }

    /// `drawing -> confirming`, guarded by the canvas pixel buffer: an
    /// all-white canvas is rejected and the state stays `drawing`.
    pub fn confirm_drawing(&mut self) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Drawing => {
                if !self.canvas.has_ink() {
                    return Err(CaptureError::EmptySignature);
                }
                self.state = CaptureState::Confirming;
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "confirm",
            }),
        }
    }

    /// `confirming -> signed`: capture the drawn strokes as the signature.
    pub fn accept(&mut self) -> Result<SignatureData, CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Confirming => {
                let data = SignatureData {
                    kind: SignatureKind::Drawn,
                    data_url: self.canvas.to_data_url(),
                    file_name: None,
                    timestamp: Utc::now(),
                    signer_name: self.signer_name.clone(),
                    signer_date: self.signer_date.clone(),
                };
                self.captured = Some(data.clone());
                self.state = CaptureState::Signed;
                Ok(data)
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "accept",
            }),
        }
    }

    /// `confirming -> drawing`: clear the canvas for another attempt.
    pub fn reject(&mut self) -> Result<(), CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Confirming => {
                self.canvas.clear();
                self.state = CaptureState::Drawing;
                Ok(())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "reject",
            }),
        }
    }

    /// `uploading -> signed` for a valid image file. An invalid MIME type or
    /// payload errors out and leaves the state unchanged.
    pub fn upload(
        &mut self,
        file_name: &str,
        mime: &str,
        data: &[u8],
    ) -> Result<SignatureData, CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Uploading => {
                validate_upload(mime, data)?;
                let sig = SignatureData {
                    kind: SignatureKind::Upload,
                    data_url: encode_data_url(mime, data),
                    file_name: Some(file_name.to_string()),
                    timestamp: Utc::now(),
                    signer_name: self.signer_name.clone(),
                    signer_date: self.signer_date.clone(),
                };
                self.captured = Some(sig.clone());
                self.state = CaptureState::Signed;
                Ok(sig)
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "upload",
            }),
        }
    }

    /// `signed -> editing`: discard the captured signature. Returns the
    /// value that was cleared so the owner can emit the unsigned change.
    pub fn edit(&mut self) -> Result<Option<SignatureData>, CaptureError> {
        self.ensure_enabled()?;
        match self.state {
            CaptureState::Signed => {
                self.canvas.clear();
                self.state = CaptureState::Editing;
                Ok(self.captured.take())
            }
            state => Err(CaptureError::InvalidTransition {
                state,
                action: "edit",
            }),
        }
    }

    fn ensure_enabled(&self) -> Result<(), CaptureError> {
        if self.disabled {
            return Err(CaptureError::Disabled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drawn_to_confirming() -> SignatureCapture {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        capture.set_signer("Jane Doe", "2026-08-07");
        capture.begin().unwrap();
        capture.choose_draw().unwrap();
        capture.begin_stroke(Point { x: 20.0, y: 40.0 }).unwrap();
        capture.extend_stroke(Point { x: 180.0, y: 70.0 }).unwrap();
        capture.confirm_drawing().unwrap();
        capture
    }

    #[test]
    fn test_happy_path_drawn() {
        let mut capture = drawn_to_confirming();
        assert_eq!(capture.state(), CaptureState::Confirming);

        let data = capture.accept().unwrap();
        assert_eq!(capture.state(), CaptureState::Signed);
        assert_eq!(data.kind, SignatureKind::Drawn);
        assert_eq!(data.signer_name, "Jane Doe");
        assert!(data.data_url.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(capture.signature(), Some(&data));
    }

    #[test]
    fn test_happy_path_upload() {
        let mut capture = SignatureCapture::new(SignerRole::Broker);
        capture.set_signer("Sam Broker", "2026-08-07");
        capture.begin().unwrap();
        capture.choose_upload().unwrap();

        let data = capture
            .upload("sig.jpg", "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0])
            .unwrap();
        assert_eq!(capture.state(), CaptureState::Signed);
        assert_eq!(data.kind, SignatureKind::Upload);
        assert_eq!(data.file_name.as_deref(), Some("sig.jpg"));
        assert!(data.data_url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_confirm_on_untouched_canvas_is_rejected() {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        capture.begin().unwrap();
        capture.choose_draw().unwrap();

        assert_eq!(capture.confirm_drawing(), Err(CaptureError::EmptySignature));
        // Validation keeps the user on the pad
        assert_eq!(capture.state(), CaptureState::Drawing);
        assert!(capture.signature().is_none());
    }

    #[test]
    fn test_invalid_mime_leaves_state_unchanged() {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        capture.begin().unwrap();
        capture.choose_upload().unwrap();

        let err = capture
            .upload("sig.gif", "image/gif", &[0x47, 0x49, 0x46])
            .unwrap_err();
        assert!(matches!(err, CaptureError::Upload(UploadError::UnsupportedType(_))));
        assert_eq!(capture.state(), CaptureState::Uploading);
        assert!(capture.signature().is_none());
    }

    #[test]
    fn test_reject_clears_canvas_and_returns_to_drawing() {
        let mut capture = drawn_to_confirming();
        capture.reject().unwrap();

        assert_eq!(capture.state(), CaptureState::Drawing);
        assert!(!capture.canvas().has_ink());
        // A confirm right after rejecting hits the empty guard again
        assert_eq!(capture.confirm_drawing(), Err(CaptureError::EmptySignature));
    }

    #[test]
    fn test_edit_clears_captured_signature() {
        let mut capture = drawn_to_confirming();
        let data = capture.accept().unwrap();

        let cleared = capture.edit().unwrap();
        assert_eq!(cleared, Some(data));
        assert_eq!(capture.state(), CaptureState::Editing);
        assert!(capture.signature().is_none());
        assert!(!capture.canvas().has_ink());
    }

    #[test]
    fn test_disabled_freezes_all_transitions() {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        capture.set_disabled(true);

        assert_eq!(capture.begin(), Err(CaptureError::Disabled));
        assert_eq!(capture.choose_draw(), Err(CaptureError::Disabled));
        assert_eq!(
            capture.begin_stroke(Point { x: 1.0, y: 1.0 }),
            Err(CaptureError::Disabled)
        );
        assert_eq!(capture.confirm_drawing(), Err(CaptureError::Disabled));
        assert_eq!(capture.state(), CaptureState::Empty);

        capture.set_disabled(false);
        assert!(capture.begin().is_ok());
    }

    #[test]
    fn test_stroke_input_requires_drawing_state() {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        capture.begin().unwrap();

        let err = capture.begin_stroke(Point { x: 1.0, y: 1.0 }).unwrap_err();
        assert_eq!(
            err,
            CaptureError::InvalidTransition {
                state: CaptureState::Editing,
                action: "draw",
            }
        );
    }

    #[test]
    fn test_upload_requires_uploading_state() {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        let err = capture
            .upload("sig.png", "image/png", &[0x89])
            .unwrap_err();
        assert!(matches!(err, CaptureError::InvalidTransition { .. }));
    }

    #[test]
    fn test_accept_requires_confirming_state() {
        let mut capture = SignatureCapture::new(SignerRole::Seller);
        assert!(matches!(
            capture.accept(),
            Err(CaptureError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_signed_is_terminal_without_edit() {
        let mut capture = drawn_to_confirming();
        capture.accept().unwrap();

        assert!(matches!(
            capture.begin(),
            Err(CaptureError::InvalidTransition { .. })
        ));
        assert!(matches!(
            capture.confirm_drawing(),
            Err(CaptureError::InvalidTransition { .. })
        ));
        assert_eq!(capture.state(), CaptureState::Signed);
    }
}
