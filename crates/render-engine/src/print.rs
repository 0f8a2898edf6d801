//! Print/export rendering
//!
//! Wraps final HTML in a standalone document with an embedded print
//! stylesheet and dispatches it to a browsing context. When the popup is
//! blocked the current page is printed directly instead, a degraded path
//! that loses the print stylesheet.

use thiserror::Error;

/// The embedded print stylesheet. The two-column signature layout is forced
/// at container-class, element-class, and structural-child specificity
/// because the source document's own styling is unpredictable and has to be
/// overridden with `!important`.
const PRINT_STYLESHEET: &str = r#"
    @page {
        margin: 2cm 2.5cm;
    }
    body {
        font-family: Georgia, 'Times New Roman', serif;
        font-size: 12pt;
        line-height: 1.5;
        color: #000;
        margin: 0;
    }
    .signatures-section {
        display: block !important;
        width: 100% !important;
        page-break-inside: avoid;
    }
    .signatures-section .signature-column {
        display: inline-block !important;
        width: 45% !important;
        margin-right: 5% !important;
        vertical-align: top !important;
    }
    .signature-column {
        display: inline-block !important;
        width: 45% !important;
        vertical-align: top !important;
    }
    .signatures-section > div {
        display: inline-block !important;
        width: 45% !important;
        vertical-align: top !important;
    }
    .signature-block {
        border: 1px solid #333;
        padding: 8px;
        margin-top: 12px;
    }
    .signature-block img {
        max-width: 100%;
        max-height: 80px;
    }
    .signature-name,
    .signature-date {
        margin: 2px 0;
        font-size: 10pt;
    }
"#;

/// Outcome of a print dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The styled document was written to a new browsing context and printed
    Styled,
    /// Popup blocked: the current page was printed directly, without the
    /// print stylesheet
    FallbackDirect,
}

/// Raised by a target when the environment refuses to open a new context
#[derive(Debug, Error, PartialEq, Eq)]
#[error("print popup was blocked")]
pub struct PopupBlocked;

/// Seam between the renderer and the host environment
pub trait PrintTarget {
    /// Open a new browsing context, load `html`, and trigger the native
    /// print dialog
    fn open_document(&mut self, html: &str) -> Result<(), PopupBlocked>;

    /// Print whatever the current page shows
    fn print_current(&mut self);
}

/// Build the standalone print document for the given body HTML.
///
/// The emitted script triggers the native print dialog on load and closes
/// the context once the dialog returns.
pub fn build_print_document(title: &str, body_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{title}</title>\n\
         <style>{stylesheet}</style>\n</head>\n<body>\n{body}\n\
         <script>window.onload = function() {{ window.print(); window.close(); }};</script>\n\
         </body>\n</html>",
        title = title,
        stylesheet = PRINT_STYLESHEET,
        body = body_html,
    )
}

/// Dispatch a print job to the target.
///
/// The happy path writes the standalone styled document into a fresh
/// context. If the popup is blocked the job degrades to printing the
/// current page as-is; the fallback is reported explicitly so callers can
/// tell the two behaviors apart.
pub fn dispatch_print(target: &mut impl PrintTarget, title: &str, body_html: &str) -> PrintOutcome {
    let document = build_print_document(title, body_html);
    match target.open_document(&document) {
        Ok(()) => PrintOutcome::Styled,
        Err(PopupBlocked) => {
            tracing::warn!("print popup blocked; printing current page without print stylesheet");
            target.print_current();
            PrintOutcome::FallbackDirect
        }
    }
}
