pub mod types;

pub use types::{
    ActivityEntry, Document, DocumentStatus, DocumentTemplate, FieldType, SignatureData,
    SignatureKind, SignaturePosition, SignatureSet, SignedDocument, SignerRole, TemplateField,
};
