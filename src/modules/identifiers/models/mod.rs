use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespaces of the identifier registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    InvoiceNumber,
    TrackingCode,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::InvoiceNumber => "invoice_number",
            IdentifierKind::TrackingCode => "tracking_code",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracking code handed to a new invoice request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingAssignment {
    pub tracking_code: String,
    /// Why a supplied code was replaced, if it was
    pub substituted: Option<String>,
}
