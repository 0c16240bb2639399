use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipment classification.
///
/// The four listed values drive pricing; `Custom` carries a value accepted
/// verbatim on routes that impose no classification rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Classification {
    General,
    Commercial,
    Flomic,
    Personal,
    Custom(String),
}

impl Classification {
    /// Parse a raw value; blank input yields `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_uppercase();
        let parsed = match value.as_str() {
            "" => return None,
            "GENERAL" => Classification::General,
            "COMMERCIAL" => Classification::Commercial,
            "FLOMIC" => Classification::Flomic,
            "PERSONAL" => Classification::Personal,
            _ => Classification::Custom(value),
        };
        Some(parsed)
    }

    /// Personal / non-commercial cargo, taxed value-inclusive on inbound
    pub fn is_flomic_or_personal(&self) -> bool {
        matches!(self, Classification::Flomic | Classification::Personal)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Classification::General => "GENERAL",
            Classification::Commercial => "COMMERCIAL",
            Classification::Flomic => "FLOMIC",
            Classification::Personal => "PERSONAL",
            Classification::Custom(value) => value,
        }
    }
}

impl TryFrom<String> for Classification {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Classification::parse(&value).ok_or_else(|| "classification cannot be blank".to_string())
    }
}

impl From<Classification> for String {
    fn from(value: Classification) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
