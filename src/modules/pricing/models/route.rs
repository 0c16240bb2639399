// Service routes
//
// Route codes arrive free-form ("ph to uae", "UAE-TO-PINAS-EXPRESS", ...).
// They are normalized once into an uppercase underscore token and tagged with
// the lane whose tax and delivery rules apply. Downstream code matches on the
// lane and never re-inspects the raw string.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Result};

const OUTBOUND_PREFIXES: &[&str] = &["PH_TO_UAE"];
const INBOUND_PREFIXES: &[&str] = &["UAE_TO_PH", "UAE_TO_PINAS"];

/// Directional service lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Philippines to UAE
    Outbound,
    /// UAE to Philippines
    Inbound,
    /// Anything else
    Other,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::Outbound => write!(f, "outbound"),
            Lane::Inbound => write!(f, "inbound"),
            Lane::Other => write!(f, "other"),
        }
    }
}

/// A normalized service route code together with its lane
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceRoute {
    code: String,
    lane: Lane,
}

impl ServiceRoute {
    /// Normalize a raw route string and classify its lane
    pub fn parse(raw: &str) -> Result<Self> {
        let code = normalize_route_code(raw);
        if code.is_empty() {
            return Err(AppError::validation(
                "service_route",
                "service route is required",
            ));
        }

        let lane = if OUTBOUND_PREFIXES.iter().any(|p| code.starts_with(p)) {
            Lane::Outbound
        } else if INBOUND_PREFIXES.iter().any(|p| code.starts_with(p)) {
            Lane::Inbound
        } else {
            Lane::Other
        };

        Ok(Self { code, lane })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn is_outbound(&self) -> bool {
        self.lane == Lane::Outbound
    }

    pub fn is_inbound(&self) -> bool {
        self.lane == Lane::Inbound
    }
}

impl TryFrom<String> for ServiceRoute {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        ServiceRoute::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<ServiceRoute> for String {
    fn from(route: ServiceRoute) -> Self {
        route.code
    }
}

impl fmt::Display for ServiceRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Trim, uppercase, and join tokens with underscores
fn normalize_route_code(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
