use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{PricingConfig, TrackingCodePolicy};
use crate::core::{AppError, Result};
use crate::modules::identifiers::models::{IdentifierKind, TrackingAssignment};
use crate::modules::identifiers::repositories::IdentifierRegistry;
use crate::modules::pricing::models::ServiceRoute;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_ATTEMPTS: usize = 5;
const AWB_SUFFIX_LEN: usize = 12;
const TRACKING_CODE_LEN: usize = 12;
const TRACKING_CODE_MAX_LEN: usize = 32;

/// Source of random uppercase alphanumeric candidates
pub trait CandidateSource: Send + Sync {
    fn candidate(&self, len: usize) -> String;
}

/// Candidates drawn from v4 UUID randomness
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCandidates;

impl CandidateSource for RandomCandidates {
    fn candidate(&self, len: usize) -> String {
        let mut out = String::with_capacity(len);
        while out.len() < len {
            for byte in Uuid::new_v4().into_bytes() {
                if out.len() == len {
                    break;
                }
                out.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
            }
        }
        out
    }
}

/// Issues invoice numbers and tracking codes, unique for the system's lifetime
pub struct IdentifierGenerator {
    registry: Arc<dyn IdentifierRegistry>,
    candidates: Arc<dyn CandidateSource>,
    awb_prefix: String,
    policy: TrackingCodePolicy,
}

impl IdentifierGenerator {
    pub fn new(registry: Arc<dyn IdentifierRegistry>, config: &PricingConfig) -> Self {
        Self::with_candidates(registry, Arc::new(RandomCandidates), config)
    }

    pub fn with_candidates(
        registry: Arc<dyn IdentifierRegistry>,
        candidates: Arc<dyn CandidateSource>,
        config: &PricingConfig,
    ) -> Self {
        Self {
            registry,
            candidates,
            awb_prefix: config.outbound_awb_prefix.to_ascii_uppercase(),
            policy: config.tracking_code_policy,
        }
    }

    /// Reserve a fresh 8-10 character invoice number.
    ///
    /// Falls back to a timestamp-suffixed candidate after the retry budget;
    /// a conflict is returned if even that is taken.
    pub async fn next_invoice_number(&self) -> Result<String> {
        for attempt in 1..=MAX_ATTEMPTS {
            let len = 8 + attempt % 3;
            let candidate = self.candidates.candidate(len);
            if self
                .registry
                .reserve(IdentifierKind::InvoiceNumber, &candidate)
                .await?
            {
                return Ok(candidate);
            }
            warn!(attempt, candidate = %candidate, "Invoice number collision");
        }

        let fallback = format!("{}{}", self.candidates.candidate(4), timestamp_suffix(6));
        if self
            .registry
            .reserve(IdentifierKind::InvoiceNumber, &fallback)
            .await?
        {
            info!(invoice_number = %fallback, "Issued fallback invoice number");
            return Ok(fallback);
        }

        Err(AppError::conflict(
            "unable to allocate a unique invoice number",
        ))
    }

    /// Validate or generate the tracking code for a new request.
    ///
    /// Outbound codes are AWBs of the form `<prefix><12 alphanumerics>`.
    pub async fn assign_tracking_code(
        &self,
        route: &ServiceRoute,
        supplied: Option<&str>,
    ) -> Result<TrackingAssignment> {
        let supplied = supplied
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty());

        let Some(code) = supplied else {
            return Ok(TrackingAssignment {
                tracking_code: self.generate_tracking_code(route).await?,
                substituted: None,
            });
        };

        if let Err(reason) = self.check_format(route, &code) {
            return self.substitute(route, &code, reason).await;
        }

        if self
            .registry
            .reserve(IdentifierKind::TrackingCode, &code)
            .await?
        {
            return Ok(TrackingAssignment {
                tracking_code: code,
                substituted: None,
            });
        }

        self.substitute(route, &code, format!("tracking code {} is already in use", code))
            .await
    }

    pub fn is_valid_awb(&self, code: &str) -> bool {
        code.strip_prefix(self.awb_prefix.as_str())
            .map_or(false, |rest| {
                rest.len() == AWB_SUFFIX_LEN && rest.bytes().all(is_code_char)
            })
    }

    fn check_format(&self, route: &ServiceRoute, code: &str) -> std::result::Result<(), String> {
        if route.is_outbound() {
            if self.is_valid_awb(code) {
                return Ok(());
            }
            return Err(format!(
                "AWB {} must be {} followed by {} letters or digits",
                code, self.awb_prefix, AWB_SUFFIX_LEN
            ));
        }

        if code.len() > TRACKING_CODE_MAX_LEN
            || !code.bytes().all(|b| is_code_char(b) || b == b'-')
        {
            return Err(format!(
                "tracking code {} must be at most {} letters, digits or dashes",
                code, TRACKING_CODE_MAX_LEN
            ));
        }
        Ok(())
    }

    async fn substitute(
        &self,
        route: &ServiceRoute,
        supplied: &str,
        reason: String,
    ) -> Result<TrackingAssignment> {
        match self.policy {
            TrackingCodePolicy::Reject => Err(AppError::validation("tracking_code", reason)),
            TrackingCodePolicy::Substitute => {
                let generated = self.generate_tracking_code(route).await?;
                warn!(
                    route = %route,
                    supplied = %supplied,
                    generated = %generated,
                    reason = %reason,
                    "Supplied tracking code replaced"
                );
                Ok(TrackingAssignment {
                    tracking_code: generated,
                    substituted: Some(reason),
                })
            }
        }
    }

    async fn generate_tracking_code(&self, route: &ServiceRoute) -> Result<String> {
        let prefix = if route.is_outbound() {
            self.awb_prefix.as_str()
        } else {
            ""
        };
        let len = if route.is_outbound() {
            AWB_SUFFIX_LEN
        } else {
            TRACKING_CODE_LEN
        };

        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = format!("{}{}", prefix, self.candidates.candidate(len));
            if self
                .registry
                .reserve(IdentifierKind::TrackingCode, &candidate)
                .await?
            {
                return Ok(candidate);
            }
            warn!(attempt, candidate = %candidate, "Tracking code collision");
        }

        let fallback = format!(
            "{}{}{}",
            prefix,
            self.candidates.candidate(len - 6),
            timestamp_suffix(6)
        );
        if self
            .registry
            .reserve(IdentifierKind::TrackingCode, &fallback)
            .await?
        {
            info!(tracking_code = %fallback, "Issued fallback tracking code");
            return Ok(fallback);
        }

        Err(AppError::conflict("unable to allocate a unique tracking code"))
    }
}

fn is_code_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

/// Last `len` base-36 digits of the current millisecond timestamp
fn timestamp_suffix(len: usize) -> String {
    let mut millis = Utc::now().timestamp_millis().unsigned_abs();
    let mut digits = Vec::with_capacity(len);
    for _ in 0..len {
        digits.push(ALPHABET[(millis % 36) as usize]);
        millis /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
