//! Ingestion boundary for generator output
//!
//! The retention model accepts anything. This is where producer output gets
//! checked before it reaches the model: reversed or empty intervals are
//! rejected, softer problems are reported as warnings.

use std::fmt;

use tracing::warn;

use crate::config::RetentionConfig;
use crate::error::{ReelsimError, Result};
use crate::timeline::ScriptVariant;
use crate::trigger::Trigger;

/// Non-fatal finding about a script variant
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Event extends past the variant's duration; the tail is never scored
    EventPastDuration {
        index: usize,
        sec_end: u32,
        duration: u32,
    },
    /// Trigger outside the vocabulary; it carries no weight
    UnknownTrigger { index: usize, trigger: Trigger },
    /// Duration is longer than the baseline table; later seconds are extrapolated
    DurationPastBaseline { duration: u32, baseline_len: usize },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventPastDuration {
                index,
                sec_end,
                duration,
            } => write!(
                f,
                "event {index} ends at {sec_end}s, past the {duration}s duration"
            ),
            Self::UnknownTrigger { index, trigger } => {
                write!(f, "event {index} has unrecognized trigger '{trigger}'")
            }
            Self::DurationPastBaseline {
                duration,
                baseline_len,
            } => write!(
                f,
                "duration {duration}s exceeds the {baseline_len}s baseline curve"
            ),
        }
    }
}

/// Warnings collected while validating one variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub variant_id: String,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Check a variant before analysis
///
/// Fails on the first event with `sec_end <= sec_start`. Everything else is
/// logged and returned in the report.
pub fn validate_variant(
    variant: &ScriptVariant,
    config: &RetentionConfig,
) -> Result<ValidationReport> {
    let mut report = ValidationReport {
        variant_id: variant.variant_id.clone(),
        warnings: Vec::new(),
    };

    for (index, event) in variant.timeline.iter().enumerate() {
        if event.sec_end <= event.sec_start {
            return Err(ReelsimError::InvalidInterval {
                index,
                sec_start: event.sec_start,
                sec_end: event.sec_end,
            });
        }
        if event.sec_end > variant.duration_s {
            report.warnings.push(ValidationWarning::EventPastDuration {
                index,
                sec_end: event.sec_end,
                duration: variant.duration_s,
            });
        }
        let unknown = event
            .triggers
            .iter()
            .chain(event.suggestions())
            .filter(|t| !t.is_known());
        for trigger in unknown {
            report.warnings.push(ValidationWarning::UnknownTrigger {
                index,
                trigger: trigger.clone(),
            });
        }
    }

    if variant.duration_s as usize > config.baseline.len() {
        report.warnings.push(ValidationWarning::DurationPastBaseline {
            duration: variant.duration_s,
            baseline_len: config.baseline.len(),
        });
    }

    for warning in &report.warnings {
        warn!(variant = %report.variant_id, "{}", warning);
    }

    Ok(report)
}

/// Parse generator JSON holding either one variant or an array of them
///
/// Variants without an id are numbered `v1`, `v2`, ... by position. The
/// shape is picked from the leading token so parse errors keep serde's field
/// and position details.
pub fn parse_variants(json: &str) -> Result<Vec<ScriptVariant>> {
    let mut variants: Vec<ScriptVariant> = if json.trim_start().starts_with('[') {
        serde_json::from_str(json)?
    } else {
        vec![serde_json::from_str(json)?]
    };
    for (i, variant) in variants.iter_mut().enumerate() {
        if variant.variant_id.is_empty() {
            variant.variant_id = format!("v{}", i + 1);
        }
    }
    Ok(variants)
}

/// Find a variant by id, or the first one when `id` is `None`
pub fn select_variant<'a>(
    variants: &'a [ScriptVariant],
    id: Option<&str>,
) -> Result<&'a ScriptVariant> {
    match id {
        Some(id) => variants
            .iter()
            .find(|v| v.variant_id == id)
            .ok_or_else(|| ReelsimError::VariantNotFound(id.to_string())),
        None => variants
            .first()
            .ok_or_else(|| ReelsimError::VariantNotFound("<none>".to_string())),
    }
}
