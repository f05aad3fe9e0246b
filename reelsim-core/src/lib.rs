//! reelsim-core - Retention simulation for short-form video scripts
//!
//! Given a timeline of script events tagged with attention triggers, this
//! crate estimates a per-second retention curve, the probability a viewer
//! finishes the video, a replay score, and how much each trigger type
//! contributes to the finish rate.
//!
//! # Architecture
//!
//! - **Configuration** ([`RetentionConfig`]) holds the baseline curve and the
//!   trigger weight table as immutable values
//! - **Model** ([`RetentionModel`]) scores a timeline second by second
//! - **Impact** ([`TriggerImpactAnalyzer`]) re-scores counterfactual
//!   timelines with one trigger removed at a time
//! - **Ingestion** ([`ingest`]) validates generator output before it is scored
//!
//! The model and the analyzer never fail; only ingestion and configuration
//! loading return [`ReelsimError`].

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod impact;
pub mod ingest;
pub mod retention;
pub mod source;
pub mod timeline;
pub mod trigger;

pub use analysis::{ScriptAnalysis, ScriptAnalyzer};
pub use config::{ExtrapolationPolicy, RetentionConfig};
pub use error::{ReelsimError, Result};
pub use export::{VariantMarkdown, export_file_name, render_markdown};
pub use impact::{TriggerImpact, TriggerImpactAnalyzer, analyze_trigger_impact, trigger_inventory};
pub use ingest::{
    ValidationReport, ValidationWarning, parse_variants, select_variant, validate_variant,
};
pub use retention::{RetentionEstimator, RetentionModel, RetentionResult, analyze_retention};
pub use source::{JsonFileSource, SampleScripts, ScriptSource};
pub use timeline::{
    LoopabilityAnalysis, ScriptVariant, Source, TimelineEvent, TransitionPointAnalysis,
};
pub use trigger::Trigger;
