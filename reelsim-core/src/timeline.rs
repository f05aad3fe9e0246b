//! Script timeline types
//!
//! These mirror the JSON produced by the script generator. The retention
//! model only reads intervals and applied triggers; everything else is
//! carried through for export.

use serde::{Deserialize, Serialize};

use crate::error::{ReelsimError, Result};
use crate::trigger::Trigger;

/// A span of the script with the triggers applied to it
///
/// The interval is half-open: `[sec_start, sec_end)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub sec_start: u32,
    pub sec_end: u32,
    #[serde(default)]
    pub visual: String,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    /// Advisory triggers the generator proposes but has not applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_triggers: Option<Vec<Trigger>>,
    /// Generator's own retention-risk flag
    #[serde(rename = "isWeak", default, skip_serializing_if = "Option::is_none")]
    pub is_weak: Option<bool>,
}

impl TimelineEvent {
    /// Event over `[sec_start, sec_end)` carrying `triggers`
    pub fn new(sec_start: u32, sec_end: u32, triggers: Vec<Trigger>) -> Self {
        Self {
            sec_start,
            sec_end,
            triggers,
            ..Self::default()
        }
    }

    /// Whether second `t` falls inside the event
    pub fn is_active_at(&self, t: u32) -> bool {
        self.sec_start <= t && t < self.sec_end
    }

    pub fn has_trigger(&self, trigger: &Trigger) -> bool {
        self.triggers.contains(trigger)
    }

    /// Copy of this event with every occurrence of `trigger` removed
    /// from the applied triggers. Suggestions and flags are untouched.
    pub fn without_trigger(&self, trigger: &Trigger) -> Self {
        Self {
            triggers: self
                .triggers
                .iter()
                .filter(|t| *t != trigger)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    pub fn suggestions(&self) -> &[Trigger] {
        self.suggested_triggers.as_deref().unwrap_or_default()
    }

    pub fn is_weak(&self) -> bool {
        self.is_weak.unwrap_or(false)
    }
}

/// Citation attached to a generated script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Generator's assessment of how well the end of the video flows into its start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopabilityAnalysis {
    /// 0-10
    pub score: u8,
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_point_analysis: Option<TransitionPointAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPointAnalysis {
    pub last_event_visual: String,
    pub first_event_visual: String,
    pub visual_match_score: u8,
    pub last_event_audio: String,
    pub first_event_audio: String,
    pub audio_match_score: u8,
    pub suggestion_for_improvement: String,
}

/// One generated script: a duration and its timeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScriptVariant {
    #[serde(default)]
    pub variant_id: String,
    pub duration_s: u32,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loopability_analysis: Option<LoopabilityAnalysis>,
}

impl ScriptVariant {
    pub fn new(
        variant_id: impl Into<String>,
        duration_s: u32,
        timeline: Vec<TimelineEvent>,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            duration_s,
            timeline,
            ..Self::default()
        }
    }

    /// Indices of events the generator flagged as weak
    pub fn weak_events(&self) -> Vec<usize> {
        self.timeline
            .iter()
            .enumerate()
            .filter(|(_, event)| event.is_weak())
            .map(|(index, _)| index)
            .collect()
    }

    /// New variant with a suggested trigger promoted to an applied one
    ///
    /// The trigger is appended to the event's triggers unless already there
    /// and dropped from its suggestions. Applying a trigger that is already
    /// applied is a no-op rather than an error.
    pub fn with_suggestion_applied(&self, index: usize, trigger: &Trigger) -> Result<Self> {
        let len = self.timeline.len();
        let event = self
            .timeline
            .get(index)
            .ok_or(ReelsimError::EventIndexOutOfRange { index, len })?;

        let suggested = event.suggestions().contains(trigger);
        if !suggested && !event.has_trigger(trigger) {
            return Err(ReelsimError::TriggerNotSuggested {
                index,
                trigger: trigger.clone(),
            });
        }

        let mut updated = event.clone();
        if !updated.has_trigger(trigger) {
            updated.triggers.push(trigger.clone());
        }
        updated.suggested_triggers = Some(
            event
                .suggestions()
                .iter()
                .filter(|t| *t != trigger)
                .cloned()
                .collect(),
        );

        let mut variant = self.clone();
        variant.timeline[index] = updated;
        Ok(variant)
    }
}
