//! Trigger vocabulary
//!
//! Triggers are the narrative and editing techniques a producer tags onto
//! timeline events. The vocabulary is closed; any string outside it is kept
//! as [`Trigger::Unknown`] so it survives a round trip, but it never carries
//! weight in the retention model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A tagged attention technique attached to a timeline event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trigger {
    Hook,
    Shock,
    Context,
    Cta,
    LoopHint,
    CuriosityQuestion,
    JumpCut,
    MusicCue,
    TextOverlayBold,
    PoignantPov,
    SurpriseReveal,
    SoundEffect,
    PatternInterrupt,
    QuickZoom,
    PointOfViewShot,
    SatisfyingVisual,
    CallbackJoke,
    Foreshadowing,
    VisualMetaphor,
    /// Identifier outside the vocabulary, carried verbatim
    Unknown(String),
}

impl Trigger {
    /// Every recognized trigger, in vocabulary order
    pub const KNOWN: [Trigger; 19] = [
        Trigger::Hook,
        Trigger::Shock,
        Trigger::Context,
        Trigger::Cta,
        Trigger::LoopHint,
        Trigger::CuriosityQuestion,
        Trigger::JumpCut,
        Trigger::MusicCue,
        Trigger::TextOverlayBold,
        Trigger::PoignantPov,
        Trigger::SurpriseReveal,
        Trigger::SoundEffect,
        Trigger::PatternInterrupt,
        Trigger::QuickZoom,
        Trigger::PointOfViewShot,
        Trigger::SatisfyingVisual,
        Trigger::CallbackJoke,
        Trigger::Foreshadowing,
        Trigger::VisualMetaphor,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Hook => "hook",
            Self::Shock => "shock",
            Self::Context => "context",
            Self::Cta => "cta",
            Self::LoopHint => "loop_hint",
            Self::CuriosityQuestion => "curiosity_question",
            Self::JumpCut => "jump_cut",
            Self::MusicCue => "music_cue",
            Self::TextOverlayBold => "text_overlay_bold",
            Self::PoignantPov => "poignant_pov",
            Self::SurpriseReveal => "surprise_reveal",
            Self::SoundEffect => "sound_effect",
            Self::PatternInterrupt => "pattern_interrupt",
            Self::QuickZoom => "quick_zoom",
            Self::PointOfViewShot => "point_of_view_shot",
            Self::SatisfyingVisual => "satisfying_visual",
            Self::CallbackJoke => "callback_joke",
            Self::Foreshadowing => "foreshadowing",
            Self::VisualMetaphor => "visual_metaphor",
            Self::Unknown(raw) => raw,
        }
    }

    /// Human-readable label ("loop_hint" -> "loop hint")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl FromStr for Trigger {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trigger = Self::KNOWN
            .iter()
            .find(|t| t.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Self::Unknown(s.to_string()));
        Ok(trigger)
    }
}

impl From<&str> for Trigger {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(trigger) => trigger,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Serialized as a bare identifier so it works both as a value and as a map key.
impl Serialize for Trigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Trigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Trigger::from(raw.as_str()))
    }
}
