//! Markdown export of analyzed scripts

use std::fmt;

use crate::impact::TriggerImpact;
use crate::retention::RetentionResult;
use crate::timeline::ScriptVariant;
use crate::trigger::Trigger;

fn trigger_list(triggers: &[Trigger]) -> String {
    triggers
        .iter()
        .map(|t| format!("`{}`", t.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// File name for the variant at `index` (zero-based)
pub fn export_file_name(index: usize) -> String {
    format!("variant-{}.md", index + 1)
}

/// Markdown document for one analyzed variant
pub struct VariantMarkdown<'a> {
    /// Zero-based; the heading numbers variants from 1
    pub index: usize,
    pub variant: &'a ScriptVariant,
    pub analysis: &'a RetentionResult,
    pub impacts: &'a [TriggerImpact],
}

impl fmt::Display for VariantMarkdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = self.variant;

        writeln!(f, "# Script Variant {}\n", self.index + 1)?;

        writeln!(f, "## Metrics")?;
        writeln!(f, "- **Duration:** {} seconds", variant.duration_s)?;
        writeln!(
            f,
            "- **Predicted Finish Rate:** {:.2}%",
            self.analysis.predicted_finish_rate * 100.0
        )?;
        writeln!(
            f,
            "- **Predicted Replay Score:** {:.2}",
            self.analysis.predicted_replay_score
        )?;
        if let Some(loopability) = &variant.loopability_analysis {
            writeln!(f, "- **Loopability Score:** {}/10", loopability.score)?;
            writeln!(f, "- **Loop Analysis:** {}", loopability.analysis)?;
        }
        writeln!(f)?;

        if let Some(sources) = variant.sources.as_ref().filter(|s| !s.is_empty()) {
            writeln!(f, "## Sources")?;
            for source in sources {
                writeln!(f, "- [{}]({})", source.title, source.uri)?;
            }
            writeln!(f)?;
        }

        if !self.impacts.is_empty() {
            writeln!(f, "## Trigger Impact\n")?;
            writeln!(f, "| Trigger | Impact |")?;
            writeln!(f, "|---|---|")?;
            for impact in self.impacts {
                writeln!(f, "| {} | +{:.2} pp |", impact.trigger.label(), impact.impact)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "## Timeline\n")?;
        for event in &variant.timeline {
            writeln!(f, "### {}s - {}s\n", event.sec_start, event.sec_end)?;
            writeln!(f, "**Caption:** \"{}\"\n", event.caption)?;
            writeln!(f, "- **Visual:** {}", event.visual)?;
            writeln!(f, "- **Audio:** {}", event.audio)?;
            if !event.triggers.is_empty() {
                writeln!(f, "- **Triggers:** {}", trigger_list(&event.triggers))?;
            }
            if !event.suggestions().is_empty() {
                writeln!(f, "- **AI Suggestions:** {}", trigger_list(event.suggestions()))?;
            }
            writeln!(f, "\n---\n")?;
        }

        Ok(())
    }
}

/// Render one variant with its analysis as a markdown document
pub fn render_markdown(
    index: usize,
    variant: &ScriptVariant,
    analysis: &RetentionResult,
    impacts: &[TriggerImpact],
) -> String {
    VariantMarkdown {
        index,
        variant,
        analysis,
        impacts,
    }
    .to_string()
}
