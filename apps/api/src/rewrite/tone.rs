//! Tone table — the closed set of emotional registers a rewrite can be steered toward.
//!
//! Tone is only interpolated into the prompt; nothing here classifies text.
//! Unknown keys resolve to `Tone::Normal` without error.

use serde::{Deserialize, Serialize};

/// A named emotional register applied across every rewrite variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Normal,
    Casual,
    Warm,
    Dramatic,
    Confident,
    Thoughtful,
    Subtle,
    Sarcasm,
}

impl Tone {
    /// Every tone, in display order.
    pub const ALL: [Tone; 8] = [
        Tone::Normal,
        Tone::Casual,
        Tone::Warm,
        Tone::Dramatic,
        Tone::Confident,
        Tone::Thoughtful,
        Tone::Subtle,
        Tone::Sarcasm,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Tone::Normal => "Normal",
            Tone::Casual => "Casual",
            Tone::Warm => "Warm",
            Tone::Dramatic => "Dramatic",
            Tone::Confident => "Confident",
            Tone::Thoughtful => "Thoughtful",
            Tone::Subtle => "Subtle",
            Tone::Sarcasm => "Sarcasm",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Tone::Normal => "Neutral and clear. No added emotion; keep the original intent as-is.",
            Tone::Casual => "Relaxed and easygoing, like talking to a friend.",
            Tone::Warm => "Kind, friendly and supportive, with a caring touch.",
            Tone::Dramatic => "Expressive and intense, with heightened emotion and flair.",
            Tone::Confident => "Assertive and self-assured, direct without hedging.",
            Tone::Thoughtful => "Reflective and considerate, showing careful thought.",
            Tone::Subtle => "Understated and gentle, conveying emotion indirectly.",
            Tone::Sarcasm => "Dry and ironic, saying the opposite of what is meant with a wink.",
        }
    }

    /// Resolves a user-supplied tone key. Matching ignores case and surrounding
    /// whitespace; anything unrecognized falls back to `Normal`.
    pub fn resolve(key: &str) -> Tone {
        let key = key.trim();
        Tone::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(key))
            .unwrap_or_default()
    }

    /// Resolves an optional key, treating absence like an unknown key.
    pub fn resolve_opt(key: Option<&str>) -> Tone {
        key.map(Tone::resolve).unwrap_or_default()
    }
}

/// Serializable view of one tone for the `/tones` listing.
#[derive(Debug, Clone, Serialize)]
pub struct ToneDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

impl From<Tone> for ToneDescriptor {
    fn from(tone: Tone) -> Self {
        Self {
            name: tone.name(),
            description: tone.description(),
        }
    }
}

pub fn tone_descriptors() -> Vec<ToneDescriptor> {
    Tone::ALL.into_iter().map(ToneDescriptor::from).collect()
}
