//! Engagement score classification

/// Discrete display marker derived from a contact's engagement score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementSymbol {
    Devoted,
    Hot,
    Warm,
    Lukewarm,
    Cold,
    Dead,
    Unknown,
}

impl EngagementSymbol {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Devoted => "💎",
            Self::Hot => "🔥",
            Self::Warm => "🙂",
            Self::Lukewarm => "😐",
            Self::Cold => "🥶",
            Self::Dead => "💀",
            Self::Unknown => "❔",
        }
    }
}

/// Bucket a score into a display symbol. Total over the whole domain:
/// absent, NaN, or out-of-range input degrades to `Unknown` rather than
/// failing the request.
pub fn classify(score: Option<f64>) -> EngagementSymbol {
    let score = match score {
        Some(s) if !s.is_nan() => s,
        _ => return EngagementSymbol::Unknown,
    };

    if score >= 92.0 {
        EngagementSymbol::Devoted
    } else if score >= 62.0 {
        EngagementSymbol::Hot
    } else if score >= 37.0 {
        EngagementSymbol::Warm
    } else if score >= 18.0 {
        EngagementSymbol::Lukewarm
    } else if score > 0.0 {
        EngagementSymbol::Cold
    } else if score == 0.0 {
        EngagementSymbol::Dead
    } else {
        // Negative scores should not occur (upstream clamps to [0,100])
        EngagementSymbol::Unknown
    }
}
