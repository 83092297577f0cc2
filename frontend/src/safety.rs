//! Pure presentation transforms for safety scores: tier classification,
//! colors, labels, advice lists, and distance/time formatting. Nothing in
//! here touches the map or the document, so every function is testable on
//! the host target.

/// Risk tier of a 0–10 score: `Safe` (≤3), `Moderate` (4–6),
/// `Dangerous` (≥7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyLevel {
    Safe,
    Moderate,
    Dangerous,
}

impl SafetyLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            Self::Safe
        } else if score <= 6.0 {
            Self::Moderate
        } else {
            Self::Dangerous
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Safe => "#34c759",
            Self::Moderate => "#ff9500",
            Self::Dangerous => "#ff3b30",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Moderate => "Moderate",
            Self::Dangerous => "Dangerous",
        }
    }

    /// Lowercase variant used as a CSS class on tooltips and the meter.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::Dangerous => "dangerous",
        }
    }

    pub fn tips(self) -> &'static [&'static str] {
        match self {
            Self::Dangerous => &[
                "Consider alternative routes",
                "Stay alert",
                "Avoid walking alone",
                "Keep phone accessible",
                "Share your location",
            ],
            Self::Moderate => &[
                "Stay on well-lit paths",
                "Be mindful of surroundings",
                "Limit distractions",
                "Travel with a companion",
            ],
            Self::Safe => &[
                "This route is generally safe",
                "Remain aware",
                "Use standard safety practices",
            ],
        }
    }
}

pub fn color_for_score(score: f64) -> &'static str {
    SafetyLevel::from_score(score).color()
}

pub fn label_for_score(score: f64) -> &'static str {
    SafetyLevel::from_score(score).label()
}

/// CSS width of the meter fill: a 0–10 score maps to 0–100 percent.
pub fn meter_fill_width(score: f64) -> String {
    format!("{}%", score * 10.0)
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

pub fn format_time(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{} sec", seconds.round() as i64);
    }
    let mins = (seconds / 60.0).round() as i64;
    if mins < 60 {
        format!("{mins} min")
    } else {
        format!("{} hr {} min", mins / 60, mins % 60)
    }
}
