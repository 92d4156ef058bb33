//! Fixed recommendation lists per risk level
//!
//! The lists are process-wide constants consumed verbatim. Nothing is
//! generated dynamically.

use crate::risk::RiskLevel;

const LOW: &[&str] = &[
    "Stay informed about weather conditions",
    "Ensure your property maintains a defensible space",
    "Review your emergency plan periodically",
];

const MODERATE: &[&str] = &[
    "Clear dead vegetation from your property",
    "Keep updated on local fire restrictions",
    "Prepare an emergency kit with essentials",
    "Review evacuation routes with your family",
];

const HIGH: &[&str] = &[
    "Avoid outdoor activities that could cause sparks",
    "Keep garden hoses and fire extinguishers accessible",
    "Move flammable materials away from your home",
    "Be prepared to evacuate if conditions worsen",
    "Stay tuned to local emergency notifications",
];

const VERY_HIGH: &[&str] = &[
    "Consider voluntary evacuation, especially for vulnerable individuals",
    "Shut off gas at the meter if you leave your home",
    "Close all windows and doors before evacuating",
    "Move patio furniture away from your home",
    "Charge phones and keep vehicles fueled",
];

const EXTREME: &[&str] = &[
    "Evacuate immediately if authorities recommend it",
    "Follow designated evacuation routes",
    "Take only essential items with you",
    "Notify friends and family of your location",
    "Register with local emergency services for updates",
];

/// Ordered recommendation list for a risk level
pub fn recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => LOW,
        RiskLevel::Moderate => MODERATE,
        RiskLevel::High => HIGH,
        RiskLevel::VeryHigh => VERY_HIGH,
        RiskLevel::Extreme => EXTREME,
    }
}
