//! Emergency screen: contacts, simulated alerts and templated outbound
//! messages for the current location.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Emergency,
    Weather,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub number: &'static str,
    pub kind: ContactKind,
}

impl EmergencyContact {
    pub fn tel_link(&self) -> String {
        format!("tel:{}", self.number)
    }
}

pub const DEFAULT_CONTACTS: &[EmergencyContact] = &[
    EmergencyContact {
        name: "Emergency Services",
        number: "911",
        kind: ContactKind::Emergency,
    },
    EmergencyContact {
        name: "Weather Service",
        number: "1-888-NWS-SKYWARN",
        kind: ContactKind::Weather,
    },
    EmergencyContact {
        name: "Local Emergency",
        number: "311",
        kind: ContactKind::Local,
    },
];

pub const SAFETY_TIPS: &[&str] = &[
    "Stay indoors during severe weather",
    "Keep emergency supplies readily available",
    "Monitor weather updates regularly",
    "Have a communication plan with family",
    "Know your evacuation routes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Minor,
    Moderate,
    Severe,
}

impl AlertSeverity {
    pub fn icon(&self) -> &'static str {
        match self {
            AlertSeverity::Severe => "🚨",
            AlertSeverity::Moderate => "⚠️",
            AlertSeverity::Minor => "⚡",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AlertSeverity::Severe => "#e74c3c",
            AlertSeverity::Moderate => "#f39c12",
            AlertSeverity::Minor => "#f1c40f",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherAlert {
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub expires: DateTime<Utc>,
}

/// Simulated alerts for a location; there is no alert feed behind this.
pub fn simulated_alerts(now: DateTime<Utc>) -> Vec<WeatherAlert> {
    vec![WeatherAlert {
        title: "Severe Thunderstorm Watch".to_string(),
        message: "Severe thunderstorms possible in your area. Stay indoors and avoid travel."
            .to_string(),
        severity: AlertSeverity::Moderate,
        expires: now + Duration::hours(1),
    }]
}

/// Help request text for `location`.
pub fn emergency_message(location: &Location) -> String {
    format!(
        "Weather Emergency Alert: I need assistance due to severe weather conditions. \
         My location: {} ({:.4}, {:.4}). Please send help if possible.",
        location.name,
        location.lat(),
        location.lon()
    )
}

/// `sms:` link with the help request prefilled.
pub fn sms_link(location: &Location) -> String {
    format!("sms:?body={}", urlencoding::encode(&emergency_message(location)))
}

/// Messaging-app share link; prefixed with a siren so it stands out in chats.
pub fn whatsapp_link(location: &Location) -> String {
    let message = format!("🚨 {}", emergency_message(location));
    format!("https://wa.me/?text={}", urlencoding::encode(&message))
}

/// Plain text for copying to the clipboard on devices without SMS.
pub fn clipboard_text(location: &Location) -> String {
    emergency_message(location)
}
