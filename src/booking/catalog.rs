//! Static service and add-on catalogs
//!
//! Prices are in whole rupees; services bill hourly, add-ons are flat.

/// A bookable service with an hourly base rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub hourly_rate: u32,
}

/// An optional extra with a flat price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOn {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
}

pub const SERVICES: [Service; 6] = [
    Service { id: "music-production", name: "Music Production", hourly_rate: 2500 },
    Service { id: "voice-dubbing", name: "Voice Dubbing", hourly_rate: 1500 },
    Service { id: "mixing-mastering", name: "Mixing & Mastering", hourly_rate: 2000 },
    Service { id: "vocal-recording", name: "Vocal Recording", hourly_rate: 1200 },
    Service { id: "podcast-video", name: "Podcast & Video Shooting", hourly_rate: 3000 },
    Service { id: "vocal-chain", name: "Vocal Chain Setup", hourly_rate: 1800 },
];

pub const ADD_ONS: [AddOn; 4] = [
    AddOn { id: "video-shoot", name: "Video Shoot", price: 1500 },
    AddOn { id: "extra-mixing", name: "Additional Mixing", price: 800 },
    AddOn { id: "mastering", name: "Professional Mastering", price: 1000 },
    AddOn { id: "backup-vocals", name: "Backup Vocals Recording", price: 1200 },
];

pub const TIME_SLOTS: [&str; 12] = [
    "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM",
    "01:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
    "05:00 PM", "06:00 PM", "07:00 PM", "08:00 PM",
];

/// Look a service up by identifier
pub fn service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.id == id)
}

/// Look an add-on up by identifier
pub fn add_on(id: &str) -> Option<&'static AddOn> {
    ADD_ONS.iter().find(|a| a.id == id)
}
