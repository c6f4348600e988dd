//! Membership card configuration

use serde::{Deserialize, Serialize};

/// ID card rendering and export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    /// Organization short name printed on cards and export file names
    #[serde(default = "default_organization")]
    pub organization: String,
    /// Public site origin encoded into the verification QR code
    #[serde(default = "default_verify_base_url")]
    pub verify_base_url: String,
    /// Render scale relative to the base card size
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: u32,
    /// Printed width of the card image on the exported page, in millimetres
    #[serde(default = "default_export_width_mm")]
    pub export_width_mm: f32,
    /// Timeout for fetching profile photos, in seconds
    #[serde(default = "default_photo_timeout")]
    pub photo_timeout: u64,
    /// Largest profile photo accepted from a remote host, in bytes
    #[serde(default = "default_max_photo_size")]
    pub max_photo_size: usize,
    /// Allow photo URLs on loopback, private and link-local hosts
    #[serde(default)]
    pub allow_private_photo_hosts: bool,
    /// Values used for decorative fields a submission leaves empty
    #[serde(default)]
    pub defaults: CardDefaults,
}

/// Decorative card fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefaults {
    #[serde(default = "default_motto")]
    pub motto: String,
    #[serde(default = "default_batch")]
    pub batch: String,
    #[serde(default = "default_issued_date")]
    pub issued_date: String,
    #[serde(default = "default_expiry_date")]
    pub expiry_date: String,
    #[serde(default = "default_secretary_name")]
    pub secretary_name: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            verify_base_url: default_verify_base_url(),
            pixel_ratio: default_pixel_ratio(),
            export_width_mm: default_export_width_mm(),
            photo_timeout: default_photo_timeout(),
            max_photo_size: default_max_photo_size(),
            allow_private_photo_hosts: false,
            defaults: CardDefaults::default(),
        }
    }
}

impl Default for CardDefaults {
    fn default() -> Self {
        Self {
            motto: default_motto(),
            batch: default_batch(),
            issued_date: default_issued_date(),
            expiry_date: default_expiry_date(),
            secretary_name: default_secretary_name(),
        }
    }
}

impl CardConfig {
    /// Merge card configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.organization != default_organization() {
            self.organization = other.organization;
        }
        if other.verify_base_url != default_verify_base_url() {
            self.verify_base_url = other.verify_base_url;
        }
        if other.pixel_ratio != default_pixel_ratio() {
            self.pixel_ratio = other.pixel_ratio;
        }
        if (other.export_width_mm - default_export_width_mm()).abs() > f32::EPSILON {
            self.export_width_mm = other.export_width_mm;
        }
        if other.photo_timeout != default_photo_timeout() {
            self.photo_timeout = other.photo_timeout;
        }
        if other.max_photo_size != default_max_photo_size() {
            self.max_photo_size = other.max_photo_size;
        }
        if other.allow_private_photo_hosts {
            self.allow_private_photo_hosts = true;
        }
        if other.defaults != CardDefaults::default() {
            self.defaults = other.defaults;
        }
        self
    }

    /// Validate card configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.organization.trim().is_empty() {
            return Err("Card organization cannot be empty".to_string());
        }
        if !self
            .organization
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!(
                "Card organization must be usable in a file name: {}",
                self.organization
            ));
        }
        if !crate::utils::is_valid_url(&self.verify_base_url) {
            return Err(format!(
                "Verify base URL is invalid: {}",
                self.verify_base_url
            ));
        }
        if !(1..=6).contains(&self.pixel_ratio) {
            return Err("Pixel ratio must be between 1 and 6".to_string());
        }
        if !(20.0..=200.0).contains(&self.export_width_mm) {
            return Err("Export width must be between 20mm and 200mm".to_string());
        }
        if self.photo_timeout == 0 {
            return Err("Photo timeout cannot be 0".to_string());
        }
        if self.max_photo_size == 0 {
            return Err("Max photo size cannot be 0".to_string());
        }
        Ok(())
    }
}

fn default_organization() -> String {
    "NCSS".to_string()
}

fn default_verify_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_pixel_ratio() -> u32 {
    3
}

fn default_export_width_mm() -> f32 {
    100.0
}

fn default_photo_timeout() -> u64 {
    10
}

fn default_max_photo_size() -> usize {
    10 * 1024 * 1024
}

fn default_motto() -> String {
    "Adhipathi Vidya Labha".to_string()
}

fn default_batch() -> String {
    "2025".to_string()
}

fn default_issued_date() -> String {
    "JAN 2025".to_string()
}

fn default_expiry_date() -> String {
    "DEC 2026".to_string()
}

fn default_secretary_name() -> String {
    "J. Doe".to_string()
}
