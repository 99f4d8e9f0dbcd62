//! Page settings, query parameters and capabilities
//!
//! Everything here is resolved once at startup and handed to the scene and
//! the platform shell; nothing is queried ad hoc afterwards.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TARGET;
use crate::sim::Code;
use crate::sim::typewriter::{DEFAULT_CHAR_MS, DEFAULT_LINE_PAUSE_MS};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle cap for each burst pool (confetti, hearts, fx)
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 800,
            QualityPreset::High => 2000,
        }
    }

    /// Size of the heart-morph formation
    pub fn morph_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 250,
            QualityPreset::Medium => 600,
            QualityPreset::High => 900,
        }
    }

    /// Rockets per fireworks volley
    pub fn fireworks_per_volley(&self) -> usize {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 4,
            QualityPreset::High => 6,
        }
    }
}

fn default_message() -> Vec<String> {
    [
        "You found the code.",
        "Every number on this lock is a day I'm glad I met you.",
        "Happy anniversary, my love.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Combination that opens the lock (its length sets the dial count)
    pub target: Code,
    /// Particle budgets
    pub quality: QualityPreset,

    // === Motion ===
    /// Reduced motion (no shake, no fireworks)
    pub reduced_motion: bool,

    // === Feedback ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
    /// Vibrate on attempts
    pub haptics: bool,

    // === Message ===
    /// Lines revealed by the typewriter
    pub message: Vec<String>,
    pub typewriter_char_ms: f64,
    pub typewriter_line_pause_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: Code::new(DEFAULT_TARGET).unwrap_or_else(|_| Code::zeros(DEFAULT_TARGET.len())),
            quality: QualityPreset::Medium,

            reduced_motion: false,

            master_volume: 0.8,
            muted: false,
            haptics: true,

            message: default_message(),
            typewriter_char_ms: DEFAULT_CHAR_MS,
            typewriter_line_pause_ms: DEFAULT_LINE_PAUSE_MS,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective shake on a wrong code (respects reduced_motion)
    pub fn effective_shake(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective fireworks (respects reduced_motion)
    pub fn effective_fireworks(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Element holding the JSON override
    pub const CONFIG_ELEMENT_ID: &'static str = "love-lock-config";

    /// Load settings from the page's JSON config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page config");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid page config: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Personalization read from the query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Prefilled combination (only if it has exactly the dial count)
    pub code: Option<Code>,
    /// Letter signature
    pub sign: String,
    /// Letter photo source
    pub photo: String,
    pub caption: String,
}

impl PageConfig {
    pub const DEFAULT_SIGN: &'static str = "Yours, always";
    pub const DEFAULT_PHOTO: &'static str = "assets/us.jpg";
    pub const DEFAULT_CAPTION: &'static str = "Us, on the best day";

    /// Parse `location.search`; malformed values leave defaults in place
    pub fn from_query(search: &str, code_len: usize) -> Self {
        let code = query_param(search, "code").and_then(|raw| match Code::parse(&raw, code_len) {
            Ok(code) => Some(code),
            Err(e) => {
                log::warn!("Ignoring code parameter: {e}");
                None
            }
        });
        let text = |key: &str, default: &str| {
            query_param(search, key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            code,
            sign: text("sign", Self::DEFAULT_SIGN),
            photo: text("photo", Self::DEFAULT_PHOTO),
            caption: text("caption", Self::DEFAULT_CAPTION),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::from_query("", 0)
    }
}

/// First value for `key` in a `?a=b&c=d` query string, percent-decoded
pub fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (url_decode(k) == key).then(|| url_decode(v))
        })
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// Browser features, probed once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Web Audio context can be created
    pub audio: bool,
    /// `navigator.vibrate` exists
    pub haptics: bool,
    /// Async clipboard API exists
    pub clipboard: bool,
    /// Primary pointer is a finger
    pub coarse_pointer: bool,
}
