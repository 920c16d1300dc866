use crate::foundation::core::PerMilleRect;
use crate::foundation::error::{RunanimeError, RunanimeResult};

/// A display the overlay can be shown on.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// Stable identifier referenced by [`Anime::monitor_id`].
    #[serde(default)]
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Resolution width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Resolution height in pixels.
    #[serde(default)]
    pub height: u32,
    /// Upload URL path of the editor background, if any.
    #[serde(default)]
    pub background_image: String,
}

/// One emotion state of an anime; each state with an image becomes one overlay sprite.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// State identifier.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Upload URL path of the sprite image; empty when no image is assigned.
    #[serde(default)]
    pub sprite_path: String,
    /// Chat lines attached to the state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub chats: Vec<String>,
    /// Left edge in per-mille; 0 falls back to the anime's value.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub x: i32,
    /// Top edge in per-mille; 0 falls back to the anime's value.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub y: i32,
    /// Width in per-mille; 0 falls back to the anime's value.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i32,
    /// Height in per-mille; 0 falls back to the anime's value.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i32,
    /// Saved disposal codes, one per GIF sub-frame, extracted at upload time.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "disposal_bytes"
    )]
    pub gif_disposal: Vec<u8>,
}

impl State {
    /// Placement of this state, falling back field by field to the owning anime.
    pub fn effective_rect(&self, anime: &Anime) -> PerMilleRect {
        fn or(v: i32, fallback: i32) -> i32 {
            if v == 0 { fallback } else { v }
        }
        PerMilleRect::new(
            or(self.x, anime.x),
            or(self.y, anime.y),
            or(self.width, anime.width),
            or(self.height, anime.height),
        )
    }
}

/// A character placed on one monitor.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    /// Anime identifier.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Monitor this anime is shown on.
    #[serde(default)]
    pub monitor_id: String,
    /// Default width in per-mille.
    #[serde(default)]
    pub width: i32,
    /// Default height in per-mille.
    #[serde(default)]
    pub height: i32,
    /// Default left edge in per-mille.
    #[serde(default)]
    pub x: i32,
    /// Default top edge in per-mille.
    #[serde(default)]
    pub y: i32,
    /// Emotion states.
    #[serde(default, deserialize_with = "null_as_default")]
    pub states: Vec<State>,
}

/// Settings document written by the configuration UI.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Known monitors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub monitors: Vec<Monitor>,
    /// Configured animes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub animes: Vec<Anime>,
    /// UI language code.
    #[serde(default)]
    pub language: String,
    /// UI theme flag.
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let state = |id: &str, name: &str, chats: &[&str]| State {
            id: id.to_string(),
            name: name.to_string(),
            chats: chats.iter().map(|c| (*c).to_string()).collect(),
            ..State::default()
        };
        Self {
            monitors: vec![Monitor {
                id: "mon-1".to_string(),
                name: "Display 1".to_string(),
                width: 1920,
                height: 1080,
                background_image: String::new(),
            }],
            animes: vec![Anime {
                id: "1".to_string(),
                name: "Default character".to_string(),
                monitor_id: "mon-1".to_string(),
                width: 120,
                height: 120,
                x: 100,
                y: 100,
                states: vec![
                    state("s1", "Neutral", &["Hi!", "Nice to see you."]),
                    state("s2", "Happy", &["Hehe!", "Feeling great today!"]),
                    state("s3", "Sad", &[]),
                    state("s4", "Angry", &[]),
                ],
            }],
            language: "ko".to_string(),
            dark_mode: true,
        }
    }
}

impl Settings {
    /// Parse a settings document and fill in defaults for missing sections.
    pub fn from_json_slice(bytes: &[u8]) -> RunanimeResult<Self> {
        let mut s: Settings = serde_json::from_slice(bytes)
            .map_err(|e| RunanimeError::config(format!("settings decode: {e}")))?;
        let defaults = Settings::default();
        if s.monitors.is_empty() {
            s.monitors = defaults.monitors;
        }
        if s.animes.is_empty() {
            s.animes = defaults.animes;
        }
        if s.language.is_empty() {
            s.language = defaults.language;
            s.dark_mode = true;
        }
        Ok(s)
    }

    /// Monitor with `id`, or the first monitor when `id` is `None`.
    pub fn monitor(&self, id: Option<&str>) -> RunanimeResult<&Monitor> {
        match id {
            Some(id) => self
                .monitors
                .iter()
                .find(|m| m.id == id)
                .ok_or_else(|| RunanimeError::config(format!("unknown monitor '{id}'"))),
            None => self
                .monitors
                .first()
                .ok_or_else(|| RunanimeError::config("settings contain no monitors")),
        }
    }
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

// Lists written as `null` read back as empty.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Ok(<Option<T> as serde::Deserialize>::deserialize(d)?.unwrap_or_default())
}

mod disposal_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Encoded(String),
        Codes(Vec<u8>),
    }

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&BASE64.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        match Option::<Repr>::deserialize(d)? {
            None => Ok(Vec::new()),
            Some(Repr::Encoded(s)) => BASE64
                .decode(s.as_bytes())
                .map_err(serde::de::Error::custom),
            Some(Repr::Codes(v)) => Ok(v),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
