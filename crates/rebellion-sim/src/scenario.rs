//! Built-in campaign content.
//!
//! The default campaign is three stages of Amarr Empire ships, each ending in
//! a capital-ship boss. The JSON documents are the same ones the app ships
//! under `data/`.

use rebellion_core::content::{ContentError, ContentLibrary};

pub const DEFAULT_ENEMIES_JSON: &str = include_str!("../../../data/enemies.json");
pub const DEFAULT_POWERUPS_JSON: &str = include_str!("../../../data/powerups.json");
pub const DEFAULT_STAGES_JSON: &str = include_str!("../../../data/stages.json");

/// Parse and validate the built-in campaign.
pub fn default_content() -> Result<ContentLibrary, ContentError> {
    ContentLibrary::from_json_parts(
        DEFAULT_ENEMIES_JSON,
        DEFAULT_POWERUPS_JSON,
        DEFAULT_STAGES_JSON,
    )
}
