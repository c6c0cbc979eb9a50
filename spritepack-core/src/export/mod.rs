//! Sprite sheet metadata (JSON) for consumers other than CSS.

use serde::{Deserialize, Serialize};

use crate::canvas::PackPreference;
use crate::frame::Placement;
use crate::pack::SpriteSheet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheetMeta {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub max_width: u64,
    pub preference: PackPreference,
    pub frames: Vec<Placement>,
}

impl SpriteSheetMeta {
    pub fn new(image: impl Into<String>, sheet: &SpriteSheet) -> Self {
        Self {
            image: image.into(),
            width: sheet.width,
            height: sheet.height,
            max_width: sheet.max_width,
            preference: sheet.preference,
            frames: sheet.placements.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::pack::pack_with_width;

    #[test]
    fn json_carries_canvas_and_frames() {
        let sheet = pack_with_width(vec![Frame::leaf("a.png", 8, 8), Frame::leaf("b.png", 4, 4)], 16).unwrap();
        let meta = SpriteSheetMeta::new("sprite.png", &sheet);
        let value: serde_json::Value = serde_json::from_str(&meta.to_json().unwrap()).unwrap();
        assert_eq!(value["image"], "sprite.png");
        assert_eq!(value["width"], 12);
        assert_eq!(value["height"], 8);
        assert_eq!(value["preference"], "ByHeight");
        assert_eq!(value["frames"][1]["id"], "b.png");
        assert_eq!(value["frames"][1]["x"], 8);
    }
}
