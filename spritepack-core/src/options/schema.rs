use serde::{Deserialize, Serialize};

/// Default per-sprite rule. See [`crate::css`] for the placeholders.
pub const DEFAULT_CSS_TEMPLATE: &str = ".[CssClassNamePrefix][CssClassNameBase][CssClassNameSuffix] {background:url('[ImageDeployUrlBase][ImageFileName]') no-repeat [OffsetX]px [OffsetY]px;width:[Width]px;height:[Height]px;}";

pub const DEFAULT_VALID_CLASS_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_0123456789";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    pub css_class_prefix: String,
    pub css_class_suffix: String,
    /// Prepended to the sprite file name inside `url(...)`.
    pub image_deploy_url_base: String,
    /// Text emitted before the first rule (comments, shared styles).
    pub css_header: Option<String>,
    pub css_template: String,
    pub valid_class_chars: String,
    /// Substituted for every file-name char not in `valid_class_chars`.
    pub invalid_char_replacement: String,
    pub treat_missing_input_as_error: bool,
    /// Overrides the computed row width when set.
    pub max_width: Option<u64>,
    /// Palette-quantize PNG output to this many bits per pixel (only 8).
    pub limit_bit_depth: Option<u8>,
    pub test_page: TestPageOptions,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            css_class_prefix: "img-".into(),
            css_class_suffix: String::new(),
            image_deploy_url_base: String::new(),
            css_header: None,
            css_template: DEFAULT_CSS_TEMPLATE.into(),
            valid_class_chars: DEFAULT_VALID_CLASS_CHARS.into(),
            invalid_char_replacement: String::new(),
            treat_missing_input_as_error: true,
            max_width: None,
            limit_bit_depth: None,
            test_page: TestPageOptions::default(),
        }
    }
}

/// HTML preview page listing every sprite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestPageOptions {
    pub enabled: bool,
    /// Directory for the page; next to the stylesheet when unset.
    pub path: Option<String>,
    /// Replaces `image_deploy_url_base` inside the page's embedded CSS.
    pub deploy_url_base: Option<String>,
    pub head_includes: String,
    pub clear_gif_url: String,
    pub filename_suffix: String,
}

impl Default for TestPageOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            path: None,
            deploy_url_base: None,
            head_includes: String::new(),
            clear_gif_url: "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7".into(),
            filename_suffix: "_test.html".into(),
        }
    }
}
