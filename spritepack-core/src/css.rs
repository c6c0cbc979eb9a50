//! Stylesheet and preview page text for a packed sheet.
//!
//! Each placement becomes one rule rendered from a template with bracketed
//! placeholders. Offsets are written negated, as `background-position`
//! expects.

use std::path::{Path, PathBuf};

use crate::frame::Placement;
use crate::options::SpriteOptions;

pub const PLACEHOLDER_IMAGE_DEPLOY_URL_BASE: &str = "[ImageDeployUrlBase]";
pub const PLACEHOLDER_CLASS_NAME_PREFIX: &str = "[CssClassNamePrefix]";
pub const PLACEHOLDER_CLASS_NAME_BASE: &str = "[CssClassNameBase]";
pub const PLACEHOLDER_CLASS_NAME_SUFFIX: &str = "[CssClassNameSuffix]";
pub const PLACEHOLDER_IMAGE_FILE_NAME: &str = "[ImageFileName]";
pub const PLACEHOLDER_WIDTH: &str = "[Width]";
pub const PLACEHOLDER_HEIGHT: &str = "[Height]";
pub const PLACEHOLDER_OFFSET_X: &str = "[OffsetX]";
pub const PLACEHOLDER_OFFSET_Y: &str = "[OffsetY]";

/// One generated rule, kept for the preview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRule {
    /// Full class name: prefix + sanitized base + suffix.
    pub class_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub css: String,
    pub rules: Vec<SpriteRule>,
}

/// Replace every char not in `allowed` with `replacement` (which may be empty).
pub fn only_allow(allowed: &str, s: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if allowed.contains(c) {
            out.push(c);
        } else {
            out.push_str(replacement);
        }
    }
    out
}

/// Class-name base for a source file: its file stem, sanitized.
pub fn class_name_base(id: &str, options: &SpriteOptions) -> String {
    let stem = Path::new(id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    only_allow(&options.valid_class_chars, &stem, &options.invalid_char_replacement)
}

pub fn render_rule(template: &str, values: &[(&str, &str)]) -> String {
    let mut rule = template.to_string();
    for &(key, value) in values {
        rule = rule.replace(key, value);
    }
    rule
}

/// Rules for every placement, in placement order, preceded by the header.
pub fn render_stylesheet(
    placements: &[Placement],
    options: &SpriteOptions,
    image_file_name: &str,
) -> Stylesheet {
    let mut sheet = Stylesheet::default();
    if let Some(header) = options.css_header.as_deref().filter(|h| !h.trim().is_empty()) {
        sheet.css.push_str(header);
        sheet.css.push('\n');
    }
    for p in placements {
        let base = class_name_base(&p.id, options);
        let width = p.width.to_string();
        let height = p.height.to_string();
        let offset_x = (-(p.x as i64)).to_string();
        let offset_y = (-(p.y as i64)).to_string();
        let values = [
            (PLACEHOLDER_IMAGE_DEPLOY_URL_BASE, options.image_deploy_url_base.as_str()),
            (PLACEHOLDER_CLASS_NAME_PREFIX, options.css_class_prefix.as_str()),
            (PLACEHOLDER_CLASS_NAME_BASE, base.as_str()),
            (PLACEHOLDER_CLASS_NAME_SUFFIX, options.css_class_suffix.as_str()),
            (PLACEHOLDER_IMAGE_FILE_NAME, image_file_name),
            (PLACEHOLDER_WIDTH, width.as_str()),
            (PLACEHOLDER_HEIGHT, height.as_str()),
            (PLACEHOLDER_OFFSET_X, offset_x.as_str()),
            (PLACEHOLDER_OFFSET_Y, offset_y.as_str()),
        ];
        sheet.css.push_str(&render_rule(&options.css_template, &values));
        sheet.css.push('\n');
        sheet.rules.push(SpriteRule {
            class_name: format!("{}{}{}", options.css_class_prefix, base, options.css_class_suffix),
            width: p.width,
            height: p.height,
        });
    }
    sheet
}

/// HTML page previewing every sprite in a sortable table.
///
/// The stylesheet is re-rendered with `test_page.deploy_url_base` when set so
/// the page can point at a different image location than production CSS.
pub fn render_test_page(
    placements: &[Placement],
    options: &SpriteOptions,
    image_file_name: &str,
    css_file_name: &str,
) -> String {
    let sheet = match &options.test_page.deploy_url_base {
        Some(base) if !base.trim().is_empty() => {
            let mut opts = options.clone();
            opts.image_deploy_url_base = base.clone();
            render_stylesheet(placements, &opts, image_file_name)
        }
        _ => render_stylesheet(placements, options, image_file_name),
    };

    let mut html = String::new();
    html.push_str(&format!(
        "<html><head><title>CSS Sprite Preview for: {css_file_name}</title>{}<style>\
         body {{background-color:#eeeeff;}} img {{margin:1px;border:solid 1px red;}} \
         TH {{background-color:#bbbbbb;}} TD {{background-color:#cccccc;}} \
         TR.a TD {{background-color:#DDDDDD;}} .clickable {{cursor:pointer;}} {}</style></head><body>",
        options.test_page.head_includes, sheet.css
    ));
    html.push_str(&format!("<h1>{} Images</h1>", sheet.rules.len()));
    html.push_str(
        "<table class='sortable' cellspacing=0 cellpadding=5><tr><td class=clickable>Css Class</td>\
         <td class=clickable>Height</td><td class=clickable>Width</td><td>Preview</td></tr>",
    );
    for (i, rule) in sheet.rules.iter().enumerate() {
        let alt = if i % 2 == 0 { "" } else { "a" };
        html.push_str(&format!(
            "<tr class='{alt}'><td>{name}</td><td>{h}</td><td>{w}</td>\
             <td><img src='{gif}' class='{name}' title='{name}' /></td></tr>",
            name = rule.class_name,
            h = rule.height,
            w = rule.width,
            gif = options.test_page.clear_gif_url,
        ));
    }
    html.push_str("</table></body></html>");
    html
}

/// Where the preview page for `css_path` is written.
pub fn test_page_path(css_path: &Path, options: &SpriteOptions) -> PathBuf {
    let suffix = &options.test_page.filename_suffix;
    let file_name = css_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match options.test_page.path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(dir) => Path::new(dir).join(format!("{file_name}{suffix}")),
        None => {
            let mut s = css_path.as_os_str().to_owned();
            s.push(suffix);
            PathBuf::from(s)
        }
    }
}
