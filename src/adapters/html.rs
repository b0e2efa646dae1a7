//! `Dom` implementation over rendered HTML source.
//!
//! Styles are resolved from the nearest element carrying either a browser-stamped
//! computed value (`data-rendered-*`, see the WebDriver renderer) or an inline
//! `style` declaration. Static pages without either fall back to browser defaults.

use crate::domain::model::DomElement;
use crate::domain::ports::Dom;
use crate::utils::error::{Result, ScrapeError};
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub const COLOR_ATTR: &str = "data-rendered-color";
pub const FONT_SIZE_ATTR: &str = "data-rendered-font-size";
pub const VISIBLE_ATTR: &str = "data-rendered-visible";

const DEFAULT_COLOR: &str = "rgb(0, 0, 0)";
const DEFAULT_FONT_SIZE: &str = "16px";

const NON_RENDERED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript"];
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "th",
    "thead", "tr", "ul",
];

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([\d.]+)\s*)?\)$")
        .unwrap()
});

/// 以 HTML 原始碼表示的頁面快照。每次查詢重新解析，快照本身只持有字串。
#[derive(Debug, Clone)]
pub struct HtmlDom {
    source: String,
}

impl HtmlDom {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    // scraper::Html 不是 Send/Sync，因此不快取解析結果
    fn document(&self) -> Html {
        Html::parse_document(&self.source)
    }
}

impl Dom for HtmlDom {
    fn select_first(&self, selector: &str) -> Result<Option<DomElement>> {
        let parsed = Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })?;

        let document = self.document();
        let element = document.select(&parsed).next().map(snapshot);
        Ok(element)
    }

    fn select_containing(&self, needles: &[String], excluded_tags: &[String]) -> Result<Vec<DomElement>> {
        let document = self.document();
        let elements: Vec<DomElement> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| {
                let name = element.value().name();
                !excluded_tags.iter().any(|tag| tag.eq_ignore_ascii_case(name))
            })
            .filter(|element| own_text_contains(*element, needles))
            .map(snapshot)
            .collect();
        Ok(elements)
    }
}

/// 只看直接子文字節點，不含後代元素的文字
fn own_text_contains(element: ElementRef<'_>, needles: &[String]) -> bool {
    element.children().any(|child| match child.value() {
        Node::Text(text) => needles.iter().any(|needle| text.contains(needle.as_str())),
        _ => false,
    })
}

fn snapshot(element: ElementRef<'_>) -> DomElement {
    let visible = is_rendered(element);
    let text = if visible {
        rendered_text(element)
    } else {
        String::new()
    };

    let color = resolved_style(element, "color", COLOR_ATTR)
        .map(|raw| normalize_color(&raw))
        .unwrap_or_else(|| DEFAULT_COLOR.to_string());
    let font_size = resolved_style(element, "font-size", FONT_SIZE_ATTR)
        .unwrap_or_else(|| DEFAULT_FONT_SIZE.to_string());

    DomElement {
        tag: element.value().name().to_string(),
        text: Some(text),
        visible: Some(visible),
        color: Some(color),
        font_size: Some(font_size),
        class_attribute: element.value().attr("class").map(str::to_string),
    }
}

fn is_rendered(element: ElementRef<'_>) -> bool {
    if let Some(stamped) = element.value().attr(VISIBLE_ATTR) {
        return stamped != "false";
    }

    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .all(|el| !hides_itself(el))
}

fn hides_itself(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if NON_RENDERED_TAGS.contains(&value.name()) || value.attr("hidden").is_some() {
        return true;
    }
    if value.attr(VISIBLE_ATTR) == Some("false") {
        return true;
    }

    let display_none = inline_style(element, "display").is_some_and(|v| v.eq_ignore_ascii_case("none"));
    let visibility_hidden = inline_style(element, "visibility")
        .is_some_and(|v| v.eq_ignore_ascii_case("hidden") || v.eq_ignore_ascii_case("collapse"));
    display_none || visibility_hidden
}

fn inline_style(element: ElementRef<'_>, property: &str) -> Option<String> {
    element.value().attr("style")?.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case(property) {
            return None;
        }
        let value = value.trim().trim_end_matches("!important").trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// 由自身往祖先找第一個有值的樣式（繼承屬性）
fn resolved_style(element: ElementRef<'_>, property: &str, stamp_attr: &str) -> Option<String> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find_map(|el| {
            if let Some(stamped) = el.value().attr(stamp_attr) {
                return Some(stamped.to_string());
            }
            inline_style(el, property).filter(|v| !v.eq_ignore_ascii_case("inherit"))
        })
}

/// 類似瀏覽器 innerText：空白合併、隱藏元素略過、區塊元素與 `<br>` 斷行
fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);

    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(out, text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                if hides_itself(child) {
                    continue;
                }

                let name = child.value().name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect_text(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C') {
            if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

/// 將 `red`、`#f00`、`rgb(255,0,0)` 等寫法統一為 `rgb(r, g, b)`
pub fn normalize_color(raw: &str) -> String {
    let value = raw.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        if let Some((r, g, b)) = parse_hex_color(hex) {
            return format!("rgb({}, {}, {})", r, g, b);
        }
    }

    if let Some(caps) = RGB_FUNCTION.captures(&value) {
        let channels = format!("{}, {}, {}", &caps[1], &caps[2], &caps[3]);
        return match caps.get(4) {
            Some(alpha) => format!("rgba({}, {})", channels, alpha.as_str()),
            None => format!("rgb({})", channels),
        };
    }

    match value.as_str() {
        "red" => "rgb(255, 0, 0)".to_string(),
        "black" => DEFAULT_COLOR.to_string(),
        "white" => "rgb(255, 255, 255)".to_string(),
        _ => value,
    }
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let mut chars = hex.chars().map(|c| c.to_string().repeat(2));
            Some((
                channel(&chars.next()?)?,
                channel(&chars.next()?)?,
                channel(&chars.next()?)?,
            ))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}
