use std::{borrow::Cow, sync::OnceLock};

use rust_embed::RustEmbed;

use crate::domain::Article;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static LOGO_DATA_URI: OnceLock<String> = OnceLock::new();
static ARTICLES: OnceLock<Vec<Article>> = OnceLock::new();

/// Returns the contents of `assets/main.css` as a static string.
pub fn main_css() -> &'static str {
    MAIN_CSS
        .get_or_init(|| load_text("/assets/main.css").unwrap_or_default())
        .as_str()
}

/// Returns a data URI for the app logo.
pub fn logo_data_uri() -> &'static str {
    LOGO_DATA_URI
        .get_or_init(|| load_data_uri("/assets/logo.svg").unwrap_or_default())
        .as_str()
}

/// Knowledge-hub catalogue from `assets/articles.json`.
pub fn articles() -> &'static [Article] {
    ARTICLES.get_or_init(|| {
        load_text("/assets/articles.json")
            .and_then(|json| match serde_json::from_str::<Vec<Article>>(&json) {
                Ok(articles) => Some(articles),
                Err(e) => {
                    tracing::warn!("failed to parse article catalogue: {e}");
                    None
                }
            })
            .unwrap_or_default()
    })
}

fn load_text(path: &str) -> Option<String> {
    let asset = load_asset(path)?;
    match String::from_utf8(asset.into_owned()) {
        Ok(text) => Some(text),
        Err(_) => {
            tracing::warn!("embedded asset {path} is not valid UTF-8");
            None
        }
    }
}

fn load_data_uri(path: &str) -> Option<String> {
    let asset = load_asset(path)?;
    let mime = guess_mime(path);
    let encoded = encode_base64(asset.as_ref());
    Some(format!("data:{mime};base64,{encoded}"))
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    let canonical = canonical_asset_path(path);
    let asset = EmbeddedAssets::get(&canonical).map(|file| file.data);
    if asset.is_none() {
        tracing::warn!("missing embedded asset: {path}");
    }
    asset
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if let Some(rest) = trimmed.strip_prefix("assets/") {
        rest.to_string()
    } else {
        trimmed.to_string()
    }
}

fn guess_mime(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".json") {
        "application/json"
    } else if path.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

fn encode_base64(input: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut output = String::with_capacity((input.len() + 2) / 3 * 4);

    for chunk in input.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        output.push(TABLE[(b0 >> 2) as usize] as char);
        output.push(TABLE[(((b0 & 0b11) << 4) | (b1 >> 4)) as usize] as char);
        output.push(if chunk.len() > 1 {
            TABLE[(((b1 & 0b1111) << 2) | (b2 >> 6)) as usize] as char
        } else {
            '='
        });
        output.push(if chunk.len() > 2 {
            TABLE[(b2 & 0b0011_1111) as usize] as char
        } else {
            '='
        });
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{find_article, section_label};

    #[test]
    fn base64_pads_partial_chunks() {
        assert_eq!(encode_base64(b"Man"), "TWFu");
        assert_eq!(encode_base64(b"Ma"), "TWE=");
        assert_eq!(encode_base64(b"M"), "TQ==");
        assert_eq!(encode_base64(b""), "");
    }

    #[test]
    fn catalogue_is_embedded() {
        let catalogue = articles();
        assert_eq!(catalogue.len(), 2);
        let incoterms = find_article(catalogue, "incoterms-2020").unwrap();
        assert!(!incoterms.sections.is_empty());
        assert!(incoterms.sections.iter().all(|s| !s.blocks().is_empty()));
        assert_eq!(section_label(0), "Introduction");
    }

    #[test]
    fn logo_is_a_data_uri() {
        assert!(logo_data_uri().starts_with("data:image/svg+xml;base64,"));
        assert!(main_css().contains(".app-shell"));
    }
}
