//! Pastebin archive page parser.
//!
//! The archive lists recent public pastes in `table.maintable`. Each row
//! links the paste by its ID (`/AbCdEfGh`) next to syntax links such as
//! `/archive/python`, so only tokens with the paste ID shape are kept.

use std::sync::LazyLock;

use pastewatch_shared::PasteId;
use scraper::{Html, Selector};

/// How many raw links are examined per wanted ID. Syntax links and other
/// same-site anchors are interleaved with the paste links.
const OVERSCAN_FACTOR: usize = 2;

/// Same-site links inside the archive table.
static ARCHIVE_LINK_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"table.maintable tr td a[href^="/"]"#).expect("archive link selector")
});

/// Extract up to `max` paste IDs from archive HTML, in page order.
///
/// At most `OVERSCAN_FACTOR * max` links are examined; malformed tokens are
/// skipped silently.
pub fn parse_archive(html: &str, max: usize) -> Vec<PasteId> {
    let doc = Html::parse_document(html);
    let mut ids = Vec::new();

    if max == 0 {
        return ids;
    }

    let hrefs = doc
        .select(&ARCHIVE_LINK_SEL)
        .filter_map(|el| el.value().attr("href"))
        .take(max.saturating_mul(OVERSCAN_FACTOR));

    for href in hrefs {
        if let Ok(id) = PasteId::parse(href.trim_matches('/')) {
            ids.push(id);
        }
        if ids.len() >= max {
            break;
        }
    }

    ids
}
