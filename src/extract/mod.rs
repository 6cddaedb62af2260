//! Extraction of announcement records from the rendered page
//!
//! The extraction script runs inside the page's script context and returns
//! plain data only; no live DOM references cross the evaluate boundary. Each
//! DOM item becomes a [`RawItem`] whose missing sub-elements are encoded as
//! `None`, and the Rust-side mapper turns it into `Some(record)` or drops it.

pub mod normalize;

pub use normalize::{absolutize, compose_date, normalize};

use serde::{Deserialize, Serialize};

/// One normalized announcement, the unit of output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    pub title: String,
    pub url: String,
    pub date: String,
}

/// Per-item payload returned by the in-page extraction script
///
/// A `None` field means the corresponding sub-element was absent in the DOM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub link: Option<RawLink>,
    pub date: Option<RawDate>,
}

/// Title/link sub-element of one item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLink {
    pub title: String,
    pub href: String,
}

/// Date fragments of one item; missing fragments are empty strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDate {
    pub day: String,
    pub month: String,
    pub year: String,
}

/// Builds the in-page extraction script for the configured selectors
///
/// The script maps every item-selector node to a plain object; it never
/// throws on malformed items, it encodes them as nulls instead.
pub fn build_extraction_script(
    item_selector: &str,
    link_selector: &str,
    date_selector: &str,
) -> String {
    // JSON-encode the selectors so quoting inside them cannot break the script
    let item = serde_json::to_string(item_selector).unwrap_or_default();
    let link = serde_json::to_string(link_selector).unwrap_or_default();
    let date = serde_json::to_string(date_selector).unwrap_or_default();

    format!(
        r#"(() => {{
            const items = Array.from(document.querySelectorAll({item}));
            return items.map((item) => {{
                const link = item.querySelector({link});
                const date = item.querySelector({date});
                const spans = date ? date.querySelectorAll("span") : [];
                return {{
                    link: link
                        ? {{ title: link.textContent || "", href: link.href || "" }}
                        : null,
                    date: date
                        ? {{
                            day: ((date.childNodes[0] && date.childNodes[0].textContent) || "").trim(),
                            month: ((spans[0] && spans[0].textContent) || "").trim(),
                            year: ((spans[1] && spans[1].textContent) || "").trim(),
                        }}
                        : null,
                }};
            }});
        }})()"#
    )
}

/// Maps one raw item to a candidate record, or `None` for malformed items
///
/// An item missing either its link or its date container contributes no
/// record; the rest of the pass continues. Titles that trim to nothing are
/// dropped for the same reason, since every record must carry a title.
pub fn map_item(raw: RawItem) -> Option<AnnouncementRecord> {
    let (link, date) = match (raw.link, raw.date) {
        (Some(link), Some(date)) => (link, date),
        _ => {
            tracing::warn!("Skipping announcement item with missing link or date element");
            return None;
        }
    };

    if link.title.trim().is_empty() {
        tracing::warn!("Skipping announcement item with empty title");
        return None;
    }

    Some(AnnouncementRecord {
        title: link.title,
        url: link.href,
        date: compose_date(&date.day, &date.month, &date.year),
    })
}

/// Maps, filters and normalizes a full extraction pass, preserving document order
pub fn collect_records(items: Vec<RawItem>, base_origin: &str) -> Vec<AnnouncementRecord> {
    items
        .into_iter()
        .filter_map(map_item)
        .map(|record| normalize(record, base_origin))
        .collect()
}
