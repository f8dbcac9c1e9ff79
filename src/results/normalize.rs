//! Helpers shared by provider adapters when reshaping upstream payloads

use url::Url;

/// Icon shown when a link cannot be parsed (1x1 transparent GIF)
pub const PLACEHOLDER_FAVICON: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==";

/// Favicon service keyed by origin
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Hostname of `link`, or an empty string if it does not parse
pub fn display_host(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_default()
}

/// Best-effort icon URL for `link`. Never fails.
pub fn favicon_url(link: &str) -> String {
    let origin = match Url::parse(link) {
        Ok(url) => url.origin(),
        Err(_) => return PLACEHOLDER_FAVICON.to_string(),
    };

    if !origin.is_tuple() {
        return PLACEHOLDER_FAVICON.to_string();
    }

    format!(
        "{}?domain={}&sz=64",
        FAVICON_SERVICE,
        urlencoding::encode(&origin.ascii_serialization())
    )
}

/// First non-blank candidate, or an empty string
pub fn first_text<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    first_present(candidates).unwrap_or_default()
}

/// First non-blank candidate, if any
pub fn first_present<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

/// Renumber items 1..=k, ordering by the upstream rank when every item
/// carries one.
///
/// Upstream ranks may be page-global or have gaps. If any item lacks a rank
/// the arrival order is kept as-is. The sort is stable so ties preserve
/// arrival order.
pub fn assign_positions<T>(
    items: Vec<(Option<u32>, T)>,
    mut set_position: impl FnMut(&mut T, u32),
) -> Vec<T> {
    let mut items = items;
    if items.iter().all(|(rank, _)| rank.is_some()) {
        items.sort_by_key(|(rank, _)| *rank);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(idx, (_, mut item))| {
            set_position(&mut item, idx as u32 + 1);
            item
        })
        .collect()
}
