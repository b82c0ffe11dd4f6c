use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// One entry of an RFC 8288 `Link` header:
///   <https://acme.freshdesk.com/api/v2/tickets?page=2>; rel="next"
static LINK_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<(.+?)>;\s*rel="(.+?)""#).unwrap());

static PAGE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").unwrap());

/// Neighbouring page numbers advertised by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub next: Option<u32>,
    pub prev: Option<u32>,
}

/// Extract `next`/`prev` page numbers from a `Link` header.
/// Unknown relations and entries without a `page` query parameter are ignored.
pub fn parse_link_header(link_header: &str) -> Pagination {
    let mut pagination = Pagination::default();

    for entry in link_header.split(',') {
        let Some(caps) = LINK_ENTRY.captures(entry) else {
            continue;
        };
        let url = &caps[1];
        let rel = &caps[2];
        let Some(page) = PAGE_PARAM
            .captures(url)
            .and_then(|c| c[1].parse::<u32>().ok())
        else {
            continue;
        };

        match rel {
            "next" => pagination.next = Some(page),
            "prev" => pagination.prev = Some(page),
            other => tracing::debug!("Ignoring Link relation '{other}'"),
        }
    }

    pagination
}
