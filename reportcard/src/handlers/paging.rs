//! Pagination headers for list responses
//!
//! A list response carries its records as a plain JSON array; paging
//! metadata travels in headers:
//!
//! ```text
//! X-Total-Count: 45
//! X-Total-Pages: 3
//! Link: </api/classes?page=2&size=20>; rel="next",</api/classes?page=0&size=20>; rel="prev",...
//! ```
//!
//! Link entries come in the order `next`, `prev`, `last`, `first`, `self`.
//! `next` and `prev` are only present when such a page exists; `last` points
//! at page 0 for an empty collection.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, LINK};

use crate::repository::Page;

pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
pub const X_TOTAL_PAGES: HeaderName = HeaderName::from_static("x-total-pages");

/// Build the paging headers for `page`, linking relative to `base_path`.
pub fn pagination_headers<T>(page: &Page<T>, base_path: &str) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(page.total_elements));
    headers.insert(X_TOTAL_PAGES, HeaderValue::from(page.total_pages()));

    let link = link_value(page, base_path);
    match HeaderValue::from_str(&link) {
        Ok(value) => {
            headers.insert(LINK, value);
        }
        Err(_) => tracing::warn!(base_path, "Base path cannot be encoded in a Link header"),
    }
    headers
}

fn link_value<T>(page: &Page<T>, base_path: &str) -> String {
    let entry = |number: u64, rel: &str| {
        format!(
            "<{}?page={}&size={}>; rel=\"{}\"",
            base_path, number, page.size, rel
        )
    };

    let mut links = Vec::with_capacity(5);
    if page.has_next() {
        links.push(entry(page.number + 1, "next"));
    }
    if page.has_previous() {
        links.push(entry(page.number - 1, "prev"));
    }
    links.push(entry(page.total_pages().saturating_sub(1), "last"));
    links.push(entry(0, "first"));
    links.push(entry(page.number, "self"));
    links.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::PageRequest;

    fn page(number: u64, size: u64, total: u64) -> Page<()> {
        Page::new(vec![], &PageRequest::new(number, size), total)
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
        headers.get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_middle_page_has_every_link() {
        let headers = pagination_headers(&page(1, 20, 45), "/api/classes");

        assert_eq!(header(&headers, "X-Total-Count"), "45");
        assert_eq!(header(&headers, "X-Total-Pages"), "3");
        assert_eq!(
            header(&headers, "link"),
            "</api/classes?page=2&size=20>; rel=\"next\",\
             </api/classes?page=0&size=20>; rel=\"prev\",\
             </api/classes?page=2&size=20>; rel=\"last\",\
             </api/classes?page=0&size=20>; rel=\"first\",\
             </api/classes?page=1&size=20>; rel=\"self\""
        );
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let headers = pagination_headers(&page(0, 10, 25), "/api/matieres");
        let link = header(&headers, "link");
        assert!(link.starts_with("</api/matieres?page=1&size=10>; rel=\"next\","));
        assert!(!link.contains("rel=\"prev\""));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let headers = pagination_headers(&page(2, 10, 25), "/api/matieres");
        let link = header(&headers, "link");
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("</api/matieres?page=1&size=10>; rel=\"prev\""));
        assert!(link.contains("</api/matieres?page=2&size=10>; rel=\"last\""));
    }

    #[test]
    fn test_empty_collection() {
        let headers = pagination_headers(&page(0, 20, 0), "/api/eleves");
        assert_eq!(header(&headers, "x-total-count"), "0");
        assert_eq!(header(&headers, "x-total-pages"), "0");
        assert_eq!(
            header(&headers, "link"),
            "</api/eleves?page=0&size=20>; rel=\"last\",\
             </api/eleves?page=0&size=20>; rel=\"first\",\
             </api/eleves?page=0&size=20>; rel=\"self\""
        );
    }

    #[test]
    fn test_page_past_the_end_links_back() {
        let headers = pagination_headers(&page(9, 10, 25), "/api/eleves");
        let link = header(&headers, "link");
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("</api/eleves?page=8&size=10>; rel=\"prev\""));
        assert!(link.contains("</api/eleves?page=2&size=10>; rel=\"last\""));
    }
}
