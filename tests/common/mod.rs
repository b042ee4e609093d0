//! Common fixtures for the integration suites
//!
//! Provides a canned two-book catalog in the payload shapes the pipeline's
//! page scripts produce: an anchor array for the listing page, a price
//! string for each detail page.

use pricewatch::StaticBrowser;
use serde_json::{json, Value};

pub const LISTING_URL: &str = "http://catalog.test/catalogue/index.html";
pub const ATTIC_DETAIL_URL: &str = "http://catalog.test/catalogue/a-light-in-the-attic.html";
pub const DRACULA_DETAIL_URL: &str = "http://catalog.test/catalogue/dracula.html";

pub const ATTIC_TITLE: &str = "A Light in the Attic";
pub const ATTIC_PRICE_TEXT: &str = "£51.77";

/// Listing anchors, document order.
pub fn listing_payload() -> Value {
    json!([
        { "text": ATTIC_TITLE, "title": ATTIC_TITLE, "href": ATTIC_DETAIL_URL },
        { "text": "Dracula", "title": "Dracula", "href": DRACULA_DETAIL_URL },
    ])
}

/// The standard catalog: both books listed, both detail pages priced.
pub fn catalog_browser() -> StaticBrowser {
    StaticBrowser::new()
        .with_page(LISTING_URL, listing_payload())
        .with_page(ATTIC_DETAIL_URL, json!(ATTIC_PRICE_TEXT))
        .with_page(DRACULA_DETAIL_URL, json!("£19.99"))
}

/// A catalog whose attic detail page carries blank price text.
pub fn blank_price_browser() -> StaticBrowser {
    StaticBrowser::new()
        .with_page(LISTING_URL, listing_payload())
        .with_page(ATTIC_DETAIL_URL, json!("   "))
}
