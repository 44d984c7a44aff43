//! Tools module - the toolkits agents call into.
//!
//! - Search: Serper web search
//! - Time: current local time for a city
//! - Capital: capital city lookup
//! - Page: visible text of a web page

pub mod capital;
pub mod page;
pub mod search;
pub mod time;

#[cfg(test)]
mod test_server;

pub use capital::{capital_city, capital_of, capital_toolkit};
pub use page::{html_to_text, page_toolkit, PageReader, PageText};
pub use search::{
    parse_search_results, search_toolkit, ReqwestTransport, SearchClient, SearchResponse,
    SearchResult, SearchTransport,
};
pub use time::{
    find_time_zone, normalize_location_name, time_toolkit, Clock, FixedClock,
    LocationTimeResolver, SystemClock,
};
