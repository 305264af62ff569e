pub mod extract;
pub mod store;

pub use extract::{extract_from_browser, Browser, CookieSource, JsonExport};
pub use store::{validate_cookies, CookieProfile, CookieStore};
