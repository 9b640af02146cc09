//! Browser identities and accept headers.
//!
//! Search providers serve a bot-detection page to anything that does not look
//! like a desktop browser, so each engine pins one of these strings.

/// Chrome 122 on Linux
pub const CHROME_LINUX: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Chrome 91 on Windows 10
pub const CHROME_WINDOWS: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// User agent for full-page fetches
pub fn page_user_agent() -> &'static str {
    CHROME_LINUX
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
}

/// Standard accept-language header
pub fn accept_language(lang: &str) -> String {
    match lang {
        "" | "all" | "en" => "en-US,en;q=0.5".to_string(),
        "zh" => "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
        other => format!("{},en-US;q=0.9,en;q=0.8", other),
    }
}
