use log::debug;
use regex::Regex;
use url::Url;

lazy_static::lazy_static! {
    static ref MARKUP_TAG: Regex = Regex::new(r"<.*?>").expect("markup pattern is valid");
}

/// Removes HTML-like tags such as the `<b>` highlights the provider adds.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

pub fn mask_api_key(key: &str) -> String {
    let length = key.chars().count();
    if length > 5 {
        let prefix: String = key.chars().take(5).collect();
        format!("{}{}", prefix, "*".repeat(length - 5))
    } else {
        "*".repeat(length)
    }
}

/// Returns the link only if it is an absolute http(s) URL.
pub fn detail_link(link: &str) -> Option<String> {
    match Url::parse(link) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url.to_string()),
        Ok(url) => {
            debug!("Ignoring link with unsupported scheme: {}", url.scheme());
            None
        }
        Err(e) => {
            debug!("Ignoring invalid link {:?}: {}", link, e);
            None
        }
    }
}
