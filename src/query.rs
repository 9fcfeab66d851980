use crate::preferences::{Cuisine, Preferences, SpicyLevel};

pub const MILD: &str = "맵지 않은";
pub const SPICY: &str = "매운";
pub const MEDIUM: &str = "적당한 매운맛";
pub const QUERY_SUFFIX: &str = "맛집";

/// Where a spice description ends up. The middle of the scale is only
/// spelled out on profile labels; search queries leave it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiceContext {
    ProfileLabel,
    SearchQuery,
}

pub fn spice_description(level: SpicyLevel, context: SpiceContext) -> &'static str {
    match level.get() {
        level if level <= 3 => MILD,
        level if level >= 7 => SPICY,
        _ => match context {
            SpiceContext::ProfileLabel => MEDIUM,
            SpiceContext::SearchQuery => "",
        },
    }
}

/// Human readable label stored on a finalized profile, e.g. `매운 한식`.
pub fn describe(preferences: &Preferences) -> String {
    format!(
        "{} {}",
        spice_description(preferences.spicy_level, SpiceContext::ProfileLabel),
        preferences.cuisine
    )
}

pub fn build_query(location: &str, spicy_description: &str, cuisine: Cuisine) -> String {
    format!("{} {} {} {}", location, spicy_description, cuisine, QUERY_SUFFIX)
}

/// Query for the search screen, derived from the preferences being edited.
pub fn search_query(location: &str, preferences: &Preferences) -> String {
    let spicy = spice_description(preferences.spicy_level, SpiceContext::SearchQuery);
    build_query(location, spicy, preferences.cuisine)
}
