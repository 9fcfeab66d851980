use log::{debug, error, info, warn};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::preferences::{Cuisine, Preferences, PreferencesUpdate, Profile, MAX_SPICY_LEVEL};
use crate::query::search_query;
use crate::records::{group_by_profile, Record, RecordStore};
use crate::search::{PlaceResult, SearchClient};
use crate::session::{lock, SharedSession};
use crate::utils::detail_link;

pub const NO_PROFILE_WARNING: &str = "먼저 맛 프로필을 생성해주세요!";
pub const MISSING_LOCATION_WARNING: &str = "지역을 입력하세요";
pub const PROFILE_SAVED: &str = "맛 프로필이 성공적으로 저장되었습니다! 🎉";
pub const RESULTS_SAVED: &str = "추천 결과가 기록되었습니다!";
pub const LINK_NOTICE: &str = "⚠️ 상세보기 링크는 실제 운영 링크와 다를 수 있습니다.";
pub const NO_RECORDS: &str = "아직 기록된 내용이 없습니다.";

/// Serialized ids match the names `Screen::from_str` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[serde(rename = "profile")]
    #[strum(to_string = "맛 프로필", serialize = "profile")]
    ProfileBuilder,
    #[strum(to_string = "지역 검색", serialize = "search")]
    Search,
    #[strum(to_string = "기록", serialize = "history")]
    History,
}

#[derive(Debug, Serialize)]
pub struct MenuEntry {
    pub screen: Screen,
    pub label: String,
}

pub fn menu() -> Vec<MenuEntry> {
    Screen::iter()
        .map(|screen| MenuEntry {
            screen,
            label: screen.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum Action {
    Open(Screen),
    EditPreferences(PreferencesUpdate),
    FinalizeProfile { title: String },
    Search { profile: String, location: String },
}

impl Action {
    pub fn needs_session(&self) -> bool {
        !matches!(self, Action::Open(Screen::History))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceView {
    pub title: String,
    pub address: String,
    pub link: Option<String>,
    pub display: String,
}

impl PlaceView {
    fn new(title: &str, address: &str, link: &str) -> Self {
        Self {
            title: title.to_string(),
            address: address.to_string(),
            link: detail_link(link),
            display: format!("**{}** - {} ([상세보기]({}))", title, address, link),
        }
    }
}

impl From<&PlaceResult> for PlaceView {
    fn from(place: &PlaceResult) -> Self {
        Self::new(&place.title, &place.address, &place.link)
    }
}

impl From<&Record> for PlaceView {
    fn from(record: &Record) -> Self {
        Self::new(&record.title, &record.address, &record.link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryGroup {
    pub profile: String,
    pub records: Vec<PlaceView>,
}

/// What a screen shows after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    ProfileBuilder {
        preferences: Preferences,
        max_spicy_level: u8,
        cuisines: Vec<Cuisine>,
        profiles: Vec<Profile>,
    },
    ProfileSaved {
        profile: Profile,
        message: String,
    },
    SearchForm {
        profiles: Vec<String>,
    },
    SearchResults {
        profile: String,
        query: String,
        notice: String,
        places: Vec<PlaceView>,
        message: String,
    },
    History {
        groups: Vec<HistoryGroup>,
    },
    Empty {
        message: String,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
    },
}

impl View {
    fn warning(message: &str) -> Self {
        View::Warning {
            message: message.to_string(),
        }
    }

    fn error(error: impl std::fmt::Display) -> Self {
        View::Error {
            message: format!("오류 발생: {}", error),
        }
    }
}

/// Wires screen actions to the search provider and the record file.
#[derive(Debug, Clone)]
pub struct Controller {
    search: SearchClient,
    records: RecordStore,
}

impl Controller {
    pub fn new(search: SearchClient, records: RecordStore) -> Self {
        Self { search, records }
    }

    /// Runs one action against `session`. Errors end up in the returned view;
    /// nothing here fails the caller.
    pub async fn dispatch(&self, session: &SharedSession, action: Action) -> View {
        debug!("Dispatching action: {:?}", action);
        match action {
            Action::Open(Screen::ProfileBuilder) => profile_builder(session),
            Action::Open(Screen::Search) => search_form(session),
            Action::Open(Screen::History) => self.history(),
            Action::EditPreferences(update) => {
                lock(session).preferences.apply(update);
                profile_builder(session)
            }
            Action::FinalizeProfile { title } => {
                let profile = lock(session).finalize_profile(&title);
                info!("Profile finalized: {} ({})", profile.title, profile.preferences);
                View::ProfileSaved {
                    profile,
                    message: PROFILE_SAVED.to_string(),
                }
            }
            Action::Search { profile, location } => self.search(session, &profile, &location).await,
        }
    }

    async fn search(&self, session: &SharedSession, title: &str, location: &str) -> View {
        // Copy what the search needs so the lock is released before the request.
        let (profile, query) = {
            let session = lock(session);
            if !session.has_profiles() {
                warn!("Search requested without any profile");
                return View::warning(NO_PROFILE_WARNING);
            }
            let Some(profile) = session.find_profile(title).cloned() else {
                warn!("Search requested for unknown profile: {}", title);
                return View::warning(&format!("프로필을 찾을 수 없습니다: {}", title));
            };
            if location.trim().is_empty() {
                return View::warning(MISSING_LOCATION_WARNING);
            }
            // The spice wording comes from the live preferences, not from the
            // selected profile, so the two can disagree after an edit.
            (profile, search_query(location, &session.preferences))
        };

        let places = match self.search.search(&query).await {
            Ok(places) => places,
            Err(e) => {
                error!("Search failed for {:?}: {}", query, e);
                return View::error(e);
            }
        };

        let mut records = match self.records.load() {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load records: {}", e);
                return View::error(e);
            }
        };
        records.extend(places.iter().map(|place| Record {
            profile: profile.preferences.clone(),
            title: place.title.clone(),
            address: place.address.clone(),
            link: place.link.clone(),
        }));
        if let Err(e) = self.records.save(&records) {
            error!("Failed to save records: {}", e);
            return View::error(e);
        }

        View::SearchResults {
            profile: profile.preferences,
            query,
            notice: LINK_NOTICE.to_string(),
            places: places.iter().map(PlaceView::from).collect(),
            message: RESULTS_SAVED.to_string(),
        }
    }

    /// History reads only the record file, so it needs no session.
    pub fn history(&self) -> View {
        debug!("Loading history from {}", self.records.path().display());
        let records = match self.records.load() {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load records: {}", e);
                return View::error(e);
            }
        };
        if records.is_empty() {
            return View::Empty {
                message: NO_RECORDS.to_string(),
            };
        }

        let groups = group_by_profile(records)
            .into_iter()
            .map(|(profile, records)| HistoryGroup {
                profile,
                records: records.iter().map(PlaceView::from).collect(),
            })
            .collect();
        View::History { groups }
    }
}

fn profile_builder(session: &SharedSession) -> View {
    let session = lock(session);
    View::ProfileBuilder {
        preferences: session.preferences,
        max_spicy_level: MAX_SPICY_LEVEL,
        cuisines: Cuisine::iter().collect(),
        profiles: session.profiles.clone(),
    }
}

fn search_form(session: &SharedSession) -> View {
    let session = lock(session);
    if !session.has_profiles() {
        return View::warning(NO_PROFILE_WARNING);
    }
    View::SearchForm {
        profiles: session.profiles.iter().map(|p| p.title.clone()).collect(),
    }
}
