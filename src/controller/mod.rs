//! Query controller
//!
//! Owns the user-visible search state (text, locale, tab, page) and decides
//! when a query is dispatched. Each transition builds a fresh
//! [`CanonicalQuery`] tagged with a sequence number; completions carrying a
//! superseded sequence number are dropped so a late response can never
//! overwrite a newer one.

mod dispatch;

pub use dispatch::{Dispatcher, RemoteDispatcher};

use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::query::{CanonicalQuery, ResultKind};
use crate::results::SearchResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result tab shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Images,
}

impl Tab {
    /// Parse a tab name; anything other than `images` is the `all` tab
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("images") {
            Self::Images
        } else {
            Self::All
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Images => "images",
        }
    }

    /// Result kind requested while this tab is active
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::All => ResultKind::Web,
            Self::Images => ResultKind::Image,
        }
    }
}

/// Mutable search state. Only changed through controller transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub text: String,
    pub language: String,
    pub region: String,
    pub tab: Tab,
    pub page_number: u32,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            text: String::new(),
            language: "en".to_string(),
            region: "us".to_string(),
            tab: Tab::All,
            page_number: 1,
        }
    }
}

/// One query to send, bound to the sequence number it must complete with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub seq: u64,
    pub query: CanonicalQuery,
}

/// What the user currently sees
#[derive(Debug, Clone, Default)]
pub struct View {
    /// Latest successful response
    pub response: Option<SearchResponse>,
    /// Failure of the latest completed dispatch, shown next to the response
    pub error: Option<SearchError>,
}

/// Page-fullness heuristic for "more pages likely exist".
///
/// Neither upstream reports a total, so a full page is taken as a hint that
/// another one follows. This is an approximation: a result set whose size is
/// an exact multiple of the page size shows one empty trailing page.
pub fn more_pages_likely(count: usize, page_size: u32) -> bool {
    page_size > 0 && count == page_size as usize
}

/// Sans-IO controller driving the aggregator
#[derive(Debug, Clone)]
pub struct QueryController {
    state: ControllerState,
    web_page_size: u32,
    image_page_size: u32,
    last_seq: u64,
    view: View,
}

impl QueryController {
    /// Create a controller with the deployment's defaults
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            state: ControllerState {
                language: settings.default_language.clone(),
                region: settings.default_region.clone(),
                ..ControllerState::default()
            },
            web_page_size: settings.web.default_page_size,
            image_page_size: settings.images.default_page_size,
            last_seq: 0,
            view: View::default(),
        }
    }

    /// Replace the state wholesale, e.g. from request parameters
    pub fn restore(&mut self, mut state: ControllerState) {
        state.text = state.text.trim().to_string();
        state.page_number = state.page_number.max(1);
        self.state = state;
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Sequence number of the most recent dispatch, 0 before the first
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    fn page_size(&self) -> u32 {
        match self.state.tab {
            Tab::All => self.web_page_size,
            Tab::Images => self.image_page_size,
        }
    }

    /// Build the query for the current state
    pub fn current_query(&self) -> CanonicalQuery {
        CanonicalQuery::new(&self.state.text)
            .with_language(self.state.language.clone())
            .with_region(self.state.region.clone())
            .with_page_size(self.page_size())
            .with_page(self.state.page_number)
            .with_kind(self.state.tab.kind())
    }

    fn dispatch(&mut self) -> Option<Dispatch> {
        if self.state.text.is_empty() {
            return None;
        }
        self.last_seq += 1;
        Some(Dispatch {
            seq: self.last_seq,
            query: self.current_query(),
        })
    }

    /// Dispatch the current state as-is
    pub fn refresh(&mut self) -> Option<Dispatch> {
        self.dispatch()
    }

    /// Submit new query text. Empty text records an error and sends nothing.
    pub fn submit(&mut self, text: &str) -> Option<Dispatch> {
        let text = text.trim();
        if text.is_empty() {
            self.view.error = Some(SearchError::InvalidQuery);
            return None;
        }
        self.state.text = text.to_string();
        self.state.page_number = 1;
        self.dispatch()
    }

    /// Switch tab and restart from page 1
    pub fn change_tab(&mut self, tab: Tab) -> Option<Dispatch> {
        self.state.tab = tab;
        self.state.page_number = 1;
        self.dispatch()
    }

    /// Change language and region, keeping text and page
    pub fn change_locale(
        &mut self,
        language: impl Into<String>,
        region: impl Into<String>,
    ) -> Option<Dispatch> {
        self.state.language = language.into();
        self.state.region = region.into();
        self.dispatch()
    }

    /// Jump to `page`. Pages below 1 are ignored.
    pub fn go_to_page(&mut self, page: u32) -> Option<Dispatch> {
        if page < 1 {
            return None;
        }
        self.state.page_number = page;
        self.dispatch()
    }

    pub fn next_page(&mut self) -> Option<Dispatch> {
        self.go_to_page(self.state.page_number.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<Dispatch> {
        self.go_to_page(self.state.page_number.saturating_sub(1))
    }

    /// Apply the outcome of dispatch `seq`.
    ///
    /// Returns `false` and leaves the view untouched when `seq` has been
    /// superseded or was never issued. A failure keeps the previous response
    /// on screen.
    pub fn complete(&mut self, seq: u64, outcome: Result<SearchResponse, SearchError>) -> bool {
        if seq == 0 || seq != self.last_seq {
            debug!("Discarding stale response #{} (latest #{})", seq, self.last_seq);
            return false;
        }
        match outcome {
            Ok(response) => {
                self.view.response = Some(response);
                self.view.error = None;
            }
            Err(e) => {
                self.view.error = Some(e);
            }
        }
        true
    }

    /// Send one dispatch and apply its outcome
    pub async fn run(&mut self, dispatch: Dispatch, dispatcher: &dyn Dispatcher) -> bool {
        let outcome = dispatcher.dispatch(dispatch.query).await;
        self.complete(dispatch.seq, outcome)
    }

    /// Whether a next page is likely, judged from the latest response
    pub fn has_more(&self) -> bool {
        self.view
            .response
            .as_ref()
            .map(|r| more_pages_likely(r.result_count(), r.query.page_size))
            .unwrap_or(false)
    }

    pub fn has_previous(&self) -> bool {
        self.state.page_number > 1
    }
}
