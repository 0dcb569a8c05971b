use crate::followers::{filter_followers, page_count, page_window, PAGE_SIZE};
use crate::languages::LanguageCount;
use crate::models::{Follower, Profile};

/// Where the most recent fetch sequence stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Everything the window renders, owned by the top-level controller.
///
/// `seq` identifies the newest fetch sequence. Fetch results carry the
/// sequence number they were issued under; the reducer drops results from
/// any older sequence, so the last request issued wins even when responses
/// arrive out of order.
#[derive(Debug)]
pub struct ViewState {
    pub username: String,
    pub seq: u64,
    pub status: FetchStatus,
    pub error: Option<String>,
    pub profile: Option<Profile>,
    pub followers: Option<Vec<Follower>>,
    pub languages: Vec<LanguageCount>,
    pub current_page: u32,
    pub search: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            username: String::new(),
            seq: 0,
            status: FetchStatus::Idle,
            error: None,
            profile: None,
            followers: None,
            languages: Vec::new(),
            current_page: 1,
            search: String::new(),
        }
    }
}

/// State transitions, applied through [`ViewState::apply`].
#[derive(Debug, Clone)]
pub enum Action {
    UsernameEdited(String),
    ProfileLoaded { seq: u64, profile: Profile },
    FollowersLoaded { seq: u64, followers: Vec<Follower> },
    LanguagesLoaded { seq: u64, languages: Vec<LanguageCount> },
    FetchFailed { seq: u64, message: String },
    SearchEdited(String),
    PreviousPage,
    NextPage,
}

impl ViewState {
    /// Reduces one action into the state.
    ///
    /// A fetch failure leaves everything earlier stages already committed
    /// in place; the UI keeps showing partial data next to the error.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::UsernameEdited(username) => {
                self.username = username;
                // An empty username is a no-op, not an error: whatever is
                // on screen stays on screen.
                if self.username.is_empty() {
                    return;
                }
                self.seq += 1;
                self.status = FetchStatus::Loading;
                self.error = None;
            }
            Action::ProfileLoaded { seq, profile } => {
                if seq != self.seq {
                    return;
                }
                self.profile = Some(profile);
            }
            Action::FollowersLoaded { seq, followers } => {
                if seq != self.seq {
                    return;
                }
                self.followers = Some(followers);
                self.clamp_page();
            }
            Action::LanguagesLoaded { seq, languages } => {
                if seq != self.seq {
                    return;
                }
                self.languages = languages;
                self.status = FetchStatus::Loaded;
            }
            Action::FetchFailed { seq, message } => {
                if seq != self.seq {
                    return;
                }
                self.status = FetchStatus::Failed;
                self.error = Some(message);
            }
            Action::SearchEdited(search) => {
                self.search = search;
                // The page number survives filter changes, but never
                // outside the range the filtered list supports.
                self.clamp_page();
            }
            Action::PreviousPage => {
                if self.current_page > 1 {
                    self.current_page -= 1;
                }
            }
            Action::NextPage => {
                let filtered = self.filtered_len();
                if page_window(filtered, self.current_page, PAGE_SIZE).end < filtered {
                    self.current_page += 1;
                }
            }
        }
    }

    pub fn filtered_len(&self) -> usize {
        filter_followers(self.followers.as_deref(), &self.search).len()
    }

    fn clamp_page(&mut self) {
        let pages = page_count(self.filtered_len(), PAGE_SIZE).max(1);
        self.current_page = self.current_page.clamp(1, pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(login: &str) -> Profile {
        Profile {
            login: login.to_string(),
            avatar_url: String::new(),
            name: None,
            bio: None,
            location: None,
            followers: 0,
            following: 0,
            public_repos: 0,
        }
    }

    fn followers(count: usize) -> Vec<Follower> {
        (0..count)
            .map(|i| Follower {
                id: i as u64,
                login: format!("user{i}"),
                avatar_url: String::new(),
                html_url: String::new(),
            })
            .collect()
    }

    #[test]
    fn username_edit_starts_a_new_sequence() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));

        assert_eq!(state.seq, 1);
        assert_eq!(state.status, FetchStatus::Loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn empty_username_is_a_noop() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::UsernameEdited(String::new()));

        assert_eq!(state.username, "");
        assert_eq!(state.seq, 1);
        assert_eq!(state.status, FetchStatus::Loading);
    }

    #[test]
    fn stale_sequence_results_are_discarded() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::UsernameEdited("octocats".to_string()));
        assert_eq!(state.seq, 2);

        state.apply(Action::ProfileLoaded {
            seq: 1,
            profile: profile("octocat"),
        });
        assert!(state.profile.is_none());

        state.apply(Action::ProfileLoaded {
            seq: 2,
            profile: profile("octocats"),
        });
        assert_eq!(state.profile.as_ref().unwrap().login, "octocats");
    }

    #[test]
    fn failure_keeps_already_committed_data() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::ProfileLoaded {
            seq: 1,
            profile: profile("octocat"),
        });
        state.apply(Action::FetchFailed {
            seq: 1,
            message: "Error: boom".to_string(),
        });

        assert_eq!(state.status, FetchStatus::Failed);
        assert_eq!(state.error.as_deref(), Some("Error: boom"));
        assert!(state.profile.is_some());
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::UsernameEdited("octocats".to_string()));

        state.apply(Action::FetchFailed {
            seq: 1,
            message: "Error: boom".to_string(),
        });
        assert_eq!(state.status, FetchStatus::Loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn languages_complete_the_sequence() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::LanguagesLoaded {
            seq: 1,
            languages: vec![LanguageCount {
                label: "Rust".to_string(),
                value: 2,
            }],
        });

        assert_eq!(state.status, FetchStatus::Loaded);
        assert_eq!(state.languages.len(), 1);
    }

    #[test]
    fn page_clamps_when_the_filter_narrows_the_list() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::FollowersLoaded {
            seq: 1,
            followers: followers(10),
        });
        state.apply(Action::NextPage);
        state.apply(Action::NextPage);
        assert_eq!(state.current_page, 3);

        // Only "user1" survives the filter, leaving a single page.
        state.apply(Action::SearchEdited("user1".to_string()));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn next_stops_at_the_filtered_bound() {
        let mut state = ViewState::default();
        state.apply(Action::UsernameEdited("octocat".to_string()));
        state.apply(Action::FollowersLoaded {
            seq: 1,
            followers: followers(6),
        });

        state.apply(Action::NextPage);
        assert_eq!(state.current_page, 2);
        state.apply(Action::NextPage);
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn previous_stops_at_page_one() {
        let mut state = ViewState::default();
        state.apply(Action::PreviousPage);
        assert_eq!(state.current_page, 1);
    }
}
