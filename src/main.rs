#![windows_subsystem = "windows"]
mod client;
mod followers;
mod languages;
mod models;
mod state;
slint::include_modules!();

use std::collections::HashMap;
use std::env;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use slint::VecModel;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::followers::{filter_followers, page_window, pagination_view, PAGE_SIZE};
use crate::languages::{aggregate_languages, LanguageCount};
use crate::state::{Action, FetchStatus, ViewState};

/// Decoded RGBA avatar data: pixels, width, height.
type AvatarPixels = (Vec<u8>, u32, u32);

/// Avatar images downloaded off the UI thread, looked up during sync.
///
/// Follower avatars are keyed by the follower's GitHub id.
#[derive(Default)]
struct AvatarStore {
    profile: Option<AvatarPixels>,
    followers: HashMap<u64, AvatarPixels>,
}

type SharedState = Arc<Mutex<ViewState>>;
type SharedAvatars = Arc<Mutex<AvatarStore>>;

fn main() -> anyhow::Result<()> {
    // Load .env variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let token: Option<String> = env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());

    // Shared HTTP client
    let http_client = client::build_client(token.as_deref())?;

    // Background tokio runtime for async HTTP
    let rt = Arc::new(tokio::runtime::Runtime::new()?);

    // Create the UI
    let app = AppWindow::new()?;

    // View state owned here, updated only through the reducer
    let view_state: SharedState = Arc::new(Mutex::new(ViewState::default()));
    let avatars: SharedAvatars = Arc::new(Mutex::new(AvatarStore::default()));

    // =============================================
    //  CALLBACK: username-edited (top search box)
    // =============================================
    {
        let app_weak = app.as_weak();
        let http_client = http_client.clone();
        let rt = rt.clone();
        let view_state = view_state.clone();
        let avatars = avatars.clone();

        app.on_username_edited(move |username| {
            let username = username.to_string();
            let seq = {
                let mut state = view_state.lock().unwrap();
                state.apply(Action::UsernameEdited(username.clone()));
                state.seq
            };

            if let Some(app) = app_weak.upgrade() {
                sync_ui(&app, &view_state.lock().unwrap(), &avatars.lock().unwrap());
            }

            if username.is_empty() {
                return;
            }

            spawn_fetch_sequence(
                &rt,
                seq,
                username,
                http_client.clone(),
                app_weak.clone(),
                view_state.clone(),
                avatars.clone(),
            );
        });
    }

    // =============================================
    //  CALLBACK: search-edited (follower filter)
    // =============================================
    {
        let app_weak = app.as_weak();
        let view_state = view_state.clone();
        let avatars = avatars.clone();

        app.on_search_edited(move |text| {
            view_state
                .lock()
                .unwrap()
                .apply(Action::SearchEdited(text.to_string()));
            if let Some(app) = app_weak.upgrade() {
                sync_ui(&app, &view_state.lock().unwrap(), &avatars.lock().unwrap());
            }
        });
    }

    // =============================================
    //  CALLBACK: previous-page / next-page
    // =============================================
    {
        let app_weak = app.as_weak();
        let view_state = view_state.clone();
        let avatars = avatars.clone();

        app.on_previous_page(move || {
            view_state.lock().unwrap().apply(Action::PreviousPage);
            if let Some(app) = app_weak.upgrade() {
                sync_ui(&app, &view_state.lock().unwrap(), &avatars.lock().unwrap());
            }
        });
    }
    {
        let app_weak = app.as_weak();
        let view_state = view_state.clone();
        let avatars = avatars.clone();

        app.on_next_page(move || {
            view_state.lock().unwrap().apply(Action::NextPage);
            if let Some(app) = app_weak.upgrade() {
                sync_ui(&app, &view_state.lock().unwrap(), &avatars.lock().unwrap());
            }
        });
    }

    // =============================================
    //  CALLBACK: open-profile
    // =============================================
    app.on_open_profile(|url| {
        let _ = open::that(url.as_str());
    });

    // Run the Slint event loop
    app.run()?;

    Ok(())
}

/// Runs one profile → followers → repositories fetch sequence on the
/// background runtime, committing each stage as it completes.
///
/// Failures are logged and reduced to a `FetchFailed` action; stages that
/// already committed stay committed.
fn spawn_fetch_sequence(
    rt: &tokio::runtime::Runtime,
    seq: u64,
    username: String,
    http_client: reqwest::Client,
    app_weak: slint::Weak<AppWindow>,
    state: SharedState,
    avatars: SharedAvatars,
) {
    rt.spawn(async move {
        // 1. Profile (plus its avatar)
        match client::fetch_profile(&http_client, &username).await {
            Ok(profile) => {
                let pixels =
                    download_avatar_pixels(&http_client, profile.avatar_url.clone(), 128).await;
                {
                    let mut state = state.lock().unwrap();
                    if state.seq == seq {
                        avatars.lock().unwrap().profile = pixels;
                    }
                    state.apply(Action::ProfileLoaded { seq, profile });
                }
                push_sync(&app_weak, &state, &avatars);
            }
            Err(err) => {
                warn!("profile fetch for {username} failed: {err:#}");
                state.lock().unwrap().apply(Action::FetchFailed {
                    seq,
                    message: format!("Error: {err}"),
                });
                push_sync(&app_weak, &state, &avatars);
                return;
            }
        }

        // 2. Followers (plus their avatar thumbnails, downloaded in parallel)
        match client::fetch_followers(&http_client, &username).await {
            Ok(followers) => {
                let mut handles = Vec::new();
                for follower in &followers {
                    let url = follower.avatar_url.clone();
                    let client = http_client.clone();
                    handles.push(tokio::spawn(async move {
                        download_avatar_pixels(&client, url, 80).await
                    }));
                }
                for (follower, handle) in followers.iter().zip(handles) {
                    if let Some(pixels) = handle.await.ok().flatten() {
                        avatars.lock().unwrap().followers.insert(follower.id, pixels);
                    }
                }

                state
                    .lock()
                    .unwrap()
                    .apply(Action::FollowersLoaded { seq, followers });
                push_sync(&app_weak, &state, &avatars);
            }
            Err(err) => {
                warn!("follower fetch for {username} failed: {err:#}");
                state.lock().unwrap().apply(Action::FetchFailed {
                    seq,
                    message: format!("Error: {err}"),
                });
                push_sync(&app_weak, &state, &avatars);
                return;
            }
        }

        // 3. Repositories → language distribution
        match client::fetch_repositories(&http_client, &username).await {
            Ok(repos) => {
                let languages = aggregate_languages(&repos);
                state
                    .lock()
                    .unwrap()
                    .apply(Action::LanguagesLoaded { seq, languages });
            }
            Err(err) => {
                warn!("repository fetch for {username} failed: {err:#}");
                state.lock().unwrap().apply(Action::FetchFailed {
                    seq,
                    message: format!("Error: {err}"),
                });
            }
        }
        push_sync(&app_weak, &state, &avatars);
    });
}

/// Schedules a UI refresh on the Slint event loop.
fn push_sync(app_weak: &slint::Weak<AppWindow>, state: &SharedState, avatars: &SharedAvatars) {
    let app_weak = app_weak.clone();
    let state = state.clone();
    let avatars = avatars.clone();
    let _ = slint::invoke_from_event_loop(move || {
        if let Some(app) = app_weak.upgrade() {
            sync_ui(&app, &state.lock().unwrap(), &avatars.lock().unwrap());
        }
    });
}

/// Maps the view state onto the window's properties.
fn sync_ui(app: &AppWindow, state: &ViewState, avatars: &AvatarStore) {
    app.set_is_loading(state.status == FetchStatus::Loading);
    app.set_error_message(state.error.clone().unwrap_or_default().into());

    // Profile card and stat cards
    app.set_has_profile(state.profile.is_some());
    if let Some(profile) = &state.profile {
        app.set_login_name(profile.login.clone().into());
        app.set_display_name(text_or_not_found(profile.name.as_deref()));
        app.set_bio(text_or_not_found(profile.bio.as_deref()));
        app.set_location(text_or_not_found(profile.location.as_deref()));
        app.set_followers_count(profile.followers.to_string().into());
        app.set_following_count(profile.following.to_string().into());
        app.set_repos_count(profile.public_repos.to_string().into());
        app.set_avatar(
            avatars
                .profile
                .as_ref()
                .map(image_from_pixels)
                .unwrap_or_default(),
        );
    }

    // Follower table: filter, then slice the current page window
    let filtered = filter_followers(state.followers.as_deref(), &state.search);
    let window = page_window(filtered.len(), state.current_page, PAGE_SIZE);
    let rows: Vec<FollowerRow> = filtered[window]
        .iter()
        .map(|follower| FollowerRow {
            login: follower.login.clone().into(),
            avatar: avatars
                .followers
                .get(&follower.id)
                .map(image_from_pixels)
                .unwrap_or_default(),
            profile_url: follower.html_url.clone().into(),
        })
        .collect();
    app.set_table_visible(!filtered.is_empty());
    app.set_follower_page(Rc::new(VecModel::from(rows)).into());

    // Pagination bar
    let total = state.followers.as_deref().map_or(0, |f| f.len());
    let view = pagination_view(total, filtered.len(), state.current_page, PAGE_SIZE);
    app.set_pagination_visible(view.visible);
    app.set_prev_enabled(view.prev_enabled);
    app.set_next_enabled(view.next_enabled);
    app.set_page_label(format!("Page {}", state.current_page).into());

    // Language pie chart
    app.set_chart_visible(!state.languages.is_empty());
    app.set_language_slices(Rc::new(VecModel::from(language_slices(&state.languages))).into());
}

fn text_or_not_found(value: Option<&str>) -> slint::SharedString {
    match value {
        Some(text) if !text.is_empty() => text.into(),
        _ => "Not Found".into(),
    }
}

fn image_from_pixels(pixels: &AvatarPixels) -> slint::Image {
    let (data, width, height) = pixels;
    let buffer =
        slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(data, *width, *height);
    slint::Image::from_rgba8(buffer)
}

const PIE_PALETTE: [(u8, u8, u8); 8] = [
    (0x33, 0x66, 0xcc), // blue
    (0xdc, 0x39, 0x12), // red
    (0xff, 0x99, 0x00), // orange
    (0x10, 0x96, 0x18), // green
    (0x99, 0x00, 0x99), // purple
    (0x00, 0x99, 0xc6), // teal
    (0xdd, 0x44, 0x77), // pink
    (0x66, 0xaa, 0x00), // lime
];

/// Turns the language distribution into pie slices for the chart.
fn language_slices(languages: &[LanguageCount]) -> Vec<LanguageSlice> {
    let total: u32 = languages.iter().map(|l| l.value).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(languages.len());
    let mut angle = -std::f32::consts::FRAC_PI_2;
    for (i, language) in languages.iter().enumerate() {
        let sweep = language.value as f32 / total as f32 * std::f32::consts::TAU;
        let (r, g, b) = PIE_PALETTE[i % PIE_PALETTE.len()];
        slices.push(LanguageSlice {
            label: language.label.clone().into(),
            value: language.value as i32,
            color: slint::Color::from_rgb_u8(r, g, b),
            commands: pie_slice_commands(angle, angle + sweep).into(),
        });
        angle += sweep;
    }
    slices
}

/// Builds the SVG path for one pie slice in a 100x100 viewbox.
fn pie_slice_commands(start: f32, end: f32) -> String {
    const CX: f32 = 50.0;
    const CY: f32 = 50.0;
    const R: f32 = 45.0;

    // A single language owns the whole pie: an SVG arc cannot span a full
    // turn, so draw the circle as two half arcs instead.
    if end - start >= std::f32::consts::TAU - 1e-4 {
        return format!(
            "M {CX} {top} A {R} {R} 0 1 1 {CX} {bottom} A {R} {R} 0 1 1 {CX} {top} Z",
            top = CY - R,
            bottom = CY + R,
        );
    }

    let (x0, y0) = (CX + R * start.cos(), CY + R * start.sin());
    let (x1, y1) = (CX + R * end.cos(), CY + R * end.sin());
    let large_arc = i32::from(end - start > std::f32::consts::PI);
    format!("M {CX} {CY} L {x0:.2} {y0:.2} A {R} {R} 0 {large_arc} 1 {x1:.2} {y1:.2} Z")
}

/// Downloads avatar image bytes and decodes them into raw RGBA pixels.
///
/// Any failure degrades to `None`; a missing avatar renders as a blank
/// image, never an error.
async fn download_avatar_pixels(
    client: &reqwest::Client,
    url: String,
    size: u32,
) -> Option<AvatarPixels> {
    // Ask GitHub for a thumbnail-sized image
    let sized_url = if url.contains('?') {
        format!("{url}&s={size}")
    } else {
        format!("{url}?s={size}")
    };

    let bytes = client.get(&sized_url).send().await.ok()?.bytes().await.ok()?;
    let decoded = image::load_from_memory(&bytes).ok()?;

    // GitHub often serves a larger image than requested for cached
    // avatars; resize so the pixel buffers stay small.
    let resized = decoded.thumbnail_exact(size, size);
    let rgba = resized.to_rgba8();
    let (width, height) = rgba.dimensions();

    Some((rgba.into_raw(), width, height))
}
