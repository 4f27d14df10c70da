// src/main.rs — Activity Board (Rust + Yew + WASM)
// Front-end for the school activity sign-up API:
// - loads the activity list and renders cards + the signup dropdown
// - signs a student up (POST) and unregisters one (DELETE)
// - shows a transient success/error banner, auto-hidden after 5 s

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::Deserialize;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const MESSAGE_HIDE_MS: u32 = 5_000;

const LOAD_FAILED: &str = "Failed to load activities. Please try again later.";
const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
const REMOVE_FAILED: &str = "Failed to remove participant. Please try again.";

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct ActivityDetails {
    description: String,
    schedule: String,
    // Signed so "spots left" can go negative when the server over-books;
    // it is displayed as-is, never clamped.
    max_participants: i64,
    participants: Vec<String>,
}

// GET /activities returns a JSON object keyed by activity name.
// BTreeMap keeps the render order deterministic.
type ActivityMap = BTreeMap<String, ActivityDetails>;

// Body of the signup/unregister endpoints: `message` on 2xx,
// `detail` (or `message` for DELETE) on error statuses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
struct ApiMessage {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
struct Banner {
    text: String,
    kind: BannerKind,
}

// ---------- DOM-free helpers ----------

fn spots_left(details: &ActivityDetails) -> i64 {
    details.max_participants - details.participants.len() as i64
}

// One- or two-letter badge from a name or email: "Ada Lovelace" -> "AL",
// "ada@example.com" -> "A", empty -> "".
fn initials(who: &str) -> String {
    let parts: Vec<&str> = who.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [single] => {
            let local = single.split('@').next().unwrap_or_default();
            local
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default()
        }
        [first, .., last] => {
            let mut out = String::new();
            if let Some(c) = first.chars().next() {
                out.extend(c.to_uppercase());
            }
            if let Some(c) = last.chars().next() {
                out.extend(c.to_uppercase());
            }
            out
        }
    }
}

// Shared by POST (signup) and DELETE (unregister).
fn signup_url(activity: &str, email: &str) -> String {
    format!(
        "/activities/{}/signup?email={}",
        urlencoding::encode(activity),
        urlencoding::encode(email)
    )
}

fn signup_error_text(body: &ApiMessage) -> String {
    body.detail
        .clone()
        .unwrap_or_else(|| "An error occurred".to_string())
}

fn removal_error_text(body: &ApiMessage) -> String {
    body.detail
        .clone()
        .or_else(|| body.message.clone())
        .unwrap_or_else(|| "Failed to remove participant".to_string())
}

// ---------- banner auto-hide ----------

type HideTimer = Rc<RefCell<Option<Timeout>>>;

// Replacing the stored Timeout drops (and thereby cancels) the previous
// one, so a newer banner always gets its full 5 s on screen.
fn show_banner(
    banner: &UseStateHandle<Option<Banner>>,
    timer: &HideTimer,
    text: String,
    kind: BannerKind,
) {
    banner.set(Some(Banner { text, kind }));
    let banner = banner.clone();
    let hide = Timeout::new(MESSAGE_HIDE_MS, move || banner.set(None));
    *timer.borrow_mut() = Some(hide);
}

// ---------- app ----------

#[function_component(App)]
fn app() -> Html {
    // Last successfully loaded collection. Kept across a failed refresh so
    // the dropdown holds its options even while the gallery shows the
    // failure line (same behavior the API's stock front-end had).
    let activities = use_state(|| None::<ActivityMap>);
    let load_failed = use_state(|| false);

    // Form state (controlled inputs).
    let email = use_state(String::new);
    let activity = use_state(String::new);

    // Transient message + its pending hide timer.
    let banner = use_state(|| None::<Banner>);
    let hide_timer: HideTimer = use_mut_ref(|| None);

    // Overlapping refreshes resolve last-write-wins: every call bumps the
    // generation and stale responses are dropped.
    let refresh_gen = use_mut_ref(|| 0u32);

    let refresh = {
        let activities = activities.clone();
        let load_failed = load_failed.clone();
        let refresh_gen = refresh_gen.clone();

        Callback::from(move |_: ()| {
            let activities = activities.clone();
            let load_failed = load_failed.clone();
            let refresh_gen = refresh_gen.clone();

            let my_gen = {
                let mut g = refresh_gen.borrow_mut();
                *g = g.wrapping_add(1);
                *g
            };

            spawn_local(async move {
                let result = match Request::get("/activities").send().await {
                    Ok(resp) => resp.json::<ActivityMap>().await,
                    Err(e) => Err(e),
                };

                if *refresh_gen.borrow() != my_gen {
                    return; // stale response, a newer refresh is in flight
                }

                match result {
                    Ok(map) => {
                        activities.set(Some(map));
                        load_failed.set(false);
                    }
                    Err(e) => {
                        load_failed.set(true);
                        gloo::console::error!(format!("Error fetching activities: {e}"));
                    }
                }
            });
        })
    };

    // Load once on first render.
    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_activity_change = {
        let activity = activity.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            activity.set(select.value());
        })
    };

    let on_signup = {
        let email = email.clone();
        let activity = activity.clone();
        let banner = banner.clone();
        let hide_timer = hide_timer.clone();
        let refresh = refresh.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let email_value = (*email).clone();
            let activity_value = (*activity).clone();
            let email = email.clone();
            let activity = activity.clone();
            let banner = banner.clone();
            let hide_timer = hide_timer.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                let url = signup_url(&activity_value, &email_value);
                match Request::post(&url).send().await {
                    Ok(resp) => {
                        let ok = resp.ok();
                        match resp.json::<ApiMessage>().await {
                            Ok(body) if ok => {
                                show_banner(
                                    &banner,
                                    &hide_timer,
                                    body.message.unwrap_or_default(),
                                    BannerKind::Success,
                                );
                                email.set(String::new());
                                activity.set(String::new());
                                refresh.emit(());
                            }
                            Ok(body) => {
                                show_banner(
                                    &banner,
                                    &hide_timer,
                                    signup_error_text(&body),
                                    BannerKind::Error,
                                );
                            }
                            Err(e) => {
                                show_banner(
                                    &banner,
                                    &hide_timer,
                                    SIGNUP_FAILED.to_string(),
                                    BannerKind::Error,
                                );
                                gloo::console::error!(format!("Error signing up: {e}"));
                            }
                        }
                    }
                    Err(e) => {
                        show_banner(
                            &banner,
                            &hide_timer,
                            SIGNUP_FAILED.to_string(),
                            BannerKind::Error,
                        );
                        gloo::console::error!(format!("Error signing up: {e}"));
                    }
                }
            });
        })
    };

    // One handler for every remove button; each row emits its own
    // (activity, email) identity.
    let on_remove = {
        let banner = banner.clone();
        let hide_timer = hide_timer.clone();
        let refresh = refresh.clone();

        Callback::from(move |(activity_name, participant): (String, String)| {
            let prompt = format!("Unregister {participant} from {activity_name}?");
            if !gloo::dialogs::confirm(&prompt) {
                return;
            }

            let banner = banner.clone();
            let hide_timer = hide_timer.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                let url = signup_url(&activity_name, &participant);
                match Request::delete(&url).send().await {
                    Ok(resp) => {
                        let ok = resp.ok();
                        match resp.json::<ApiMessage>().await {
                            Ok(_) if ok => refresh.emit(()),
                            Ok(body) => {
                                show_banner(
                                    &banner,
                                    &hide_timer,
                                    removal_error_text(&body),
                                    BannerKind::Error,
                                );
                            }
                            Err(e) => {
                                show_banner(
                                    &banner,
                                    &hide_timer,
                                    REMOVE_FAILED.to_string(),
                                    BannerKind::Error,
                                );
                                gloo::console::error!(format!(
                                    "Error removing participant: {e}"
                                ));
                            }
                        }
                    }
                    Err(e) => {
                        show_banner(
                            &banner,
                            &hide_timer,
                            REMOVE_FAILED.to_string(),
                            BannerKind::Error,
                        );
                        gloo::console::error!(format!("Error removing participant: {e}"));
                    }
                }
            });
        })
    };

    // ---------- views ----------

    let banner_block = if let Some(b) = (*banner).clone() {
        let kind_class = match b.kind {
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        };
        html! { <div class={classes!("message", kind_class)}>{ b.text }</div> }
    } else {
        html! {}
    };

    let gallery = if *load_failed {
        html! { <p class="info">{ LOAD_FAILED }</p> }
    } else if let Some(map) = (*activities).clone() {
        html! {
            <div class="activities-grid">
                { for map.iter().map(|(name, details)| {
                    activity_card(name, details, &on_remove)
                })}
            </div>
        }
    } else {
        html! { <p class="info">{ "Loading activities..." }</p> }
    };

    // The dropdown renders from the last good collection even when the
    // gallery is showing the failure line.
    let option_names: Vec<String> = activities
        .as_ref()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();

    html! {
        <div class="wrap">
            <header class="hero">
                <h1>{ "Mergington High School Activities" }</h1>
                <p class="sub">{ "Browse extracurriculars and sign up with your school email." }</p>
            </header>

            <section class="card signup">
                <h3>{ "Sign Up for an Activity" }</h3>
                <form onsubmit={on_signup}>
                    <label for="email">{ "Email" }</label>
                    <input
                        id="email"
                        type="email"
                        required=true
                        placeholder="your-email@mergington.edu"
                        value={(*email).clone()}
                        oninput={on_email_input}
                    />

                    <label for="activity">{ "Activity" }</label>
                    <select id="activity" required=true onchange={on_activity_change}>
                        <option value="" selected={activity.is_empty()}>
                            { "-- Select an activity --" }
                        </option>
                        { for option_names.iter().map(|name| html! {
                            <option value={name.clone()} selected={*activity == *name}>
                                { name }
                            </option>
                        })}
                    </select>

                    <button type="submit">{ "Sign Up" }</button>
                </form>
                { banner_block }
            </section>

            <section class="card">
                <h3>{ "Current Activities" }</h3>
                { gallery }
            </section>
        </div>
    }
}

fn activity_card(
    name: &str,
    details: &ActivityDetails,
    on_remove: &Callback<(String, String)>,
) -> Html {
    let roster = if details.participants.is_empty() {
        html! { <li class="no-participants">{ "No participants yet" }</li> }
    } else {
        html! {
            <>
                { for details.participants.iter().map(|participant| {
                    let onclick = {
                        let on_remove = on_remove.clone();
                        let activity = name.to_string();
                        let email = participant.clone();
                        Callback::from(move |_: MouseEvent| {
                            on_remove.emit((activity.clone(), email.clone()));
                        })
                    };
                    html! {
                        <li>
                            <span class="participant-badge">{ initials(participant) }</span>
                            <span class="participant-name">{ participant }</span>
                            <button
                                class="remove-participant"
                                title="Remove participant"
                                aria-label={format!("Remove {participant}")}
                                {onclick}
                            >
                                { "\u{00d7}" }
                            </button>
                        </li>
                    }
                })}
            </>
        }
    };

    html! {
        <div class="activity-card">
            <h4>{ name }</h4>
            <p class="description">{ &details.description }</p>
            <p><strong>{ "Schedule: " }</strong>{ &details.schedule }</p>
            <p><strong>{ "Availability: " }</strong>{ format!("{} spots left", spots_left(details)) }</p>
            <div class="participants">
                <h5>{ "Participants" }</h5>
                <ul class="participants-list">
                    { roster }
                </ul>
            </div>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(max: i64, participants: &[&str]) -> ActivityDetails {
        ActivityDetails {
            description: "d".to_string(),
            schedule: "Fri".to_string(),
            max_participants: max,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn spots_left_is_capacity_minus_roster() {
        assert_eq!(spots_left(&details(12, &["a@x.com"])), 11);
        assert_eq!(spots_left(&details(2, &[])), 2);
    }

    #[test]
    fn spots_left_goes_negative_when_overbooked() {
        assert_eq!(spots_left(&details(1, &["a@x.com", "b@x.com", "c@x.com"])), -2);
    }

    #[test]
    fn initials_from_full_name() {
        assert_eq!(initials("Ada Lovelace"), "AL");
    }

    #[test]
    fn initials_use_first_and_last_part() {
        assert_eq!(initials("Ada Byron Lovelace"), "AL");
        assert_eq!(initials("  ada   lovelace  "), "AL");
    }

    #[test]
    fn initials_from_email_use_local_part() {
        assert_eq!(initials("ada@example.com"), "A");
    }

    #[test]
    fn initials_of_empty_input_are_empty() {
        assert_eq!(initials(""), "");
        assert_eq!(initials("   "), "");
        assert_eq!(initials("@example.com"), "");
    }

    #[test]
    fn signup_url_percent_encodes_both_values() {
        assert_eq!(
            signup_url("Chess Club", "ada+test@example.com"),
            "/activities/Chess%20Club/signup?email=ada%2Btest%40example.com"
        );
    }

    #[test]
    fn signup_url_encodes_path_dangerous_characters() {
        let url = signup_url("A/B?C#D", "a&b@x.com");
        assert_eq!(url, "/activities/A%2FB%3FC%23D/signup?email=a%26b%40x.com");
    }

    #[test]
    fn activities_payload_parses() {
        let json = r#"{"Chess Club": {"description":"d","schedule":"Fri","max_participants":2,"participants":["a@x.com"]}}"#;
        let map: ActivityMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 1);
        let chess = &map["Chess Club"];
        assert_eq!(chess.schedule, "Fri");
        assert_eq!(chess.participants, vec!["a@x.com".to_string()]);
        assert_eq!(spots_left(chess), 1);
        assert_eq!(initials(&chess.participants[0]), "A");
    }

    #[test]
    fn signup_error_prefers_detail() {
        let body: ApiMessage = serde_json::from_str(r#"{"detail":"Already registered"}"#).unwrap();
        assert_eq!(signup_error_text(&body), "Already registered");
    }

    #[test]
    fn signup_error_falls_back_to_generic_text() {
        let body: ApiMessage = serde_json::from_str("{}").unwrap();
        assert_eq!(signup_error_text(&body), "An error occurred");
    }

    #[test]
    fn removal_error_prefers_detail_then_message() {
        let both: ApiMessage =
            serde_json::from_str(r#"{"detail":"Activity not found","message":"nope"}"#).unwrap();
        assert_eq!(removal_error_text(&both), "Activity not found");

        let message_only: ApiMessage =
            serde_json::from_str(r#"{"message":"Participant not found"}"#).unwrap();
        assert_eq!(removal_error_text(&message_only), "Participant not found");

        let neither = ApiMessage::default();
        assert_eq!(removal_error_text(&neither), "Failed to remove participant");
    }

    #[test]
    fn success_body_parses_message() {
        let body: ApiMessage =
            serde_json::from_str(r#"{"message":"Signed up a@x.com for Chess Club"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Signed up a@x.com for Chess Club"));
        assert_eq!(body.detail, None);
    }
}
