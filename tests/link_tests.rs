use chrono::{Duration, Utc};
use guestlist::auth::Session;
use guestlist::db::*;
use guestlist::error::{ErrorKind, GuestlistError};
use guestlist::model::*;
use guestlist::ops::*;
use guestlist::signup::{signup_url, SignupForm};
use guestlist::token::LinkSigner;
use rusqlite::Connection;

fn setup() -> (Connection, Session, Id<GuestList>) {
    let conn = schema::test_connection();
    let user = User::create(
        "Alexander".into(),
        "alex@example.com".into(),
        "not-a-real-hash".into(),
        "admin".into(),
    );
    user_repo::insert(&conn, &user).unwrap();
    let session = Session::for_user(&user);

    let venue = Venue::create("Tranzit".into(), None, 450);
    venue_repo::insert(&conn, &venue).unwrap();

    let form = EventForm {
        name: "Entrance".into(),
        venue_id: venue.id,
        starts_at: Utc::now() + Duration::days(7),
        guest_lists: Some(vec![GuestListInput::new("Default Guest List", 50)]),
    };
    let details = event_ops::create_event(&conn, &session, &form).unwrap();
    let list_id = details.guest_lists[0].list.id;
    (conn, session, list_id)
}

fn signer() -> LinkSigner {
    LinkSigner::new("test-link-secret", None).unwrap()
}

fn link_with_token(conn: &Connection, session: &Session, params: &NewLink) -> (Link, String) {
    let link = link_ops::create_link(conn, session, params).unwrap();
    let token = link_ops::issue_token(session, &signer(), link.id).unwrap();
    (link, token)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn guest_count(conn: &Connection, list_id: Id<GuestList>) -> usize {
    guest_repo::count_by_list(conn, list_id).unwrap()
}

fn text_inputs(html: &str) -> usize {
    html.matches("<input type=\"text\"").count()
}

// ==========================================================================
// CREATE LINK
// ==========================================================================

#[test]
fn create_link_records_scope_and_creator() {
    let (conn, session, list_id) = setup();
    let params = NewLink {
        name: "Band".into(),
        plus_one: true,
        needs_confirmation: true,
        ..NewLink::new(list_id, 3)
    };
    let link = link_ops::create_link(&conn, &session, &params).unwrap();

    assert_eq!(link.guest_list_id, list_id);
    assert_eq!(link.created_by, session.user_id);
    assert_eq!(link.capacity, 3);
    assert!(link.active);
    assert!(link.is_one_time);
    assert!(link.plus_one);
    assert!(link.needs_confirmation);

    let stored = link_repo::find_by_id(&conn, link.id).unwrap().unwrap();
    assert_eq!(stored, link);
}

#[test]
fn create_link_defaults_blank_name() {
    let (conn, session, list_id) = setup();
    let link = link_ops::create_link(&conn, &session, &NewLink::new(list_id, 1)).unwrap();
    assert_eq!(link.name, "tempLink");
}

#[test]
fn create_link_on_missing_list_is_missing_resource() {
    let (conn, session, _) = setup();
    let err = link_ops::create_link(&conn, &session, &NewLink::new(Id::generate(), 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingResource);
    assert!(matches!(err, GuestlistError::NotFound { .. }));
}

#[test]
fn create_link_for_unknown_user_is_invalid_user() {
    let (conn, session, list_id) = setup();
    let ghost = Session {
        user_id: Id::generate(),
        ..session
    };
    let err = link_ops::create_link(&conn, &ghost, &NewLink::new(list_id, 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingResource);
    assert!(matches!(err, GuestlistError::InvalidUser { .. }));
}

#[test]
fn create_link_rejects_non_positive_capacity() {
    let (conn, session, list_id) = setup();
    let err = link_ops::create_link(&conn, &session, &NewLink::new(list_id, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(link_repo::find_by_list(&conn, list_id).unwrap().is_empty());
}

// ==========================================================================
// TOKENS
// ==========================================================================

#[test]
fn resolve_token_returns_the_issued_link() {
    let (conn, session, list_id) = setup();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 2));

    assert!(!token.contains(&link.id.to_string()));
    let details = link_ops::resolve_token(&conn, &signer(), &token).unwrap();
    assert_eq!(details.link.id, link.id);
    assert_eq!(details.guest_list.id, list_id);
    assert_eq!(details.event.name, "Entrance");
    assert_eq!(details.venue.name, "Tranzit");
}

#[test]
fn tampered_token_is_a_broken_link() {
    let (conn, session, list_id) = setup();
    let (_, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 2));

    let mut tampered = token.clone().into_bytes();
    tampered[0] = if tampered[0] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let err = link_ops::resolve_token(&conn, &signer(), &tampered).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(err.to_page_error().message, "Broken link");

    let garbage = link_ops::resolve_token(&conn, &signer(), "not a token").unwrap_err();
    assert_eq!(garbage.kind(), ErrorKind::Auth);
}

#[test]
fn token_from_another_secret_is_rejected() {
    let (conn, session, list_id) = setup();
    let link = link_ops::create_link(&conn, &session, &NewLink::new(list_id, 2)).unwrap();
    let other = LinkSigner::new("some-other-secret", None).unwrap();
    let token = other.issue(link.id).unwrap();

    let err = link_ops::resolve_token(&conn, &signer(), &token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[test]
fn token_for_a_missing_link_is_missing_resource() {
    let (conn, _, _) = setup();
    let token = signer().issue(Id::generate()).unwrap();
    let err = link_ops::resolve_token(&conn, &signer(), &token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingResource);
}

#[test]
fn expired_token_is_a_broken_link() {
    let (conn, session, list_id) = setup();
    let link = link_ops::create_link(&conn, &session, &NewLink::new(list_id, 2)).unwrap();
    let short = LinkSigner::new("test-link-secret", Some(Duration::minutes(5))).unwrap();
    let token = short.issue_at(link.id, Utc::now() - Duration::hours(1)).unwrap();

    let err = link_ops::resolve_token(&conn, &short, &token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

// ==========================================================================
// REDEEM
// ==========================================================================

#[test]
fn redeem_adds_guests_and_counts_places() {
    let (conn, session, list_id) = setup();
    let params = NewLink {
        plus_one: true,
        ..NewLink::new(list_id, 3)
    };
    let (_, token) = link_with_token(&conn, &session, &params);

    let result = link_ops::redeem(
        &conn,
        &signer(),
        &token,
        &names(&["Jane Smith", " Bob Wilson "]),
        LinkConsumption::Exhausted,
    )
    .unwrap();

    assert_eq!(result.guests.len(), 2);
    assert_eq!(result.guests[1].name, "Bob Wilson");
    assert!(result.guests.iter().all(|g| g.plus_one && g.confirmed));
    assert_eq!(result.link.redeemed, 2);
    assert_eq!(result.link.remaining(), 1);
    assert!(result.link.active);
    assert_eq!(guest_count(&conn, list_id), 2);
}

#[test]
fn redeem_with_confirmation_adds_unconfirmed_guests() {
    let (conn, session, list_id) = setup();
    let params = NewLink {
        needs_confirmation: true,
        ..NewLink::new(list_id, 2)
    };
    let (_, token) = link_with_token(&conn, &session, &params);

    let result =
        link_ops::redeem(&conn, &signer(), &token, &names(&["Tom"]), LinkConsumption::Exhausted).unwrap();
    assert!(!result.guests[0].confirmed);
    assert!(!result.guests[0].plus_one);
}

#[test]
fn redeem_over_capacity_is_rejected_whole() {
    let (conn, session, list_id) = setup();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 2));

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["A", "B", "C"]), LinkConsumption::Exhausted)
        .unwrap_err();

    assert!(matches!(err, GuestlistError::LinkCapacityExceeded { remaining: 2, requested: 3, .. }));
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert_eq!(guest_count(&conn, list_id), 0);
    assert_eq!(link_repo::find_by_id(&conn, link.id).unwrap().unwrap().redeemed, 0);
}

#[test]
fn exhausted_link_deactivates_when_full() {
    let (conn, session, list_id) = setup();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 2));

    link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Exhausted).unwrap();
    let last = link_ops::redeem(&conn, &signer(), &token, &names(&["B"]), LinkConsumption::Exhausted).unwrap();
    assert!(!last.link.active);

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["C"]), LinkConsumption::Exhausted).unwrap_err();
    assert!(matches!(err, GuestlistError::LinkInactive { .. }));
    assert!(!link_repo::find_by_id(&conn, link.id).unwrap().unwrap().active);
    assert_eq!(guest_count(&conn, list_id), 2);
}

#[test]
fn first_use_link_deactivates_after_one_redemption() {
    let (conn, session, list_id) = setup();
    let (_, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 5));

    let first = link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::FirstUse).unwrap();
    assert!(!first.link.active);
    assert_eq!(first.link.remaining(), 4);

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["B"]), LinkConsumption::FirstUse).unwrap_err();
    assert!(matches!(err, GuestlistError::LinkInactive { .. }));
}

#[test]
fn never_policy_keeps_link_active_but_counts_places() {
    let (conn, session, list_id) = setup();
    let (_, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 1));

    let first = link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Never).unwrap();
    assert!(first.link.active);

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["B"]), LinkConsumption::Never).unwrap_err();
    assert!(matches!(err, GuestlistError::LinkCapacityExceeded { remaining: 0, .. }));
}

#[test]
fn revoked_link_cannot_be_redeemed() {
    let (conn, session, list_id) = setup();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 3));
    link_ops::set_active(&conn, &session, link.id, false).unwrap();

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Exhausted).unwrap_err();
    assert!(matches!(err, GuestlistError::LinkInactive { .. }));

    link_ops::set_active(&conn, &session, link.id, true).unwrap();
    assert!(link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Exhausted).is_ok());
}

#[test]
fn redeem_on_closed_list_changes_nothing() {
    let (conn, session, list_id) = setup();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 3));
    guest_list_ops::set_closed(&conn, &session, list_id, true).unwrap();

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Exhausted).unwrap_err();
    assert!(matches!(err, GuestlistError::GuestListClosed { .. }));
    assert_eq!(link_repo::find_by_id(&conn, link.id).unwrap().unwrap().redeemed, 0);
}

#[test]
fn redeem_respects_guest_list_capacity() {
    let (conn, session, list_id) = setup();
    guest_list_ops::update_guest_list(&conn, &session, list_id, "Default Guest List", Some(2)).unwrap();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 5));

    let err = link_ops::redeem(&conn, &signer(), &token, &names(&["A", "B", "C"]), LinkConsumption::Exhausted)
        .unwrap_err();
    assert!(matches!(err, GuestlistError::GuestListFull { max_capacity: 2, .. }));
    assert_eq!(guest_count(&conn, list_id), 0);
    assert_eq!(link_repo::find_by_id(&conn, link.id).unwrap().unwrap().redeemed, 0);
}

#[test]
fn redeem_requires_names() {
    let (conn, session, list_id) = setup();
    let (_, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 3));

    let empty = link_ops::redeem(&conn, &signer(), &token, &[], LinkConsumption::Exhausted).unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::Generic);
    let blank = link_ops::redeem(&conn, &signer(), &token, &names(&["A", "  "]), LinkConsumption::Exhausted)
        .unwrap_err();
    assert_eq!(blank.kind(), ErrorKind::Generic);
    assert_eq!(guest_count(&conn, list_id), 0);
}

#[test]
fn link_keeps_its_guest_list_from_being_deleted() {
    let (conn, session, list_id) = setup();
    link_ops::create_link(&conn, &session, &NewLink::new(list_id, 1)).unwrap();

    let err = guest_list_ops::delete_guest_list(&conn, &session, list_id).unwrap_err();
    assert!(matches!(err, GuestlistError::InUse { .. }));
}

// ==========================================================================
// SIGNUP FORM
// ==========================================================================

#[test]
fn form_has_one_name_field_per_place() {
    let (conn, session, list_id) = setup();
    let (_, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 3));

    let details = link_ops::resolve_token(&conn, &signer(), &token).unwrap();
    let form = SignupForm::from_details(&details, &token);
    assert!(form.open);
    assert_eq!(form.fields.len(), 3);
    assert_eq!(text_inputs(&form.render_html()), 3);

    link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Exhausted).unwrap();
    let details = link_ops::resolve_token(&conn, &signer(), &token).unwrap();
    assert_eq!(text_inputs(&SignupForm::from_details(&details, &token).render_html()), 2);
}

#[test]
fn form_for_used_up_link_is_closed() {
    let (conn, session, list_id) = setup();
    let (_, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 1));
    link_ops::redeem(&conn, &signer(), &token, &names(&["A"]), LinkConsumption::Exhausted).unwrap();

    let details = link_ops::resolve_token(&conn, &signer(), &token).unwrap();
    let form = SignupForm::from_details(&details, &token);
    assert!(!form.open);
    let html = form.render_html();
    assert_eq!(text_inputs(&html), 0);
    assert!(html.contains("can no longer be used"));
}

#[test]
fn form_escapes_link_name() {
    let (conn, session, list_id) = setup();
    let params = NewLink {
        name: "<b>VIP</b>".into(),
        ..NewLink::new(list_id, 1)
    };
    let (_, token) = link_with_token(&conn, &session, &params);

    let details = link_ops::resolve_token(&conn, &signer(), &token).unwrap();
    let html = SignupForm::from_details(&details, &token).render_html();
    assert!(html.contains("&lt;b&gt;VIP&lt;/b&gt;"));
    assert!(!html.contains("<b>VIP"));
    assert!(html.contains(&token));
}

#[test]
fn signup_url_carries_only_the_token() {
    let (conn, session, list_id) = setup();
    let (link, token) = link_with_token(&conn, &session, &NewLink::new(list_id, 1));
    let url = signup_url("https://door.example", &token);
    assert!(url.starts_with("https://door.example/public/onetimelink?token="));
    assert!(!url.contains(&link.id.to_string()));
}
