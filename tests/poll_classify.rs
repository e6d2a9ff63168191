mod common;

use common::ScriptedBackend;
use spp_loadtest::{
    backend::HttpReply,
    console::Console,
    error::DriverError,
    poll::{PollOutcome, PollSettings, PollStep, Progress, classify, poll_until_terminal},
};
use std::time::Duration;

fn settings(deadline: Option<Duration>) -> PollSettings {
    PollSettings {
        interval: Duration::ZERO,
        request_timeout: Duration::from_secs(1),
        deadline,
    }
}

#[test]
fn see_other_is_done() {
    let step = classify(&HttpReply::new(303).with_location("/spp/x/result")).unwrap();
    assert_eq!(
        step,
        PollStep::Done {
            result_location: "/spp/x/result".into()
        }
    );
}

#[test]
fn see_other_without_location_is_fatal() {
    let err = classify(&HttpReply::new(303)).unwrap_err();
    assert!(matches!(err, DriverError::MissingLocation { status: 303 }));
}

#[test]
fn bad_gateway_is_server_down() {
    assert_eq!(classify(&HttpReply::new(502)).unwrap(), PollStep::ServerDown);
}

#[test]
fn progress_is_read_from_json_body() {
    let reply = HttpReply::new(200).with_body(r#"{ "progress": "geoindexing" }"#);
    let step = classify(&reply).unwrap();
    assert_eq!(step, PollStep::Pending(Progress::Reported("geoindexing".into())));
}

#[test]
fn non_json_body_keeps_polling() {
    let step = classify(&HttpReply::new(200).with_body("<html>busy</html>")).unwrap();
    assert!(matches!(step, PollStep::Pending(Progress::Malformed(_))));
}

#[test]
fn polls_through_pending_states() {
    let backend = ScriptedBackend::default()
        .on_poll(Ok(HttpReply::new(200).with_body(r#"{ "progress": "initializing" }"#)))
        .on_poll(Ok(HttpReply::new(200).with_body("garbage")))
        .on_poll(Ok(HttpReply::new(303).with_location("/spp/j/result")));
    let out = poll_until_terminal(&backend, "/spp/j", &settings(None), &Console::silent()).unwrap();
    assert_eq!(
        out,
        PollOutcome::Done {
            result_location: "/spp/j/result".into()
        }
    );
    assert_eq!(backend.calls.borrow().len(), 3);
}

#[test]
fn deadline_stops_polling() {
    let backend = ScriptedBackend::default()
        .on_poll(Ok(HttpReply::new(200).with_body(r#"{ "progress": "computing" }"#)));
    let out = poll_until_terminal(
        &backend,
        "/spp/j",
        &settings(Some(Duration::ZERO)),
        &Console::silent(),
    )
    .unwrap();
    assert_eq!(out, PollOutcome::DeadlineExceeded { attempts: 1 });
}

#[test]
fn deadline_allows_a_final_poll_at_the_limit() {
    let pending = || Ok(HttpReply::new(200).with_body(r#"{ "progress": "computing" }"#));
    let backend = ScriptedBackend::default().on_poll(pending()).on_poll(pending());
    let settings = PollSettings {
        interval: Duration::from_millis(20),
        request_timeout: Duration::from_secs(1),
        deadline: Some(Duration::from_millis(20)),
    };
    let out = poll_until_terminal(&backend, "/spp/j", &settings, &Console::silent()).unwrap();
    assert_eq!(out, PollOutcome::DeadlineExceeded { attempts: 2 });
    assert_eq!(backend.calls.borrow().len(), 2);
}
