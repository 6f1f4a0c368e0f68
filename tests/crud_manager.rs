use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use serde_json::json;

use matchday_terminal::api::ApiClient;
use matchday_terminal::manager::{CrudManager, TEAMS_SPEC};
use matchday_terminal::model::Team;
use matchday_terminal::state::{Delta, NoticeLevel};

/// One-shot HTTP stub: serves the queued JSON bodies in order, one per
/// connection, then drops the listener so later requests are refused.
fn spawn_stub(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    thread::spawn(move || {
        for body in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        raw.extend_from_slice(&buf[..n]);
                        if request_complete(&raw) {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

fn request_complete(raw: &[u8]) -> bool {
    let Some(split) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&raw[..split]);
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() - (split + 4) >= content_length
}

fn drain(rx: &Receiver<Delta>) -> Vec<Delta> {
    let mut out = Vec::new();
    while let Ok(delta) = rx.try_recv() {
        out.push(delta);
    }
    out
}

fn teams_body(names: &[(i64, &str)]) -> String {
    let teams: Vec<_> = names
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "players": []}))
        .collect();
    serde_json::to_string(&teams).unwrap()
}

#[test]
fn list_failure_keeps_cache_notifies_once_and_returns_empty() {
    // Discard port: nothing listens there, the connection is refused.
    let api = ApiClient::new("http://127.0.0.1:9");
    let mut manager = CrudManager::<Team>::new(TEAMS_SPEC, Delta::SetTeams);
    let (tx, rx) = mpsc::channel();

    let listed = manager.list(&api, &tx);

    assert!(listed.is_empty());
    assert!(manager.items().is_empty());
    let deltas = drain(&rx);
    assert_eq!(deltas.len(), 1, "exactly one notification expected");
    match &deltas[0] {
        Delta::Notice { level, message } => {
            assert_eq!(*level, NoticeLevel::Error);
            assert!(message.starts_with("Failed to fetch data"), "got: {message}");
        }
        other => panic!("expected error notice, got {other:?}"),
    }
}

#[test]
fn create_then_list_contains_the_new_entity() {
    let base = spawn_stub(vec![
        // POST /teams
        "{}".to_string(),
        // follow-up GET /teams
        teams_body(&[(1, "Arsenal")]),
    ]);
    let api = ApiClient::new(base);
    let mut manager = CrudManager::<Team>::new(TEAMS_SPEC, Delta::SetTeams);
    let (tx, rx) = mpsc::channel();

    manager.create(
        &api,
        &tx,
        &json!({"name": "Arsenal", "city": "London"}),
        "Team created successfully",
    );

    assert_eq!(manager.items().len(), 1);
    assert_eq!(manager.items()[0].name, "Arsenal");

    let deltas = drain(&rx);
    assert_eq!(deltas.len(), 2);
    match &deltas[0] {
        Delta::Notice { level, message } => {
            assert_eq!(*level, NoticeLevel::Success);
            assert_eq!(message, "Team created successfully");
        }
        other => panic!("expected success notice, got {other:?}"),
    }
    match &deltas[1] {
        Delta::SetTeams(teams) => assert_eq!(teams.len(), 1),
        other => panic!("expected published collection, got {other:?}"),
    }
}

#[test]
fn remove_then_list_drops_the_entity() {
    let base = spawn_stub(vec![
        // initial GET /teams
        teams_body(&[(1, "Arsenal"), (2, "Chelsea")]),
        // DELETE /teams/1
        "{}".to_string(),
        // follow-up GET /teams
        teams_body(&[(2, "Chelsea")]),
    ]);
    let api = ApiClient::new(base);
    let mut manager = CrudManager::<Team>::new(TEAMS_SPEC, Delta::SetTeams);
    let (tx, rx) = mpsc::channel();

    manager.list(&api, &tx);
    assert_eq!(manager.items().len(), 2);

    manager.remove(&api, &tx, 1, "Team deleted successfully");
    assert_eq!(manager.items().len(), 1);
    assert!(manager.items().iter().all(|t| t.id != 1));
    drain(&rx);
}

#[test]
fn failed_refresh_keeps_the_previous_collection() {
    // The stub serves exactly one response, then refuses connections.
    let base = spawn_stub(vec![teams_body(&[(1, "Arsenal")])]);
    let api = ApiClient::new(base);
    let mut manager = CrudManager::<Team>::new(TEAMS_SPEC, Delta::SetTeams);
    let (tx, rx) = mpsc::channel();

    let first = manager.list(&api, &tx);
    assert_eq!(first.len(), 1);

    let second = manager.list(&api, &tx);
    assert!(second.is_empty());
    // Held collection is unchanged from its prior value.
    assert_eq!(manager.items().len(), 1);

    let deltas = drain(&rx);
    let errors = deltas
        .iter()
        .filter(|delta| matches!(delta, Delta::Notice { level: NoticeLevel::Error, .. }))
        .count();
    assert_eq!(errors, 1);
}
