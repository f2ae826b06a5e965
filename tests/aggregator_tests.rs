//! End-to-end aggregation rounds over local fixture servers.

mod common;

use common::{Fixture, Reply};
use serde_json::json;
use server_pulse::aggregator::Aggregator;
use server_pulse::models::server::{PingQuality, Roster, StatusState};
use server_pulse::probe::HttpProber;
use std::time::{Duration, Instant};

fn aggregator(timeout_ms: u64) -> Aggregator<HttpProber> {
    Aggregator::new(HttpProber::new(Duration::from_millis(timeout_ms)).unwrap())
}

fn descriptor(id: &str, link: Option<&str>) -> serde_json::Value {
    let mut value = json!({ "id": id, "name": id, "region": "Local", "players": "prior" });
    if let Some(link) = link {
        value["link"] = json!(link);
    }
    value
}

#[tokio::test]
async fn one_slow_server_does_not_hold_up_the_rest() {
    let fast_a = Fixture::start(Reply::ok(r#"{"players": {"activeCount": 7, "totalCapacity": 20}}"#)).await;
    let fast_b = Fixture::start(Reply::ok(r#"{"playerCount": 3}"#)).await;
    let slow = Fixture::start(Reply::ok("{}").delayed(Duration::from_secs(5))).await;

    let roster: Roster = serde_json::from_value(json!({
        "og": [
            descriptor("a", Some(&fast_a.base)),
            descriptor("slow", Some(&slow.base)),
        ],
        "custom": [
            descriptor("b", Some(&fast_b.base)),
            descriptor("nolink", None),
        ]
    }))
    .unwrap();

    let started = Instant::now();
    let snapshot = aggregator(400).build_snapshot(&roster).await;
    assert!(started.elapsed() < Duration::from_secs(3));

    let a = snapshot.find("a").unwrap();
    assert_eq!(a.status.state, StatusState::Online);
    assert_eq!(a.players, "7/20");

    let b = snapshot.find("b").unwrap();
    assert_eq!(b.status.state, StatusState::Online);
    assert_eq!(b.players, "3");

    let slow = snapshot.find("slow").unwrap();
    assert_eq!(slow.status.label, "Offline");
    assert_eq!(slow.status.state, StatusState::Offline);
    assert_eq!(slow.ping.value, "N/A");
    assert_eq!(slow.ping.quality, PingQuality::Unknown);
    assert_eq!(slow.players, "prior");

    let nolink = snapshot.find("nolink").unwrap();
    assert_eq!(nolink.status.state, StatusState::Offline);
    assert_eq!(nolink.ping.value, "N/A");
}

#[tokio::test]
async fn probes_run_concurrently() {
    let mut fixtures = Vec::new();
    for _ in 0..5 {
        fixtures.push(Fixture::start(Reply::ok("{}").delayed(Duration::from_millis(300))).await);
    }
    let servers: Vec<_> = fixtures
        .iter()
        .enumerate()
        .map(|(i, f)| descriptor(&format!("s{}", i), Some(&f.base)))
        .collect();
    let roster: Roster = serde_json::from_value(json!({ "og": servers })).unwrap();

    let started = Instant::now();
    let snapshot = aggregator(3000).build_snapshot(&roster).await;
    let elapsed = started.elapsed();

    assert_eq!(snapshot.online_count(), 5);
    assert!(elapsed < Duration::from_millis(1200), "took {:?}", elapsed);
}

#[tokio::test]
async fn invalid_json_is_online_without_ping_data() {
    let fixture = Fixture::start(Reply::ok("<html>ok</html>")).await;
    let roster: Roster = serde_json::from_value(json!({
        "og": [ descriptor("html", Some(&fixture.base)) ]
    }))
    .unwrap();

    let snapshot = aggregator(2000).build_snapshot(&roster).await;
    let html = snapshot.find("html").unwrap();
    assert_eq!(html.status.state, StatusState::Online);
    assert!(html.ping.value.ends_with("ms"));
    assert_eq!(html.ping_data, None);
    assert_eq!(html.players, "prior");
}

#[tokio::test]
async fn snapshots_are_independent_of_the_roster_and_each_other() {
    let fixture = Fixture::start(Reply::ok(r#"{"players": 1}"#)).await;
    let roster: Roster = serde_json::from_value(json!({
        "og": [ descriptor("x", Some(&fixture.base)) ]
    }))
    .unwrap();
    let before = roster.clone();

    let aggregator = aggregator(2000);
    let first = aggregator.build_snapshot(&roster).await;
    let second = aggregator.build_snapshot(&roster).await;

    assert_eq!(roster, before);
    assert_eq!(first.find("x").unwrap().players, "1");
    assert_eq!(second.find("x").unwrap().players, "1");
    assert_eq!(fixture.paths().len(), 2);
}
