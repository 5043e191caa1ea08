use std::sync::Arc;

use serde_json::json;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stuportal::config::ApiConfig;
use stuportal::scheduler::{Scheduler, StudentContext};
use stuportal::PortalClient;

fn scheduler_for(server: &MockServer) -> Scheduler {
    let config = ApiConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    let client = PortalClient::new(&config).unwrap();
    Scheduler::new(Arc::new(client), "tch-1", StudentContext::new("stu-1"))
}

async fn mount_slots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/availability/tch-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_id": "slot-1",
                "date": "2024-03-10",
                "start_time": "10:00",
                "end_time": "10:15",
                "is_booked": true
            },
            {
                "_id": "slot-2",
                "date": "2024-03-10",
                "start_time": "10:30",
                "end_time": "10:45",
                "is_booked": false
            }
        ])))
        .mount(server)
        .await;
}

async fn mount_sessions(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/availability/student/stu-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn session_json(id: &str, slot_id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "slot_id": slot_id,
        "student_id": "stu-1",
        "teacher_id": "tch-1",
        "duration": "15",
        "session_start": "2024-03-10T10:00:00.000Z",
        "status": "confirmed"
    })
}

#[tokio::test]
async fn test_bare_array_shape() {
    let server = MockServer::start().await;
    mount_slots(&server).await;
    mount_sessions(
        &server,
        json!([session_json("s1", "slot-1"), session_json("s2", "slot-2")]),
    )
    .await;

    let scheduler = scheduler_for(&server);
    scheduler.refresh().await.unwrap();

    assert_eq!(scheduler.sessions().len(), 2);
    assert_eq!(scheduler.session_for("slot-1").unwrap().id, "s1");
}

#[tokio::test]
async fn test_wrapped_object_shape() {
    let server = MockServer::start().await;
    mount_slots(&server).await;
    mount_sessions(&server, json!({"sessions": [session_json("s1", "slot-1")]})).await;

    let scheduler = scheduler_for(&server);
    scheduler.refresh().await.unwrap();

    assert_eq!(scheduler.sessions().len(), 1);
}

#[tokio::test]
async fn test_single_object_shape() {
    let server = MockServer::start().await;
    mount_slots(&server).await;
    mount_sessions(&server, session_json("s1", "slot-1")).await;

    let scheduler = scheduler_for(&server);
    scheduler.refresh().await.unwrap();

    assert_eq!(scheduler.sessions().len(), 1);
    assert_eq!(scheduler.session_for("slot-1").unwrap().id, "s1");
}

#[tokio::test]
async fn test_unexpected_shape_degrades_to_empty() {
    let server = MockServer::start().await;
    mount_slots(&server).await;
    mount_sessions(&server, json!({"error": "nothing here"})).await;

    let scheduler = scheduler_for(&server);
    scheduler.refresh().await.unwrap();

    // The view survives with slots but no sessions
    assert_eq!(scheduler.slots().len(), 2);
    assert!(scheduler.sessions().is_empty());
}

#[tokio::test]
async fn test_duplicate_slot_reference_keeps_first() {
    let server = MockServer::start().await;
    mount_slots(&server).await;
    mount_sessions(
        &server,
        json!([session_json("first", "slot-1"), session_json("second", "slot-1")]),
    )
    .await;

    let scheduler = scheduler_for(&server);
    scheduler.refresh().await.unwrap();

    assert_eq!(scheduler.sessions().len(), 1);
    assert_eq!(scheduler.session_for("slot-1").unwrap().id, "first");
}

#[tokio::test]
async fn test_session_endpoint_failure_degrades_to_empty() {
    let server = MockServer::start().await;
    mount_slots(&server).await;

    Mock::given(method("GET"))
        .and(path("/availability/student/stu-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scheduler = scheduler_for(&server);
    scheduler.refresh().await.unwrap();

    assert_eq!(scheduler.slots().len(), 2);
    assert!(scheduler.sessions().is_empty());
}

#[tokio::test]
async fn test_slot_endpoint_failure_leaves_error_state_and_skips_sessions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/availability/tch-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // The session endpoint must never be hit when the slot load failed
    Mock::given(method("GET"))
        .and(path("/availability/student/stu-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let scheduler = scheduler_for(&server);

    assert!(scheduler.refresh().await.is_err());
    assert!(scheduler.slots().is_empty());
    assert!(scheduler.slot_error().is_some());
}
