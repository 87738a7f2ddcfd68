//! `ApiClient` against a mock HTTP server: request shapes, success bodies
//! as the backend actually sends them, and error payloads.

use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eduhire_client::{ApiClient, ApiError, ClientConfig};
use eduhire_core::curriculum::{ContainerId, ContentType, DragLocation, DropResult, ItemId, NewLesson};
use eduhire_core::optimistic::{FollowState, Optimistic};
use eduhire_core::wizard::{DraftStore, MemoryStorage, SubmitOutcome, WizardController};

const SECTION_A: &str = "4a8f1c1e-5d7b-4a34-9f53-3c1f1f0e2b10";
const SECTION_B: &str = "4a8f1c1e-5d7b-4a34-9f53-3c1f1f0e2b20";
const COURSE: &str = "9d0c6a55-1f0e-4b9e-8f5e-1a2b3c4d5e6f";

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig {
        base_url: format!("{}/api", server.uri()),
        token: Some("test-token".into()),
        request_timeout_secs: 5,
    })
    .unwrap()
}

fn filled_wizard() -> WizardController<MemoryStorage> {
    let mut wizard = WizardController::new(DraftStore::new(MemoryStorage::new()));
    wizard.update_field("name", "Sunrise".into()).unwrap();
    wizard.update_field("city", "Pune".into()).unwrap();
    wizard
}

fn lesson_id(section: usize, n: usize) -> String {
    format!("0b6d4c0a-8f19-4b55-a7d5-2f7f43b9a{section}{n:02}")
}

/// Section A with lessons a0..a2, section B with b0..b1.
fn course_listing() -> serde_json::Value {
    let lessons = |section: usize, count: usize| {
        (0..count)
            .map(|n| {
                json!({
                    "id": lesson_id(section, n),
                    "title": format!("lesson {section}-{n}"),
                    "order": n,
                    "content_type": "VIDEO",
                    "duration_minutes": 5,
                    "is_preview": false
                })
            })
            .collect::<Vec<_>>()
    };
    json!([
        { "id": SECTION_A, "title": "A", "order": 0, "lessons": lessons(1, 3) },
        { "id": SECTION_B, "title": "B", "order": 1, "lessons": lessons(2, 2) }
    ])
}

async fn mount_course_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/api/courses/instructor/courses/{COURSE}/sections/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(course_listing()))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Institution creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn echoed_create_body_counts_as_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_string_contains("Pune"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "Sunrise",
            "city": "Pune",
            "country": "India"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut wizard = filled_wizard();
    let outcome = wizard.submit(&api(&server)).await;

    assert_matches!(outcome, SubmitOutcome::Created(created) => {
        assert_eq!(created.name, "Sunrise");
        assert_eq!(created.id, None);
        assert_eq!(created.slug, None);
    });
    assert!(!wizard.drafts().has_draft());
    assert!(wizard.errors().submit().is_none());
}

#[tokio::test]
async fn create_body_with_identifiers_is_passed_through() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/api/institutions/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": id,
            "slug": "sunrise",
            "name": "Sunrise"
        })))
        .mount(&server)
        .await;

    let mut wizard = filled_wizard();
    let outcome = wizard.submit(&api(&server)).await;

    assert_matches!(outcome, SubmitOutcome::Created(created) => {
        assert_eq!(created.id, Some(id));
        assert_eq!(created.slug.as_deref(), Some("sunrise"));
    });
}

#[tokio::test]
async fn non_json_success_body_still_clears_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
        .mount(&server)
        .await;

    let mut wizard = filled_wizard();
    let outcome = wizard.submit(&api(&server)).await;

    assert_matches!(outcome, SubmitOutcome::Created(created) if created.name == "Sunrise");
    assert!(!wizard.drafts().has_draft());
}

#[tokio::test]
async fn field_error_becomes_submit_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": ["An institution with this name already exists."]
        })))
        .mount(&server)
        .await;

    let mut wizard = filled_wizard();
    let outcome = wizard.submit(&api(&server)).await;

    assert_matches!(outcome, SubmitOutcome::Failed { message } => {
        assert_eq!(message, "An institution with this name already exists.");
    });
    assert_eq!(
        wizard.errors().submit(),
        Some("An institution with this name already exists.")
    );
    assert!(wizard.drafts().has_draft());
}

// ---------------------------------------------------------------------------
// Curriculum
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_listing_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/courses/instructor/courses/{COURSE}/sections/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sections": [] })))
        .mount(&server)
        .await;

    let result = api(&server).list_sections(COURSE.parse().unwrap()).await;
    assert_matches!(result, Err(ApiError::Decode(_)));
}

#[tokio::test]
async fn create_lesson_sends_backend_content_type() {
    let server = MockServer::start().await;
    let section: Uuid = SECTION_A.parse().unwrap();
    let created = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/api/courses/instructor/sections/{section}/lessons/")))
        .and(body_json(json!({
            "title": "Syllabus",
            "content_type": "PDF",
            "duration_minutes": 12,
            "is_preview": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": created,
            "title": "Syllabus",
            "order": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = api(&server)
        .create_lesson(
            section,
            &NewLesson {
                title: "Syllabus".into(),
                content_type: ContentType::Document,
                duration_minutes: 12,
                is_preview: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(item.id, created);
    assert_eq!(item.order, 3);
}

#[tokio::test]
async fn cross_section_move_reparents_then_reorders_both() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;
    let moved = lesson_id(1, 2);
    Mock::given(method("PATCH"))
        .and(path(format!("/api/courses/instructor/lessons/{moved}/")))
        .and(body_json(json!({ "section": SECTION_B })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": moved })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/courses/instructor/sections/{SECTION_A}/lessons/")))
        .and(body_json(json!({ "order": [lesson_id(1, 0), lesson_id(1, 1)] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Lessons reordered" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/courses/instructor/sections/{SECTION_B}/lessons/")))
        .and(body_json(json!({ "order": [moved, lesson_id(2, 0), lesson_id(2, 1)] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Lessons reordered" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let course: Uuid = COURSE.parse().unwrap();
    let mut curriculum = api.list_sections(course).await.unwrap();
    let drop = DropResult {
        source: DragLocation::new(ContainerId::Section(ItemId::parse(SECTION_A).unwrap()), 2),
        destination: Some(DragLocation::new(
            ContainerId::Section(ItemId::parse(SECTION_B).unwrap()),
            0,
        )),
    };
    curriculum.apply_drop(&drop).unwrap();
    api.persist_drop(course, &curriculum, &drop).await.unwrap();

    let writes: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() != "GET")
        .map(|r| format!("{} {}", r.method.as_str(), r.url.path()))
        .collect();
    assert_eq!(
        writes,
        [
            format!("PATCH /api/courses/instructor/lessons/{moved}/"),
            format!("PUT /api/courses/instructor/sections/{SECTION_A}/lessons/"),
            format!("PUT /api/courses/instructor/sections/{SECTION_B}/lessons/"),
        ]
    );
}

#[tokio::test]
async fn failed_reparent_stops_before_reordering() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = api(&server);
    let course: Uuid = COURSE.parse().unwrap();
    let mut curriculum = api.list_sections(course).await.unwrap();
    let drop = DropResult {
        source: DragLocation::new(ContainerId::Section(ItemId::parse(SECTION_A).unwrap()), 0),
        destination: Some(DragLocation::new(
            ContainerId::Section(ItemId::parse(SECTION_B).unwrap()),
            2,
        )),
    };
    curriculum.apply_drop(&drop).unwrap();

    let result = api.persist_drop(course, &curriculum, &drop).await;
    assert_matches!(result, Err(ApiError::Api { status: 404, message }) if message == "Not found.");
}

#[tokio::test]
async fn section_move_sends_one_reorder() {
    let server = MockServer::start().await;
    mount_course_listing(&server).await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/courses/instructor/courses/{COURSE}/sections/")))
        .and(body_json(json!({ "order": [SECTION_B, SECTION_A] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Sections reordered" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let course: Uuid = COURSE.parse().unwrap();
    let mut curriculum = api.list_sections(course).await.unwrap();
    let drop = DropResult {
        source: DragLocation::new(ContainerId::Sections, 1),
        destination: Some(DragLocation::new(ContainerId::Sections, 0)),
    };
    curriculum.apply_drop(&drop).unwrap();
    api.persist_drop(course, &curriculum, &drop).await.unwrap();
}

// ---------------------------------------------------------------------------
// Follow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn optimistic_follow_commits_server_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/sunrise/follow/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Followed successfully",
            "is_following": true,
            "follower_count": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = Optimistic::new(FollowState {
        is_following: false,
        follower_count: 10,
    });
    api(&server)
        .toggle_follow_optimistic("sunrise", &mut state)
        .await
        .unwrap();

    assert!(!state.is_pending());
    assert_eq!(
        *state.get(),
        FollowState {
            is_following: true,
            follower_count: 12
        }
    );
}

#[tokio::test]
async fn optimistic_follow_rolls_back_on_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/sunrise/follow/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let start = FollowState {
        is_following: true,
        follower_count: 3,
    };
    let mut state = Optimistic::new(start);
    let result = api(&server)
        .toggle_follow_optimistic("sunrise", &mut state)
        .await;

    assert_matches!(result, Err(ApiError::Api { status: 500, .. }));
    assert_eq!(*state.get(), start);
    assert!(!state.is_pending());
}

#[tokio::test]
async fn follow_state_reads_detail_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/institutions/sunrise/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": Uuid::new_v4(),
            "slug": "sunrise",
            "name": "Sunrise",
            "is_following": false,
            "follower_count": 7
        })))
        .mount(&server)
        .await;

    let state = api(&server).follow_state("sunrise").await.unwrap();
    assert_eq!(
        state,
        FollowState {
            is_following: false,
            follower_count: 7
        }
    );
}
