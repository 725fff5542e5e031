//! End-to-end report flows over HTTP against the real domain services.

#[path = "support/report_app.rs"]
mod report_app;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use report_app::{AUTHOR, VERIFIER, report_app, report_state, sign_in_as};
use roadwatch::domain::ProximityPolicy;

fn scenario_payload() -> Value {
    json!({
        "title": "Jalan berlubang",
        "region_code": "35.10.02.2005",
        "path_points": [{"lat": -7.2575, "lng": 112.7521}],
        "photo_urls": ["https://example.com/photo1.jpg"]
    })
}

async fn post_json<S>(
    app: &S,
    uri: &str,
    cookie: &actix_web::cookie::Cookie<'static>,
    body: &Value,
) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[actix_web::test]
async fn valid_submission_is_stored_as_submitted() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let cookie = sign_in_as(&app, AUTHOR).await;

    let (status, body) = post_json(&app, "/api/v1/reports", &cookie, &scenario_payload()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["author_id"], AUTHOR);
    assert_eq!(body["created_at"], body["updated_at"]);

    let id = body["id"].as_str().expect("report id");
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/reports/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn latitude_outside_indonesia_is_a_boundary_violation() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let cookie = sign_in_as(&app, AUTHOR).await;
    let mut payload = scenario_payload();
    payload["path_points"] = json!([{"lat": 10.0, "lng": 112.7521}]);

    let (status, body) = post_json(&app, "/api/v1/reports", &cookie, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "boundary_violation");
    assert_eq!(body["details"]["index"], 0);
    assert_eq!(body["details"]["axis"], "lat");
    assert_eq!(body["details"]["range"], json!([-11.0, 6.0]));
}

#[actix_web::test]
async fn unknown_region_is_not_a_boundary_violation() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let cookie = sign_in_as(&app, AUTHOR).await;
    let mut payload = scenario_payload();
    payload["region_code"] = json!("99.99.99.9999");

    let (status, body) = post_json(&app, "/api/v1/reports", &cookie, &payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["code"], "region_not_found");
}

#[rstest]
#[case::disabled(ProximityPolicy::default(), StatusCode::CREATED)]
#[case::enforced(ProximityPolicy::enforced(200.0), StatusCode::UNPROCESSABLE_ENTITY)]
#[actix_web::test]
async fn proximity_rule_follows_policy(
    #[case] policy: ProximityPolicy,
    #[case] expected: StatusCode,
) {
    let app = test::init_service(report_app(report_state(policy))).await;
    let cookie = sign_in_as(&app, AUTHOR).await;
    let mut payload = scenario_payload();
    // About 5.5 km south of the centroid, still inside Indonesia.
    payload["path_points"] = json!([{"lat": -7.3075, "lng": 112.7521}]);

    let (status, _) = post_json(&app, "/api/v1/reports", &cookie, &payload).await;

    assert_eq!(status, expected);
}

#[actix_web::test]
async fn rejected_photos_are_listed_by_index() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let cookie = sign_in_as(&app, AUTHOR).await;
    let mut payload = scenario_payload();
    payload["photo_urls"] = json!([
        "https://example.com/photo1.jpg",
        "http://intranet.example.com/photo.jpg",
        "https://example.com/page.html"
    ]);

    let (status, body) = post_json(&app, "/api/v1/reports", &cookie, &payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let failures = body["details"]["failures"].as_array().expect("failures");
    let reasons: Vec<(u64, &str)> = failures
        .iter()
        .map(|f| {
            (
                f["index"].as_u64().expect("index"),
                f["reason"].as_str().expect("reason"),
            )
        })
        .collect();
    assert_eq!(
        reasons,
        vec![(1, "blocked_address"), (2, "unsupported_content_type")]
    );
}

#[actix_web::test]
async fn lifecycle_moves_forward_one_step_at_a_time() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let author = sign_in_as(&app, AUTHOR).await;
    let (_, created) = post_json(&app, "/api/v1/reports", &author, &scenario_payload()).await;
    let id = created["id"].as_str().expect("report id").to_owned();
    let verifier = sign_in_as(&app, VERIFIER).await;

    let change = |target: &'static str| {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/reports/{id}/status"))
            .cookie(verifier.clone())
            .set_json(json!({"status": target}))
            .to_request()
    };

    for step in ["under_verification", "verified"] {
        let res = test::call_service(&app, change(step)).await;
        assert_eq!(res.status(), StatusCode::OK, "{step}");
    }

    let skipped = test::call_service(&app, change("resolved")).await;
    assert_eq!(skipped.status(), StatusCode::CONFLICT);

    let res = test::call_service(&app, change("pending_resolved")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "pending_resolved");
    assert_ne!(body["updated_at"], created["updated_at"]);
    assert_eq!(body["created_at"], created["created_at"]);
}

#[actix_web::test]
async fn authors_cannot_advance_their_own_reports() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let author = sign_in_as(&app, AUTHOR).await;
    let (_, created) = post_json(&app, "/api/v1/reports", &author, &scenario_payload()).await;
    let id = created["id"].as_str().expect("report id");

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/reports/{id}/status"))
            .cookie(author)
            .set_json(json!({"status": "under_verification"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn revision_stops_once_verification_starts() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let author = sign_in_as(&app, AUTHOR).await;
    let (_, created) = post_json(&app, "/api/v1/reports", &author, &scenario_payload()).await;
    let id = created["id"].as_str().expect("report id").to_owned();
    let mut revised = scenario_payload();
    revised["title"] = json!("Jalan rusak parah");

    let revise = |cookie: actix_web::cookie::Cookie<'static>| {
        test::TestRequest::put()
            .uri(&format!("/api/v1/reports/{id}"))
            .cookie(cookie)
            .set_json(&revised)
            .to_request()
    };

    let res = test::call_service(&app, revise(author.clone())).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["title"], "Jalan rusak parah");

    let verifier = sign_in_as(&app, VERIFIER).await;
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/reports/{id}/status"))
            .cookie(verifier)
            .set_json(json!({"status": "under_verification"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, revise(author)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn deleted_reports_disappear_from_listing() {
    let app = test::init_service(report_app(report_state(ProximityPolicy::default()))).await;
    let author = sign_in_as(&app, AUTHOR).await;
    let (_, created) = post_json(&app, "/api/v1/reports", &author, &scenario_payload()).await;
    let id = created["id"].as_str().expect("report id");

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/reports/{id}"))
            .cookie(author)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/reports?author_id={AUTHOR}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["pagination"]["total"], 0);
}
