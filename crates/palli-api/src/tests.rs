//! Router tests against the in-memory demo store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{DateTime, TimeZone, Utc};
use palli_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

fn fixed_now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
}

fn router() -> Router {
  api_router(Arc::new(MemoryStore::demo_with_clock(fixed_now).unwrap()))
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let resp = router.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_attendance_reports_alerts_in_requested_language() {
  let app = router();
  let mut req = json_req(
    "POST",
    "/attendance/batch",
    json!([
      { "studentId": "s1", "status": "Present" },
      { "studentId": "s2", "status": "Absent" },
    ]),
  );
  req
    .headers_mut()
    .insert(header::ACCEPT_LANGUAGE, "ta-IN".parse().unwrap());

  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["message"].as_str().unwrap().contains("1 தானியங்கி"));
  assert_eq!(body["data"]["records"].as_array().unwrap().len(), 2);

  let (_, logs) = send(&app, get("/communication-logs")).await;
  let logs = logs.as_array().unwrap();
  assert_eq!(logs.len(), 2);
  assert_eq!(logs[0]["type"], "SMS");
  assert_eq!(logs[1]["type"], "Voice Note");
  assert_eq!(logs[0]["studentName"], "Priya Dharshini");
  assert_eq!(logs[1]["status"], "Sent");
}

#[tokio::test]
async fn section_status_and_attendance_filters() {
  let app = router();
  let (status, body) = send(&app, get("/attendance/sections/10/A")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["marked"], true);
  assert_eq!(body["roster"], 2);

  let (_, records) =
    send(&app, get("/attendance?date=2024-01-15&student_id=s2")).await;
  assert_eq!(records.as_array().unwrap().len(), 1);
  assert_eq!(records[0]["status"], "Absent");
}

// ─── Marks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn out_of_range_marks_reject_whole_sheet() {
  let app = router();
  let (status, body) = send(
    &app,
    json_req(
      "POST",
      "/marks/batch",
      json!({
        "examId": "e1",
        "marks": [
          { "studentId": "s1", "obtainedMarks": 60 },
          { "studentId": "s2", "obtainedMarks": 101 },
        ],
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("out of range"));

  let (_, marks) = send(&app, get("/marks?exam_id=e1&student_id=s1")).await;
  assert_eq!(marks[0]["obtainedMarks"], 85.0);
}

#[tokio::test]
async fn marks_for_unknown_exam_are_404() {
  let app = router();
  let (status, _) = send(
    &app,
    json_req("POST", "/marks/batch", json!({ "examId": "e9", "marks": [] })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn valid_marks_replace_previous() {
  let app = router();
  let (status, body) = send(
    &app,
    json_req(
      "POST",
      "/marks/batch",
      json!({ "examId": "e1", "marks": [{ "studentId": "s1", "obtainedMarks": 99.5 }] }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Marks Saved Successfully");

  let (_, marks) = send(&app, get("/marks?exam_id=e1")).await;
  let marks = marks.as_array().unwrap();
  assert_eq!(marks.len(), 2);
  assert!(marks.iter().any(|m| m["obtainedMarks"] == 99.5));
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn student_create_update_and_missing() {
  let app = router();
  let (status, body) = send(
    &app,
    json_req(
      "POST",
      "/students",
      json!({
        "name": "Meena K",
        "gender": "Female",
        "dob": "2011-03-03",
        "class": "9",
        "section": "B",
        "admissionDate": "2021-06-01",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["message"], "Student Meena K added successfully.");
  let id = body["data"]["id"].as_str().unwrap().to_owned();

  let (_, found) = send(&app, get("/students?class=9&q=meena")).await;
  assert_eq!(found.as_array().unwrap().len(), 1);

  let mut record = body["data"].clone();
  record["phone"] = json!("9000012345");
  let (status, _) =
    send(&app, json_req("PUT", &format!("/students/{id}"), record.clone())).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(&app, json_req("PUT", "/students/ghost", record)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());

  let (status, _) = send(
    &app,
    json_req(
      "POST",
      "/students",
      json!({
        "name": "No Class",
        "gender": "Male",
        "dob": "2011-03-03",
        "class": "",
        "section": "B",
        "admissionDate": "2021-06-01",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Timetables ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn timetable_put_is_an_upsert() {
  let app = router();
  let (_, mut blank) = send(&app, get("/timetables/9/B")).await;
  assert_eq!(blank["schedule"].as_array().unwrap().len(), 5);
  blank["schedule"][0]["periods"][0] = json!("Tamil");

  let (status, _) = send(&app, json_req("PUT", "/timetables", blank.clone())).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = send(&app, json_req("PUT", "/timetables", blank)).await;
  assert_eq!(status, StatusCode::OK);

  let (_, all) = send(&app, get("/timetables")).await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, stored) = send(&app, get("/timetables/9/B")).await;
  assert_eq!(stored["schedule"][0]["periods"][0], "Tamil");
}

// ─── Leave ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn leave_lifecycle() {
  let app = router();
  let (status, body) = send(
    &app,
    json_req(
      "POST",
      "/leaves",
      json!({
        "userId": "t2",
        "userName": "Mr. David Raj",
        "userRole": "TEACHER",
        "designation": "BT Assistant",
        "fromDate": "2024-01-20",
        "reason": "Personal",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["data"]["status"], "Pending");
  assert_eq!(body["data"]["appliedOn"], "2024-01-15");
  let id = body["data"]["id"].as_str().unwrap().to_owned();

  let (_, inbox) = send(&app, get("/leaves/inbox?role=ADMIN&status=Pending")).await;
  assert_eq!(inbox.as_array().unwrap().len(), 2);

  let uri = format!("/leaves/{id}/status");
  let (status, body) =
    send(&app, json_req("PUT", &uri, json!({ "status": "approve" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Approved");

  let (status, _) =
    send(&app, json_req("PUT", &uri, json!({ "status": "Pending" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    json_req("PUT", "/leaves/nope/status", json!({ "status": "Rejected" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn applied_leave_is_pending_whatever_status_is_sent() {
  let app = router();
  let (status, body) = send(
    &app,
    json_req(
      "POST",
      "/leaves",
      json!({
        "userId": "s2",
        "userName": "Priya Dharshini",
        "userRole": "STUDENT",
        "class": "10",
        "section": "A",
        "fromDate": "2024-01-18",
        "toDate": "2024-01-19",
        "reason": "Family function",
        "status": "Approved",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["data"]["status"], "Pending");
  let id = body["data"]["id"].as_str().unwrap().to_owned();

  let (status, stored) = send(&app, get(&format!("/leaves/{id}"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stored["status"], "Pending");
}

#[tokio::test]
async fn inbox_routing() {
  let app = router();
  let (_, teacher) =
    send(&app, get("/leaves/inbox?role=TEACHER&class=10&section=A")).await;
  assert_eq!(teacher.as_array().unwrap().len(), 2);

  let (_, admin) = send(&app, get("/leaves/inbox?role=admin")).await;
  let admin = admin.as_array().unwrap();
  assert_eq!(admin.len(), 1);
  assert_eq!(admin[0]["userRole"], "TEACHER");

  let (status, _) = send(&app, get("/leaves/inbox?role=TEACHER")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Bulletin & overview ─────────────────────────────────────────────────────

#[tokio::test]
async fn notices_post_and_delete() {
  let app = router();
  let (status, body) = send(
    &app,
    json_req(
      "POST",
      "/notices",
      json!({ "title": "Sports Day", "message": "Friday 10am", "type": "success" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["date"], "2024-01-15");
  let id = body["id"].as_str().unwrap().to_owned();

  let (_, notices) = send(&app, get("/notices")).await;
  assert_eq!(notices[0]["id"], id.as_str());

  let delete = |uri: String| {
    Request::builder()
      .method("DELETE")
      .uri(uri)
      .body(Body::empty())
      .unwrap()
  };
  let (status, _) = send(&app, delete(format!("/notices/{id}"))).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, delete(format!("/notices/{id}"))).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn dashboard_and_rosters() {
  let app = router();
  let (_, dash) = send(&app, get("/dashboard")).await;
  assert_eq!(dash["totalStudents"], 3);
  assert_eq!(dash["absentToday"], 1);
  assert_eq!(dash["passPercentage"], "100.0");
  assert_eq!(dash["gender"]["male"], 2);

  let (_, rosters) = send(&app, get("/rosters")).await;
  assert_eq!(rosters["classes"], json!(["9", "10"]));

  let (_, docs) = send(&app, get("/documents?q=question")).await;
  assert_eq!(docs.as_array().unwrap().len(), 1);
}
