mod common;

use actix_web::http::Method;
use actix_web::test;
use actix_web::web::Data;
use actix_web::App;
use serde_json::json;

use common::{read_json, register_and_login, request, test_config, test_pool};
use lms::routes;

macro_rules! app {
    ($pool:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new($config.clone()))
                .configure(|cfg| routes::configure(cfg, $config.clone())),
        )
        .await
    };
}

#[actix_web::test]
async fn employee_creation_assigns_codes_and_parental_balances() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let admin = register_and_login(&app, "Admin", "admin@corp.com", Some("admin"), None).await;

    let resp = request(
        &app,
        Method::POST,
        "/api/employees",
        Some(&admin),
        Some(json!({
            "name": "Grace",
            "email": "grace@corp.com",
            "password": "secret123",
            "department": "Finance",
            "gender": "female",
        })),
    )
    .await;
    assert!(resp.status().is_success());
    let grace = read_json(resp).await;
    assert_eq!(grace["employee_code"], "EMP002");
    assert_eq!(grace["maternity_leave"], 90);
    assert_eq!(grace["paternity_leave"], 0);
    assert_eq!(grace["annual_leave"], 20);

    let resp = request(
        &app,
        Method::POST,
        "/api/employees",
        Some(&admin),
        Some(json!({
            "name": "Hank",
            "email": "hank@corp.com",
            "password": "secret123",
            "department": "Finance",
            "gender": "male",
        })),
    )
    .await;
    let hank = read_json(resp).await;
    assert_eq!(hank["employee_code"], "EMP003");
    assert_eq!(hank["maternity_leave"], 0);
    assert_eq!(hank["paternity_leave"], 15);

    // Duplicate email is refused.
    let resp = request(
        &app,
        Method::POST,
        "/api/employees",
        Some(&admin),
        Some(json!({
            "name": "Grace Again",
            "email": "grace@corp.com",
            "password": "secret123",
            "department": "Finance",
        })),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(read_json(resp).await["message"], "Email already registered");
}

#[actix_web::test]
async fn employee_endpoints_require_admin() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let emp = register_and_login(&app, "Ivy", "ivy@corp.com", None, None).await;

    for (method, uri) in [
        (Method::GET, "/api/employees"),
        (Method::GET, "/api/employees/1"),
        (Method::DELETE, "/api/employees/1"),
        (Method::GET, "/api/logs"),
        (Method::GET, "/api/analytics/summary"),
        (Method::GET, "/api/analytics/departments"),
        (Method::GET, "/api/calendar/employees"),
        (Method::POST, "/api/maintenance/expire-leaves"),
    ] {
        let resp = request(&app, method, uri, Some(&emp), None).await;
        assert_eq!(resp.status(), 403, "expected 403 for {}", uri);
    }
}

#[actix_web::test]
async fn employee_search_and_update() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let admin = register_and_login(&app, "Admin", "admin@corp.com", Some("admin"), None).await;
    register_and_login(&app, "Jack", "jack@corp.com", None, Some("male")).await;

    let resp = request(
        &app,
        Method::GET,
        "/api/employees?search=jack",
        Some(&admin),
        None,
    )
    .await;
    let body = read_json(resp).await;
    assert_eq!(body["total"], 1);
    let jack_id = body["data"][0]["id"].as_i64().unwrap();
    assert_eq!(body["data"][0]["paternity_leave"], 15);

    // Department move plus a gender change re-deriving parental balances.
    let resp = request(
        &app,
        Method::PUT,
        &format!("/api/employees/{}", jack_id),
        Some(&admin),
        Some(json!({ "department": "Support", "gender": "female" })),
    )
    .await;
    assert!(resp.status().is_success());
    let updated = read_json(resp).await;
    assert_eq!(updated["department"], "Support");
    assert_eq!(updated["maternity_leave"], 90);
    assert_eq!(updated["paternity_leave"], 0);

    let resp = request(
        &app,
        Method::GET,
        "/api/employees?department=Support",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(read_json(resp).await["total"], 1);
}

#[actix_web::test]
async fn deleting_an_employee_cascades_and_admins_are_protected() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let admin = register_and_login(&app, "Admin", "admin@corp.com", Some("admin"), None).await;
    let kim = register_and_login(&app, "Kim", "kim@corp.com", None, None).await;

    let resp = request(
        &app,
        Method::POST,
        "/api/leaves",
        Some(&kim),
        Some(json!({
            "leave_type": "annual",
            "start_date": "2027-10-01",
            "end_date": "2027-10-02",
            "reason": "Break",
        })),
    )
    .await;
    assert!(resp.status().is_success());

    let kim_id: i64 = sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
        .bind("kim@corp.com")
        .fetch_one(&pool)
        .await
        .unwrap();

    let resp = request(
        &app,
        Method::DELETE,
        &format!("/api/employees/{}", kim_id),
        Some(&admin),
        None,
    )
    .await;
    assert!(resp.status().is_success());

    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests WHERE employee_id = ?")
            .bind(kim_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0);

    let resp = request(
        &app,
        Method::GET,
        &format!("/api/employees/{}", kim_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(resp.status(), 404);

    // An admin account cannot be deleted.
    let admin_id: i64 = sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
        .bind("admin@corp.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    let resp = request(
        &app,
        Method::DELETE,
        &format!("/api/employees/{}", admin_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(read_json(resp).await["message"], "Cannot delete admin user");
}

#[actix_web::test]
async fn audit_trail_lists_filters_and_purges() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let admin = register_and_login(&app, "Admin", "admin@corp.com", Some("admin"), None).await;
    let lena = register_and_login(&app, "Lena", "lena@corp.com", None, None).await;

    let resp = request(
        &app,
        Method::POST,
        "/api/leaves",
        Some(&lena),
        Some(json!({
            "leave_type": "annual",
            "start_date": "2027-11-02",
            "end_date": "2027-11-03",
            "reason": "Break",
        })),
    )
    .await;
    let request_id = read_json(resp).await["id"].as_i64().unwrap();

    let resp = request(
        &app,
        Method::PUT,
        &format!("/api/leaves/{}/approve", request_id),
        Some(&admin),
        Some(json!({})),
    )
    .await;
    assert!(resp.status().is_success());

    let resp = request(
        &app,
        Method::GET,
        "/api/logs?action=leave_approved",
        Some(&admin),
        None,
    )
    .await;
    let body = read_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["user_name"], "Admin");
    assert_eq!(
        body["data"][0]["description"],
        "Approved leave request from Lena"
    );

    let resp = request(&app, Method::GET, "/api/logs?search=Lena", Some(&admin), None).await;
    assert!(read_json(resp).await["total"].as_i64().unwrap() >= 2);

    let resp = request(&app, Method::DELETE, "/api/logs", Some(&admin), None).await;
    assert!(resp.status().is_success());
    assert!(read_json(resp).await["deleted_count"].as_i64().unwrap() >= 2);

    // The purge itself is the only entry left.
    let resp = request(&app, Method::GET, "/api/logs", Some(&admin), None).await;
    let body = read_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["action"], "logs_purged");
}

#[actix_web::test]
async fn analytics_roll_up_by_status_type_and_department() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let admin = register_and_login(&app, "Admin", "admin@corp.com", Some("admin"), None).await;
    let mia = register_and_login(&app, "Mia", "mia@corp.com", None, None).await;

    let resp = request(
        &app,
        Method::POST,
        "/api/leaves",
        Some(&mia),
        Some(json!({
            "leave_type": "annual",
            "start_date": "2027-12-01",
            "end_date": "2027-12-03",
            "reason": "Break",
        })),
    )
    .await;
    let approved_id = read_json(resp).await["id"].as_i64().unwrap();
    let resp = request(
        &app,
        Method::PUT,
        &format!("/api/leaves/{}/approve", approved_id),
        Some(&admin),
        Some(json!({})),
    )
    .await;
    assert!(resp.status().is_success());

    let resp = request(
        &app,
        Method::POST,
        "/api/leaves",
        Some(&mia),
        Some(json!({
            "leave_type": "sick",
            "start_date": "2027-12-10",
            "end_date": "2027-12-10",
            "reason": "Cold",
        })),
    )
    .await;
    assert!(resp.status().is_success());

    let resp = request(&app, Method::GET, "/api/analytics/summary", Some(&admin), None).await;
    let summary = read_json(resp).await;
    assert_eq!(summary["total_employees"], 2);
    assert_eq!(summary["total_requests"], 2);
    assert_eq!(summary["requests_by_status"]["approved"], 1);
    assert_eq!(summary["requests_by_status"]["pending"], 1);
    assert_eq!(summary["pending_requests"], 1);
    assert_eq!(summary["approved_days_by_type"]["annual"], 3);

    let resp = request(
        &app,
        Method::GET,
        "/api/analytics/departments",
        Some(&admin),
        None,
    )
    .await;
    let departments = read_json(resp).await;
    let row = departments
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["department"] == "Engineering")
        .unwrap();
    assert_eq!(row["employees"], 2);
    assert_eq!(row["requests"], 2);
    assert_eq!(row["approved_days"], 3);

    let mia_id: i64 = sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
        .bind("mia@corp.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    let resp = request(
        &app,
        Method::GET,
        &format!("/api/analytics/employee/{}", mia_id),
        Some(&admin),
        None,
    )
    .await;
    let per_employee = read_json(resp).await;
    assert_eq!(per_employee["balances"]["annual"], 17);
    assert_eq!(per_employee["requests_by_status"]["pending"], 1);
    assert_eq!(per_employee["approved_days_by_type"]["annual"], 3);
}

#[actix_web::test]
async fn profile_password_change_and_gender_update() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let nora = register_and_login(&app, "Nora", "nora@corp.com", None, None).await;

    let resp = request(
        &app,
        Method::PUT,
        "/api/profile/password",
        Some(&nora),
        Some(json!({ "current_password": "wrong", "new_password": "changed456" })),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = request(
        &app,
        Method::PUT,
        "/api/profile/password",
        Some(&nora),
        Some(json!({ "current_password": "secret123", "new_password": "changed456" })),
    )
    .await;
    assert!(resp.status().is_success());

    let resp = request(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nora@corp.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = request(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nora@corp.com", "password": "changed456" })),
    )
    .await;
    assert!(resp.status().is_success());

    let resp = request(
        &app,
        Method::PUT,
        "/api/profile",
        Some(&nora),
        Some(json!({ "gender": "female" })),
    )
    .await;
    assert!(resp.status().is_success());
    let profile = read_json(resp).await;
    assert_eq!(profile["gender"], "female");
    assert_eq!(profile["maternity_leave"], 90);
}

#[actix_web::test]
async fn email_change_verifies_password_and_uniqueness() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    register_and_login(&app, "Pia", "pia@corp.com", None, None).await;
    let quinn = register_and_login(&app, "Quinn", "quinn@corp.com", None, None).await;

    let resp = request(
        &app,
        Method::POST,
        "/auth/change-email",
        Some(&quinn),
        Some(json!({ "password": "wrong", "new_email": "quinn.new@corp.com" })),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(read_json(resp).await["message"], "Password is incorrect");

    let resp = request(
        &app,
        Method::POST,
        "/auth/change-email",
        Some(&quinn),
        Some(json!({ "password": "secret123", "new_email": "QUINN@corp.com" })),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(
        read_json(resp).await["message"],
        "New email is the same as current email"
    );

    let resp = request(
        &app,
        Method::POST,
        "/auth/change-email",
        Some(&quinn),
        Some(json!({ "password": "secret123", "new_email": "pia@corp.com" })),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(
        read_json(resp).await["message"],
        "Email is already in use by another account"
    );

    let resp = request(
        &app,
        Method::POST,
        "/auth/change-email",
        Some(&quinn),
        Some(json!({ "password": "secret123", "new_email": "Quinn.New@corp.com" })),
    )
    .await;
    assert!(resp.status().is_success());
    assert_eq!(read_json(resp).await["new_email"], "quinn.new@corp.com");

    // The new address logs in; the change is on the audit trail.
    let resp = request(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "quinn.new@corp.com", "password": "secret123" })),
    )
    .await;
    assert!(resp.status().is_success());

    let changes: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE action = 'email_changed'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(changes, 1);

    let resp = request(&app, Method::POST, "/auth/logout", Some(&quinn), None).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn admin_email_update_refuses_duplicates() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let admin = register_and_login(&app, "Admin", "admin@corp.com", Some("admin"), None).await;
    register_and_login(&app, "Rae", "rae@corp.com", None, None).await;
    register_and_login(&app, "Sam", "sam@corp.com", None, None).await;

    let sam_id: i64 = sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
        .bind("sam@corp.com")
        .fetch_one(&pool)
        .await
        .unwrap();

    let resp = request(
        &app,
        Method::PUT,
        &format!("/api/employees/{}", sam_id),
        Some(&admin),
        Some(json!({ "email": "rae@corp.com" })),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body = read_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Email already registered");

    // Re-binding an employee's own address is not a conflict.
    let resp = request(
        &app,
        Method::PUT,
        &format!("/api/employees/{}", sam_id),
        Some(&admin),
        Some(json!({ "email": "sam@corp.com" })),
    )
    .await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn holidays_filter_by_range() {
    let pool = test_pool().await;
    let config = test_config();
    let app = app!(pool, config);

    let emp = register_and_login(&app, "Omar", "omar@corp.com", None, None).await;

    let resp = request(
        &app,
        Method::GET,
        "/api/holidays?start_date=2026-01-01&end_date=2026-01-31",
        Some(&emp),
        None,
    )
    .await;
    let holidays = read_json(resp).await;
    let names: Vec<&str> = holidays
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Republic Day"));
    assert!(names.contains(&"Makar Sankranti"));
    assert_eq!(names.len(), 2);
}
