use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::core::{audit, balance};
use crate::error::ApiError;
use crate::model::employee::{parental_balances, Employee};
use crate::model::enums::{Gender, Role};

pub(crate) const EMPLOYEE_COLUMNS: &str = "id, employee_code, name, email, password_hash, role, \
     department, gender, annual_leave, sick_leave, personal_leave, emergency_leave, \
     maternity_leave, paternity_leave, created_at, updated_at";

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    pub password: String,
    /// Defaults to `employee`
    pub role: Option<Role>,
    #[schema(example = "Engineering")]
    pub department: String,
    pub gender: Option<Gender>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub department: Option<String>,
    pub gender: Option<Gender>,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangeEmail {
    /// Current password, re-verified before the address moves
    pub password: String,
    #[schema(example = "new.address@company.com", format = "email")]
    pub new_email: String,
}

pub(crate) async fn fetch_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Employee, ApiError> {
    let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
    sqlx::query_as::<_, Employee>(&sql)
        .bind(employee_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))
}

/// Insert a new employee row with gender-derived parental balances and a
/// generated EMPnnn code. Returns the new row id.
pub(crate) async fn insert_employee(
    conn: &mut SqliteConnection,
    input: &RegisterRequest,
) -> Result<i64, ApiError> {
    let taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)")
            .bind(input.email.to_lowercase())
            .fetch_one(&mut *conn)
            .await?;
    if taken {
        return Err(ApiError::Validation("Email already registered".into()));
    }

    let last_code: Option<String> =
        sqlx::query_scalar("SELECT employee_code FROM employees ORDER BY id DESC LIMIT 1")
            .fetch_optional(&mut *conn)
            .await?;
    let next = last_code
        .and_then(|code| code.trim_start_matches("EMP").parse::<u32>().ok())
        .unwrap_or(0)
        + 1;
    let employee_code = format!("EMP{:03}", next);

    let (maternity, paternity) = parental_balances(input.gender);

    let result = sqlx::query(
        r#"
        INSERT INTO employees
            (employee_code, name, email, password_hash, role, department, gender,
             maternity_leave, paternity_leave, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee_code)
    .bind(&input.name)
    .bind(input.email.to_lowercase())
    .bind(hash_password(&input.password))
    .bind(input.role.unwrap_or(Role::Employee))
    .bind(&input.department)
    .bind(input.gender)
    .bind(maternity)
    .bind(paternity)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = Employee),
        (status = 400, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    pool: web::Data<SqlitePool>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.name.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Name and password must not be empty".into(),
        ));
    }

    let mut tx = pool.begin().await?;
    let id = insert_employee(&mut tx, &payload).await?;
    let employee = fetch_employee(&mut tx, id).await?;
    tx.commit().await?;

    info!(employee_id = id, "account registered");
    Ok(HttpResponse::Ok().json(employee))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, payload), fields(email = %payload.email))]
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> actix_web::Result<HttpResponse> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        info!("validation failed: empty email or password");
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "validation_error",
            "message": "Email and password are required"
        })));
    }

    debug!("fetching account");
    let sql = format!(
        "SELECT {} FROM employees WHERE email = ?",
        EMPLOYEE_COLUMNS
    );
    let employee = match sqlx::query_as::<_, Employee>(&sql)
        .bind(payload.email.to_lowercase())
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(e)) => e,
        Ok(None) => {
            info!("invalid credentials: account not found");
            return Ok(HttpResponse::Unauthorized().json(json!({
                "error": "unauthorized",
                "message": "Incorrect email or password"
            })));
        }
        Err(e) => return Err(ApiError::Storage(e).into()),
    };

    if verify_password(&payload.password, &employee.password_hash).is_err() {
        info!("invalid credentials: password mismatch");
        return Ok(HttpResponse::Unauthorized().json(json!({
            "error": "unauthorized",
            "message": "Incorrect email or password"
        })));
    }

    let access_token = generate_access_token(
        employee.id,
        employee.email.clone(),
        employee.role,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    info!(user_id = employee.id, "login successful");
    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Logout
///
/// Tokens are stateless; invalidation is handled client-side by dropping the
/// token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Logged out")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(_auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Successfully logged out" }))
}

/// Change own email
///
/// Requires the current password. The issued token stays valid; identity is
/// keyed on the employee id, not the address.
#[utoipa::path(
    post,
    path = "/auth/change-email",
    request_body = ChangeEmail,
    responses(
        (status = 200, description = "Email changed"),
        (status = 400, description = "Wrong password, address in use, or unchanged")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn change_email(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<ChangeEmail>,
) -> Result<HttpResponse, ApiError> {
    let new_email = payload.new_email.to_lowercase();

    let mut tx = pool.begin().await?;

    let employee = fetch_employee(&mut tx, auth.user_id).await?;
    if verify_password(&payload.password, &employee.password_hash).is_err() {
        return Err(ApiError::Validation("Password is incorrect".into()));
    }
    if new_email == employee.email.to_lowercase() {
        return Err(ApiError::Validation(
            "New email is the same as current email".into(),
        ));
    }
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? AND id != ? LIMIT 1)",
    )
    .bind(&new_email)
    .bind(auth.user_id)
    .fetch_one(&mut *tx)
    .await?;
    if taken {
        return Err(ApiError::Validation(
            "Email is already in use by another account".into(),
        ));
    }

    sqlx::query("UPDATE employees SET email = ?, updated_at = ? WHERE id = ?")
        .bind(&new_email)
        .bind(Utc::now())
        .bind(auth.user_id)
        .execute(&mut *tx)
        .await?;

    audit::append(
        &mut tx,
        auth.user_id,
        "email_changed",
        &format!("User changed email from {} to {}", employee.email, new_email),
        Some(json!({
            "user_id": auth.user_id,
            "old_email": employee.email,
            "new_email": new_email,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Email changed successfully",
        "new_email": new_email
    })))
}

/// Current account profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the authenticated user", body = Employee),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    let employee = fetch_employee(&mut conn, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/api/profile/password",
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is incorrect")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn change_password(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<ChangePassword>,
) -> Result<HttpResponse, ApiError> {
    let mut tx = pool.begin().await?;

    let employee = fetch_employee(&mut tx, auth.user_id).await?;
    if verify_password(&payload.current_password, &employee.password_hash).is_err() {
        return Err(ApiError::Validation("Current password is incorrect".into()));
    }

    sqlx::query("UPDATE employees SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(hash_password(&payload.new_password))
        .bind(Utc::now())
        .bind(auth.user_id)
        .execute(&mut *tx)
        .await?;

    audit::append(
        &mut tx,
        auth.user_id,
        "password_changed",
        &format!("User {} changed their password", employee.name),
        Some(json!({ "user_id": auth.user_id })),
    )
    .await?;

    tx.commit().await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password changed successfully" })))
}

/// Update own profile
///
/// A gender change re-derives maternity/paternity balances; the other
/// counters are preserved.
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Updated profile", body = Employee),
        (status = 400, description = "No fields to update")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    if payload.name.is_none() && payload.department.is_none() && payload.gender.is_none() {
        return Err(ApiError::Validation("No fields to update".into()));
    }

    let mut tx = pool.begin().await?;
    let current = fetch_employee(&mut tx, auth.user_id).await?;

    if let Some(name) = payload.name.as_deref() {
        sqlx::query("UPDATE employees SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(Utc::now())
            .bind(auth.user_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(department) = payload.department.as_deref() {
        sqlx::query("UPDATE employees SET department = ?, updated_at = ? WHERE id = ?")
            .bind(department)
            .bind(Utc::now())
            .bind(auth.user_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(gender) = payload.gender {
        if current.gender != Some(gender) {
            balance::apply_gender_change(&mut tx, auth.user_id, Some(gender)).await?;
        }
    }

    audit::append(
        &mut tx,
        auth.user_id,
        "profile_updated",
        &format!("User {} updated their profile", current.name),
        Some(json!({
            "user_id": auth.user_id,
            "name": payload.name,
            "department": payload.department,
            "gender": payload.gender,
        })),
    )
    .await?;

    let updated = fetch_employee(&mut tx, auth.user_id).await?;
    tx.commit().await?;
    Ok(HttpResponse::Ok().json(updated))
}
