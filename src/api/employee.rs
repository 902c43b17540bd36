use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::handlers::{fetch_employee, insert_employee, RegisterRequest, EMPLOYEE_COLUMNS};
use crate::core::{audit, balance};
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::enums::{Gender, Role};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Case-insensitive match on name, email or employee code
    pub search: Option<String>,
    pub department: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
    pub gender: Option<Gender>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
}

/// Create employee (admin)
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 400, description = "Email already registered"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let mut tx = pool.begin().await?;
    let id = insert_employee(&mut tx, &payload).await?;
    let employee = fetch_employee(&mut tx, id).await?;

    audit::append(
        &mut tx,
        auth.user_id,
        "employee_created",
        &format!("Created new employee: {}", employee.name),
        Some(json!({ "employee_id": id, "employee_name": employee.name })),
    )
    .await?;

    tx.commit().await?;
    info!(employee_id = id, "employee created");
    Ok(HttpResponse::Ok().json(employee))
}

/// List employees (admin)
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(search) = query.search.as_deref() {
        where_sql.push_str(" AND (name LIKE ? OR email LIKE ? OR employee_code LIKE ?)");
        let pattern = format!("%{}%", search);
        args.push(FilterValue::Str(pattern.clone()));
        args.push(FilterValue::Str(pattern.clone()));
        args.push(FilterValue::Str(pattern));
    }
    if let Some(department) = query.department.as_deref() {
        where_sql.push_str(" AND department = ?");
        args.push(FilterValue::Str(department.to_string()));
    }

    let count_sql = format!("SELECT COUNT(*) FROM employees{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::Str(s) => count_q.bind(s.clone()),
        };
    }
    let total = count_q.fetch_one(pool.get_ref()).await?;

    let data_sql = format!(
        "SELECT {} FROM employees{} ORDER BY id LIMIT ? OFFSET ?",
        EMPLOYEE_COLUMNS, where_sql
    );
    let mut data_q = sqlx::query_as::<_, Employee>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(s) => data_q.bind(s),
        };
    }
    let data = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Fetch one employee (admin)
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = Employee),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let mut conn = pool.acquire().await?;
    let employee = fetch_employee(&mut conn, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update employee (admin)
///
/// A gender change re-derives maternity/paternity balances.
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated employee", body = Employee),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    let mut tx = pool.begin().await?;
    let current = fetch_employee(&mut tx, employee_id).await?;

    if let Some(name) = payload.name.as_deref() {
        sqlx::query("UPDATE employees SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(Utc::now())
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(email) = payload.email.as_deref() {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? AND id != ? LIMIT 1)",
        )
        .bind(email.to_lowercase())
        .bind(employee_id)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(ApiError::Validation("Email already registered".into()));
        }
        sqlx::query("UPDATE employees SET email = ?, updated_at = ? WHERE id = ?")
            .bind(email.to_lowercase())
            .bind(Utc::now())
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(department) = payload.department.as_deref() {
        sqlx::query("UPDATE employees SET department = ?, updated_at = ? WHERE id = ?")
            .bind(department)
            .bind(Utc::now())
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(role) = payload.role {
        sqlx::query("UPDATE employees SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role)
            .bind(Utc::now())
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(gender) = payload.gender {
        if current.gender != Some(gender) {
            balance::apply_gender_change(&mut tx, employee_id, Some(gender)).await?;
        }
    }

    let updated = fetch_employee(&mut tx, employee_id).await?;

    audit::append(
        &mut tx,
        auth.user_id,
        "employee_updated",
        &format!("Updated employee: {}", updated.name),
        Some(json!({ "employee_id": employee_id })),
    )
    .await?;

    tx.commit().await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete employee (admin)
///
/// Refuses admin accounts. Cascades to the employee's leave requests,
/// calendar rows and audit entries.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 400, description = "Cannot delete admin user"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    let mut tx = pool.begin().await?;
    let employee = fetch_employee(&mut tx, employee_id).await?;
    if employee.role == Role::Admin {
        return Err(ApiError::Validation("Cannot delete admin user".into()));
    }

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

    audit::append(
        &mut tx,
        auth.user_id,
        "employee_deleted",
        &format!("Deleted employee: {}", employee.name),
        Some(json!({ "employee_id": employee_id, "employee_name": employee.name })),
    )
    .await?;

    tx.commit().await?;
    info!(employee_id, "employee deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted successfully" })))
}
