use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_code   TEXT    NOT NULL UNIQUE,
    name            TEXT    NOT NULL,
    email           TEXT    NOT NULL UNIQUE,
    password_hash   TEXT    NOT NULL,
    role            TEXT    NOT NULL DEFAULT 'employee',
    department      TEXT    NOT NULL,
    gender          TEXT,
    annual_leave    INTEGER NOT NULL DEFAULT 20,
    sick_leave      INTEGER NOT NULL DEFAULT 10,
    personal_leave  INTEGER NOT NULL DEFAULT 5,
    emergency_leave INTEGER NOT NULL DEFAULT 5,
    maternity_leave INTEGER NOT NULL DEFAULT 0,
    paternity_leave INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT    NOT NULL,
    updated_at      TEXT
);

CREATE TABLE IF NOT EXISTS leave_requests (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id   INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    leave_type    TEXT    NOT NULL,
    start_date    TEXT    NOT NULL,
    end_date      TEXT    NOT NULL,
    duration      INTEGER NOT NULL,
    reason        TEXT    NOT NULL,
    status        TEXT    NOT NULL DEFAULT 'pending',
    admin_comment TEXT,
    created_at    TEXT    NOT NULL,
    updated_at    TEXT
);

CREATE INDEX IF NOT EXISTS idx_leave_requests_employee ON leave_requests(employee_id);
CREATE INDEX IF NOT EXISTS idx_leave_requests_status   ON leave_requests(status);

CREATE TABLE IF NOT EXISTS leave_calendar (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id      INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    leave_request_id INTEGER NOT NULL REFERENCES leave_requests(id) ON DELETE CASCADE,
    leave_date       TEXT    NOT NULL,
    leave_type       TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_leave_calendar_date    ON leave_calendar(leave_date);
CREATE INDEX IF NOT EXISTS idx_leave_calendar_request ON leave_calendar(leave_request_id);

CREATE TABLE IF NOT EXISTS audit_logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    action      TEXT    NOT NULL,
    description TEXT    NOT NULL,
    details     TEXT,
    timestamp   TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_audit_logs_user ON audit_logs(user_id);
"#;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    apply_schema(&pool).await.expect("Failed to apply schema");

    pool
}

pub async fn apply_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement).execute(pool).await?;
        }
    }
    Ok(())
}
