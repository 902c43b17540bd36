use actix_web::{web, HttpResponse};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::holidays::{self, Holiday};

#[derive(Deserialize, IntoParams)]
pub struct HolidayQuery {
    /// Defaults to January 1st of the current year
    pub start_date: Option<NaiveDate>,
    /// Defaults to December 31st of the current year
    pub end_date: Option<NaiveDate>,
}

/// Public holidays in a date range
#[utoipa::path(
    get,
    path = "/api/holidays",
    params(HolidayQuery),
    responses(
        (status = 200, description = "Holidays inside the range", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    config: web::Data<Config>,
    query: web::Query<HolidayQuery>,
) -> Result<HttpResponse, ApiError> {
    let year = config.today().year();
    let start = query
        .start_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap());
    let end = query
        .end_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 12, 31).unwrap());
    if end < start {
        return Err(ApiError::Validation(
            "End date cannot be before start date".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(holidays::in_range(start, end)))
}
