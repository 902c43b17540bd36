use serde::{Deserialize, Serialize};

use crate::model::enums::Role;

/// Access-token claims. `sub` carries the account email; `user_id` is the
/// employee row id every ownership check runs against.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
