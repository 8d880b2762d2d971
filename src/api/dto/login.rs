/*
 * Responsibility
 * - /api/login の request DTO
 * - validate() で長さチェック (文字数単位)
 */
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let username = self.username.chars().count();
        if !(3..=50).contains(&username) {
            return Err("username must be 3-50 characters");
        }

        let password = self.password.chars().count();
        if !(3..=100).contains(&password) {
            return Err("password must be 3-100 characters");
        }

        Ok(())
    }
}
