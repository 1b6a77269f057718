use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::domain::{Role, SignedInUser};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest<'a> {
    pub nombre: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub rol: Role,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    message: String,
}

impl ApiClient {
    /// `POST /auth/signin`. The caller is responsible for storing the token.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<SignedInUser, ApiError> {
        self.post("/auth/signin", &SignInRequest { email, password })
    }

    /// `POST /auth/signup`, returning the backend's confirmation message.
    pub fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<String, ApiError> {
        let response: SignUpResponse = self.post(
            "/auth/signup",
            &SignUpRequest {
                nombre: name,
                email,
                password,
                rol: role,
            },
        )?;
        Ok(response.message)
    }
}
