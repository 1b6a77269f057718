use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Looking to buy or invest in land
    Inversionista,
    /// Owns or works the land
    Agricultor,
    #[value(skip)]
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Inversionista => "inversionista",
            Role::Agricultor => "agricultor",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "foto_perfil", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Response of `POST /auth/signin`: the user plus a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedInUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}
