use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StartVerificationResponse {
    pub auth_url: String,
}

#[derive(Debug, Serialize)]
pub struct VerificationCallbackResponse {
    pub status: String,
}
