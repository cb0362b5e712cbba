use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub app_name: String,
    pub app_description: String,
    pub region: Option<String>,
    pub model_key: Option<String>,
    #[serde(default)]
    pub allow_fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetPolicyRequest {
    pub text: String,
}
