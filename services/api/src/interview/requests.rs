use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct NextStepRequest {
    #[serde(default)]
    pub skip: bool,
}
