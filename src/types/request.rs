use serde::Deserialize;

#[derive(Deserialize)]
pub(crate) struct LoginData {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshData {
    #[serde(default)]
    pub(crate) refresh_token: String,
}
