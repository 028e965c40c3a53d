use crate::models::{NameRecord, UpdateResponse};
use crate::storage::{clear_token_from_storage, load_token_from_storage, save_token_to_storage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    GraphQl,
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    fn graphql(messages: Vec<String>) -> Self {
        Self {
            kind: ApiErrorKind::GraphQl,
            message: messages.join("; "),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8000".to_string();

        // Both `window.ENV.API_URL` and the lower-case `window.ENV.api_url` are accepted.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for field in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &field.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) const AUTHORS_QUERY: &str = r#"
query getNameAuthors($wfo: String!){
    getNameForWfoId(id: $wfo){
        id,
        canEdit,
        authorsString
    }
}
"#;

pub(crate) const HYBRID_QUERY: &str = r#"
query getHybridStatus($wfo: String!){
    getNameForWfoId(id: $wfo){
        id,
        canEdit,
        wfo,
        taxonPlacement{
            id,
            isHybrid,
            acceptedName{
                id,
                wfo
            }
        }
    }
}
"#;

pub(crate) const HEADER_QUERY: &str = r#"
query getHeaderInfo($wfo: String!){
    getNameForWfoId(id: $wfo){
        id,
        wfo,
        status,
        fullNameString,
        taxonPlacement{
            id,
            rank{
                name
            },
            acceptedName{
                id
            }
        }
    }
}
"#;

pub(crate) const UPDATE_AUTHORS: &str = r#"
mutation updateAuthorsString(
    $wfo: String!,
    $authorsString: String!
){
    updateAuthorsString(
        wfo: $wfo,
        authorsString: $authorsString
    ){
        name,
        success,
        message,
        children{
            name,
            success,
            message
        }
    }
}
"#;

pub(crate) const UPDATE_HYBRID: &str = r#"
mutation updateHybridStatus(
    $id: Int!,
    $isHybrid: Boolean!
){
    updateHybridStatus(
        id: $id,
        isHybrid: $isHybrid
    ){
        name,
        success,
        message,
        children{
            name,
            success,
            message
        }
    }
}
"#;

#[derive(Serialize, Clone, Debug)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

#[derive(Deserialize, Clone, Debug)]
struct GraphQlErrorEntry {
    message: String,
}

#[derive(Deserialize, Clone, Debug)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    #[allow(dead_code)]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        Self {
            base_url: EnvConfig::new().api_url,
            token: load_token_from_storage(),
        }
    }

    pub fn save_to_storage(&self) {
        if let Some(token) = &self.token {
            save_token_to_storage(token);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        clear_token_from_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url.trim_end_matches('/'))
    }

    /// Unwrap a GraphQL envelope and return `data.{field}`.
    ///
    /// Any entry in `errors` fails the whole call, even when partial data came back.
    pub(crate) fn parse_graphql_field(body: serde_json::Value, field: &str) -> ApiResult<serde_json::Value> {
        let env: GraphQlEnvelope = serde_json::from_value(body).map_err(ApiError::parse)?;
        if !env.errors.is_empty() {
            return Err(ApiError::graphql(
                env.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        env.data
            .and_then(|d| d.get(field).cloned())
            .ok_or_else(|| ApiError::parse(format!("response is missing `{field}`")))
    }

    async fn request_graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
        field: &str,
    ) -> ApiResult<serde_json::Value> {
        let client = reqwest::Client::new();
        let mut req = client.post(self.graphql_url());
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }

        let res = req
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            let body: serde_json::Value = res.json().await.map_err(ApiError::parse)?;
            Self::parse_graphql_field(body, field)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "GraphQL request failed"))
        }
    }

    /// `null` for an unknown wfo id.
    async fn get_name(&self, query: &str, wfo: &str) -> ApiResult<Option<NameRecord>> {
        let v = self
            .request_graphql(query, serde_json::json!({ "wfo": wfo }), "getNameForWfoId")
            .await?;
        if v.is_null() {
            return Ok(None);
        }
        serde_json::from_value(v).map(Some).map_err(ApiError::parse)
    }

    pub async fn get_name_authors(&self, wfo: &str) -> ApiResult<Option<NameRecord>> {
        self.get_name(AUTHORS_QUERY, wfo).await
    }

    pub async fn get_hybrid_status(&self, wfo: &str) -> ApiResult<Option<NameRecord>> {
        self.get_name(HYBRID_QUERY, wfo).await
    }

    pub async fn get_header_info(&self, wfo: &str) -> ApiResult<Option<NameRecord>> {
        self.get_name(HEADER_QUERY, wfo).await
    }

    pub async fn update_authors_string(
        &self,
        wfo: &str,
        authors_string: &str,
    ) -> ApiResult<UpdateResponse> {
        let v = self
            .request_graphql(
                UPDATE_AUTHORS,
                serde_json::json!({ "wfo": wfo, "authorsString": authors_string }),
                "updateAuthorsString",
            )
            .await?;
        serde_json::from_value(v).map_err(ApiError::parse)
    }

    pub async fn update_hybrid_status(
        &self,
        placement_id: i64,
        is_hybrid: bool,
    ) -> ApiResult<UpdateResponse> {
        let v = self
            .request_graphql(
                UPDATE_HYBRID,
                serde_json::json!({ "id": placement_id, "isHybrid": is_hybrid }),
                "updateHybridStatus",
            )
            .await?;
        serde_json::from_value(v).map_err(ApiError::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_request_serialization() {
        let req = GraphQlRequest {
            query: UPDATE_HYBRID,
            variables: serde_json::json!({ "id": 12, "isHybrid": true }),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["variables"]["id"], 12);
        assert_eq!(v["variables"]["isHybrid"], true);
        assert!(v["query"].as_str().unwrap().contains("updateHybridStatus"));
    }

    #[test]
    fn test_parse_graphql_field_returns_data() {
        let body = serde_json::json!({
            "data": {"getNameForWfoId": {"id": "1", "canEdit": false, "authorsString": "L."}}
        });
        let v = ApiClient::parse_graphql_field(body, "getNameForWfoId").expect("data");
        let r: NameRecord = serde_json::from_value(v).expect("record");
        assert_eq!(r.authors_string.as_deref(), Some("L."));
        assert!(!r.can_edit);
    }

    #[test]
    fn test_parse_graphql_field_surfaces_errors() {
        let body = serde_json::json!({
            "data": null,
            "errors": [{"message": "Not allowed"}, {"message": "Try later"}]
        });
        let e = ApiClient::parse_graphql_field(body, "updateAuthorsString").unwrap_err();
        assert_eq!(e.kind, ApiErrorKind::GraphQl);
        assert_eq!(e.to_string(), "Not allowed; Try later");
    }

    #[test]
    fn test_parse_graphql_field_missing_field_is_parse_error() {
        let body = serde_json::json!({ "data": {} });
        let e = ApiClient::parse_graphql_field(body, "getNameForWfoId").unwrap_err();
        assert_eq!(e.kind, ApiErrorKind::Parse);
    }

    #[test]
    fn test_graphql_url_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/".to_string());
        assert_eq!(client.graphql_url(), "http://localhost:8000/graphql");
    }

    #[test]
    fn test_api_client_auth_header() {
        let mut client = ApiClient::new("http://localhost:8000".to_string());
        assert!(client.get_auth_header().is_none());
        assert!(!client.is_authenticated());
        client.set_token("my-token".to_string());
        assert_eq!(client.get_auth_header().as_deref(), Some("Bearer my-token"));
        assert!(client.is_authenticated());
    }
}
