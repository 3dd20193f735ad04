use crate::models::{
    AccountInfo, BlockId, BlockMetadata, Component, ContentBlock, Role, Topic, TopicDetail,
    TopicId,
};
use crate::reorder::{OrderEntry, OrderSink, ReorderScope};
use crate::session::AuthSession;
use crate::topics::TopicRemover;
use leptos::logging::warn;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Aborted,
    Http,
    Parse,
    MissingPrecondition,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    fn new(kind: ApiErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    fn network(e: reqwest::Error) -> Self {
        Self::network_message(e.to_string())
    }

    pub fn network_message(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, None, message)
    }

    pub fn aborted() -> Self {
        Self::new(ApiErrorKind::Aborted, None, "Request aborted")
    }

    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Parse, None, e.to_string())
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::MissingPrecondition, None, message)
    }

    /// Non-2xx response. 401 is classified as unauthorized.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::Http
        };
        Self::new(kind, Some(status), http_error_message(status, body))
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

/// Server-provided `message` (or `error`) if the body carries one, otherwise
/// `Failed (<status>)`.
pub(crate) fn http_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"].iter().find_map(|k| {
                v.get(*k)
                    .and_then(|m| m.as_str())
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
            })
        })
        .unwrap_or_else(|| format!("Failed ({status})"))
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_URL: &str = "http://localhost:5005";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::resolve(runtime_api_url(), option_env!("BRAINLOOM_API_URL"))
    }

    /// Runtime value wins over the build-time one; blanks are ignored.
    pub fn resolve(runtime: Option<String>, build_time: Option<&str>) -> Self {
        let api_url = runtime
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                build_time
                    .map(str::to_string)
                    .filter(|s| !s.trim().is_empty())
            })
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Root of the REST surface.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.api_url)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `window.ENV.API_URL`, falling back to `window.ENV.api_url`.
fn runtime_api_url() -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    ["API_URL", "api_url"].iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "as")]
    pub role: Role,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AccountInfo>,
}

impl LoginResponse {
    /// Build the session to persist. The user object defaults to
    /// `{email, role}` when the backend omits it.
    pub fn into_session(self, email: &str, role: Role) -> ApiResult<AuthSession> {
        let token = self
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::parse("Login response is missing a token"))?;

        Ok(AuthSession {
            token,
            user: self
                .user
                .unwrap_or_else(|| AccountInfo::fallback(email, role)),
            role,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct CreateTopicRequest {
    pub parent_id: Option<TopicId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub order_no: u32,
}

/// A component as sent in a save payload: `{type, order_no, content}`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ComponentPayload {
    pub order_no: u32,
    pub component: Component,
}

impl Serialize for ComponentPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = serde_json::to_value(&self.component).map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", &tagged["type"])?;
        map.serialize_entry("order_no", &self.order_no)?;
        map.serialize_entry("content", &tagged["content"])?;
        map.end()
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub(crate) struct SaveContentRequest {
    pub components: Vec<ComponentPayload>,
    pub metadata: BlockMetadata,
}

/// Percent-encode each segment of a slash-joined topic path.
pub(crate) fn encode_topic_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn reorder_path(scope: &ReorderScope) -> String {
    match scope {
        ReorderScope::Children {
            parent_id: Some(id),
        } => format!("/topics/{id}/reorder"),
        ReorderScope::Children { parent_id: None } => "/topics/reorder".to_string(),
        ReorderScope::Blocks { topic_path } => {
            format!("/topics/slug/{}/content/reorder", encode_topic_path(topic_path))
        }
    }
}

/// Parse `{ topic, children, blocks }`.
///
/// Children and blocks that fail to parse are skipped, and so are individual
/// components of unknown kind. Blocks may also arrive nested under `topic`.
pub(crate) fn parse_topic_detail_response(data: serde_json::Value) -> ApiResult<TopicDetail> {
    let topic_value = data
        .get("topic")
        .cloned()
        .ok_or_else(|| ApiError::parse("Topic payload is missing `topic`"))?;
    let topic: Topic = serde_json::from_value(topic_value.clone()).map_err(ApiError::parse)?;

    let children = data
        .get("children")
        .and_then(|v| v.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|c| serde_json::from_value::<Topic>(c.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let raw_blocks = data
        .get("blocks")
        .and_then(|v| v.as_array())
        .or_else(|| topic_value.get("blocks").and_then(|v| v.as_array()))
        .cloned()
        .unwrap_or_default();

    let blocks = raw_blocks.into_iter().filter_map(parse_block).collect();

    Ok(TopicDetail {
        topic,
        children,
        blocks,
    })
}

fn parse_block(mut item: serde_json::Value) -> Option<ContentBlock> {
    let raw_components = item
        .get_mut("components")
        .map(serde_json::Value::take)
        .and_then(|v| match v {
            serde_json::Value::Array(xs) => Some(xs),
            _ => None,
        })
        .unwrap_or_default();

    let mut block: ContentBlock = match serde_json::from_value(item) {
        Ok(b) => b,
        Err(e) => {
            warn!("skipping malformed content block: {e}");
            return None;
        }
    };

    block.components = raw_components
        .into_iter()
        .filter_map(|c| match serde_json::from_value::<Component>(c) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("skipping component in block {}: {e}", block.id);
                None
            }
        })
        .collect();

    Some(block)
}

fn parse_topic_list(data: serde_json::Value) -> Vec<Topic> {
    let list = match data {
        serde_json::Value::Array(xs) => xs,
        other => other
            .get("topics")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default(),
    };
    list.into_iter()
        .filter_map(|t| serde_json::from_value(t).ok())
        .collect()
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:5005/api`.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_root())
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the raw body of a 2xx response.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<String> {
        let client = reqwest::Client::new();
        let mut req = client.request(method, self.url(path));
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();
        let text = res.text().await.map_err(ApiError::network)?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(ApiError::http_status(status.as_u16(), &text))
        }
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let text = self.send(method, path, body).await?;
        let body = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str(body).map_err(ApiError::parse)
    }

    pub async fn login(&self, email: &str, password: &str, role: Role) -> ApiResult<AuthSession> {
        let res: LoginResponse = self
            .send_json(
                Method::POST,
                "/auth/login",
                Some(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    role,
                }),
            )
            .await?;
        res.into_session(email, role)
    }

    pub async fn root_topics(&self) -> ApiResult<Vec<Topic>> {
        let data: serde_json::Value = self
            .send_json(Method::GET, "/topics/root", None::<&()>)
            .await?;
        Ok(parse_topic_list(data))
    }

    pub async fn topic_detail(&self, path: &str) -> ApiResult<TopicDetail> {
        let data: serde_json::Value = self
            .send_json(
                Method::GET,
                &format!("/topics/slug/{}/", encode_topic_path(path)),
                None::<&()>,
            )
            .await?;
        parse_topic_detail_response(data)
    }

    /// Returns the created topic when the backend echoes it back.
    pub async fn create_topic(&self, req: &CreateTopicRequest) -> ApiResult<Option<Topic>> {
        let data: serde_json::Value = self.send_json(Method::POST, "/topics/add", Some(req)).await?;
        let topic = data
            .get("topic")
            .cloned()
            .and_then(|t| serde_json::from_value(t).ok());
        Ok(topic)
    }

    pub async fn delete_topic(&self, id: TopicId) -> ApiResult<()> {
        self.send(Method::DELETE, &format!("/topics/{id}"), None::<&()>)
            .await
            .map(|_| ())
    }

    pub async fn reorder(&self, scope: &ReorderScope, entries: &[OrderEntry]) -> ApiResult<()> {
        self.send(Method::POST, &reorder_path(scope), Some(&entries))
            .await
            .map(|_| ())
    }

    pub async fn create_content(
        &self,
        topic_path: &str,
        req: &SaveContentRequest,
    ) -> ApiResult<serde_json::Value> {
        self.send_json(
            Method::POST,
            &format!("/topics/slug/{}/content", encode_topic_path(topic_path)),
            Some(req),
        )
        .await
    }

    pub async fn update_content_block(
        &self,
        id: BlockId,
        req: &SaveContentRequest,
    ) -> ApiResult<serde_json::Value> {
        self.send_json(Method::PUT, &format!("/content-blocks/{id}"), Some(req))
            .await
    }
}

impl OrderSink for ApiClient {
    async fn submit_order(&self, scope: &ReorderScope, entries: &[OrderEntry]) -> ApiResult<()> {
        self.reorder(scope, entries).await
    }
}

impl TopicRemover for ApiClient {
    async fn remove_topic(&self, id: TopicId) -> ApiResult<()> {
        self.delete_topic(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_uses_as_for_role() {
        let v = serde_json::to_value(LoginRequest {
            email: "admin@gmail.com".to_string(),
            password: "pw".to_string(),
            role: Role::Admin,
        })
        .expect("should serialize");
        assert_eq!(v["as"], "admin");
        assert!(v.get("role").is_none());
    }

    #[test]
    fn test_login_response_into_session_defaults_user() {
        let res: LoginResponse =
            serde_json::from_str(r#"{"token":"jwt-token"}"#).expect("should parse");
        let session = res
            .into_session("admin@gmail.com", Role::Admin)
            .expect("token present");
        assert_eq!(session.token, "jwt-token");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.user.email(), Some("admin@gmail.com"));
    }

    #[test]
    fn test_login_response_without_token_is_parse_error() {
        let res: LoginResponse =
            serde_json::from_str(r#"{"user":{"email":"a@b.c"}}"#).expect("should parse");
        let err = res
            .into_session("a@b.c", Role::Admin)
            .expect_err("no token");
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[test]
    fn test_http_error_prefers_server_message() {
        assert_eq!(
            http_error_message(400, r#"{"message":"Slug already exists"}"#),
            "Slug already exists"
        );
        assert_eq!(http_error_message(502, "<html>bad gateway</html>"), "Failed (502)");
        assert_eq!(http_error_message(404, r#"{"message":"  "}"#), "Failed (404)");
    }

    #[test]
    fn test_401_is_unauthorized() {
        let e = ApiError::http_status(401, "");
        assert!(e.is_unauthorized());
        assert_eq!(e.status, Some(401));
        assert!(!ApiError::http_status(403, "").is_unauthorized());
    }

    #[test]
    fn test_env_config_resolution_order() {
        assert_eq!(
            EnvConfig::resolve(Some("https://rt.example/".to_string()), Some("https://bt"))
                .api_url,
            "https://rt.example"
        );
        assert_eq!(
            EnvConfig::resolve(Some("  ".to_string()), Some("https://bt")).api_url,
            "https://bt"
        );
        let d = EnvConfig::resolve(None, None);
        assert_eq!(d.api_url, DEFAULT_API_URL);
        assert_eq!(d.api_root(), "http://localhost:5005/api");
    }

    #[test]
    fn test_reorder_paths_per_scope() {
        assert_eq!(
            reorder_path(&ReorderScope::Children { parent_id: Some(7) }),
            "/topics/7/reorder"
        );
        assert_eq!(
            reorder_path(&ReorderScope::Children { parent_id: None }),
            "/topics/reorder"
        );
        assert_eq!(
            reorder_path(&ReorderScope::Blocks {
                topic_path: "python/c++ basics".to_string()
            }),
            "/topics/slug/python/c%2B%2B%20basics/content/reorder"
        );
    }

    #[test]
    fn test_reorder_body_is_plain_array() {
        let entries = vec![
            OrderEntry { id: 3, order_no: 0 },
            OrderEntry { id: 1, order_no: 1 },
        ];
        let v = serde_json::to_value(&entries).expect("should serialize");
        assert_eq!(v, serde_json::json!([{"id":3,"order_no":0},{"id":1,"order_no":1}]));
    }

    #[test]
    fn test_save_payload_shape() {
        let req = SaveContentRequest {
            components: vec![ComponentPayload {
                order_no: 0,
                component: Component::Code {
                    language: "python".to_string(),
                    code: "print(1)".to_string(),
                },
            }],
            metadata: BlockMetadata {
                tags: vec!["Python".to_string()],
                estimated_read_time: "10 Min".to_string(),
            },
        };
        let v = serde_json::to_value(&req).expect("should serialize");
        assert_eq!(
            v["components"][0],
            serde_json::json!({
                "type": "code",
                "order_no": 0,
                "content": {"language": "python", "code": "print(1)"}
            })
        );
        assert_eq!(v["metadata"]["tags"][0], "Python");
    }

    #[test]
    fn test_saved_code_component_reads_back_unchanged() {
        let payload = ComponentPayload {
            order_no: 0,
            component: Component::Code {
                language: "bash".to_string(),
                code: "ls -la | wc -l".to_string(),
            },
        };
        let wire = serde_json::to_value(&payload).expect("should serialize");
        let read_back: Component = serde_json::from_value(wire).expect("should parse");
        assert_eq!(read_back, payload.component);
    }

    #[test]
    fn test_parse_topic_detail_skips_unknown_components() {
        let data = serde_json::json!({
            "topic": {"id": 2, "title": "Basics", "slug": "basics", "parent_id": 1,
                      "order_no": 0, "full_path": "python/basics"},
            "children": [
                {"id": 3, "title": "Loops", "slug": "loops", "order_no": 1},
                {"broken": true}
            ],
            "blocks": [{
                "id": 9, "topic_id": 2, "block_order": 0,
                "components": [
                    {"type": "paragraph", "content": {"text": "hi"}},
                    {"type": "video", "content": {"src": "x"}}
                ]
            }]
        });
        let detail = parse_topic_detail_response(data).expect("should parse");
        assert_eq!(detail.topic.full_path, "python/basics");
        assert_eq!(detail.children.len(), 1);
        assert_eq!(detail.blocks.len(), 1);
        assert_eq!(
            detail.blocks[0].components,
            vec![Component::Paragraph {
                text: "hi".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_topic_detail_reads_blocks_nested_in_topic() {
        let data = serde_json::json!({
            "topic": {"id": 2, "title": "Basics", "slug": "basics",
                      "blocks": [{"id": 1, "components": []}]}
        });
        let detail = parse_topic_detail_response(data).expect("should parse");
        assert_eq!(detail.blocks.len(), 1);
        assert!(detail.children.is_empty());
    }

    #[test]
    fn test_parse_topic_detail_requires_topic() {
        let err = parse_topic_detail_response(serde_json::json!({"children": []}))
            .expect_err("missing topic");
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[test]
    fn test_parse_topic_list_accepts_wrapped_or_bare() {
        let wrapped = serde_json::json!({"topics": [{"id": 1, "title": "Python", "slug": "python"}]});
        let bare = serde_json::json!([{"id": 1, "title": "Python", "slug": "python"}]);
        assert_eq!(parse_topic_list(wrapped), parse_topic_list(bare));
    }

    #[test]
    fn test_api_client_auth_header() {
        let mut client = ApiClient::new("http://localhost:5005/api/".to_string());
        assert!(client.auth_header().is_none());

        client.set_token(Some("my-jwt-token".to_string()));
        assert_eq!(client.auth_header().as_deref(), Some("Bearer my-jwt-token"));
        assert_eq!(client.url("/topics/root"), "http://localhost:5005/api/topics/root");

        client.set_token(Some(" ".to_string()));
        assert!(client.auth_header().is_none());
    }
}
