//! Request handlers
//!
//! Each handler authenticates first; nothing else happens for an anonymous
//! caller. Ownership checks live in `Workspace` and `Editor`.

use axum::body::Body;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ServerState;
use super::session::{authenticate, cleared_cookie, session_cookie};
use crate::domain::{Structure, Task, Topic, UserId};
use crate::error::{RedatorError, Result};
use crate::format::{DOCX_CONTENT_TYPE, build_document, docx_filename, render_docx};
use crate::prompt::ConsolidationStyle;
use crate::storage::Storage;

#[derive(Debug, Deserialize)]
pub struct SessionForm {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub user: UserId,
}

#[derive(Debug, Deserialize)]
pub struct NewTopic {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Topic with its tasks in creation order
#[derive(Debug, Serialize)]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: Topic,
    pub tasks: Vec<Task>,
}

/// Form posted by the verify and consolidate buttons
#[derive(Debug, Deserialize)]
pub struct TopicForm {
    #[serde(default, rename = "topicId")]
    pub topic_id: String,
    #[serde(default)]
    pub style: Option<ConsolidationStyle>,
}

impl TopicForm {
    fn topic_id(&self) -> Result<&str> {
        let id = self.topic_id.trim();
        if id.is_empty() {
            return Err(RedatorError::ValidationFailed("topicId é obrigatório".to_string()));
        }
        Ok(id)
    }
}

pub async fn health() -> &'static str {
    "ok"
}

async fn caller<S: Storage>(state: &ServerState<S>, headers: &HeaderMap) -> Result<UserId> {
    authenticate(state.sessions.as_ref(), headers, &state.config.server.cookie_name).await
}

// Bodies are read from the raw request so the caller is resolved before any
// body rejection can answer.
async fn json_body<T: DeserializeOwned>(request: Request) -> Result<T> {
    Json::<T>::from_request(request, &())
        .await
        .map(|Json(body)| body)
        .map_err(|e| RedatorError::ValidationFailed(e.body_text()))
}

async fn form_body<T: DeserializeOwned>(request: Request) -> Result<T> {
    Form::<T>::from_request(request, &())
        .await
        .map(|Form(body)| body)
        .map_err(|e| RedatorError::ValidationFailed(e.body_text()))
}

/// Exchange a token (form or JSON body) for the session cookie
pub async fn create_session<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    request: Request,
) -> Result<Response> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let form: SessionForm = if is_json {
        json_body(request).await?
    } else {
        form_body(request).await?
    };

    let user = state
        .sessions
        .verify(form.token.trim())
        .await
        .ok_or(RedatorError::Unauthorized)?;

    let server = &state.config.server;
    let cookie = session_cookie(
        &server.cookie_name,
        form.token.trim(),
        state.config.session.ttl_secs,
        server.cookie_secure,
    )?;
    log::info!("Session started for {}", user);

    let mut response = Json(SessionInfo { user }).into_response();
    response.headers_mut().insert(SET_COOKIE, cookie);
    Ok(response)
}

pub async fn sign_out<S: Storage + 'static>(State(state): State<ServerState<S>>) -> Result<Response> {
    let server = &state.config.server;
    let cookie = cleared_cookie(&server.cookie_name, server.cookie_secure)?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response())
}

pub async fn list_topics<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Topic>>> {
    let user = caller(&state, &headers).await?;
    Ok(Json(state.workspace.list_topics(&user)?))
}

pub async fn create_topic<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    request: Request,
) -> Result<(StatusCode, Json<Topic>)> {
    let user = caller(&state, &headers).await?;
    let body: NewTopic = json_body(request).await?;
    let topic = state.workspace.create_topic(&user, &body.title)?;
    Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn get_topic<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path(topic_id): Path<String>,
) -> Result<Json<TopicDetail>> {
    let user = caller(&state, &headers).await?;
    let topic = state.workspace.get_topic(&user, &topic_id)?;
    let tasks = state.workspace.list_tasks(&user, &topic_id)?;
    Ok(Json(TopicDetail { topic, tasks }))
}

pub async fn delete_topic<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path(topic_id): Path<String>,
) -> Result<StatusCode> {
    let user = caller(&state, &headers).await?;
    state.workspace.delete_topic(&user, &topic_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_structure<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path(topic_id): Path<String>,
    request: Request,
) -> Result<Json<Topic>> {
    let user = caller(&state, &headers).await?;
    let structure: Structure = json_body(request).await?;
    Ok(Json(state.workspace.update_structure(&user, &topic_id, structure)?))
}

pub async fn create_task<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path(topic_id): Path<String>,
    request: Request,
) -> Result<(StatusCode, Json<Task>)> {
    let user = caller(&state, &headers).await?;
    let body: NewTask = json_body(request).await?;
    let task = state.workspace.create_task(&user, &topic_id, &body.title)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path((topic_id, task_id)): Path<(String, String)>,
) -> Result<Json<Task>> {
    let user = caller(&state, &headers).await?;
    Ok(Json(state.workspace.get_task(&user, &topic_id, &task_id)?))
}

pub async fn update_task<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path((topic_id, task_id)): Path<(String, String)>,
    request: Request,
) -> Result<Json<Task>> {
    let user = caller(&state, &headers).await?;
    let body: TaskUpdate = json_body(request).await?;
    let task = state
        .workspace
        .update_task(&user, &topic_id, &task_id, body.title.as_deref(), &body.content)?;
    Ok(Json(task))
}

pub async fn delete_task<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    Path((topic_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let user = caller(&state, &headers).await?;
    state.workspace.delete_task(&user, &topic_id, &task_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Coherence report as an HTML page
pub async fn verify<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    request: Request,
) -> Result<Html<String>> {
    let user = caller(&state, &headers).await?;
    let form: TopicForm = form_body(request).await?;
    let (topic, report) = state.editor.verify(&user, form.topic_id()?).await?;
    log::info!("Verified topic {}: {}", topic.id, report.status);
    Ok(Html(state.pages.verify_page(&topic, &report)?))
}

/// Consolidated article as an HTML page
pub async fn consolidate<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    request: Request,
) -> Result<Html<String>> {
    let user = caller(&state, &headers).await?;
    let form: TopicForm = form_body(request).await?;
    let style = form.style.unwrap_or(ConsolidationStyle::Classic);
    let result = state.editor.consolidate(&user, form.topic_id()?, style).await?;

    let page = state
        .pages
        .consolidation_page(&result.topic, &state.config.document.subtitle, &result.text)?;
    Ok(Html(page))
}

/// Consolidated article as a .docx attachment
pub async fn consolidate_docx<S: Storage + 'static>(
    State(state): State<ServerState<S>>,
    headers: HeaderMap,
    request: Request,
) -> Result<Response> {
    let user = caller(&state, &headers).await?;
    let form: TopicForm = form_body(request).await?;
    let style = form.style.unwrap_or(ConsolidationStyle::Extended);
    let result = state.editor.consolidate(&user, form.topic_id()?, style).await?;

    let doc_config = &state.config.document;
    let document = build_document(
        doc_config.title_for(&result.topic.title),
        &result.text,
        &doc_config.layout(),
    );
    let bytes = render_docx(&document)?;
    log::info!("Built docx for topic {} ({} bytes)", result.topic.id, bytes.len());

    let disposition = format!("attachment; filename=\"{}\"", docx_filename(&result.topic.id));
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| RedatorError::Document(format!("Invalid filename header: {}", e)))?;

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}
