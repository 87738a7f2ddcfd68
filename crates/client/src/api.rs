//! REST API client for the eduhire backend.
//!
//! Wraps the endpoints the client-side workflows need (institution
//! creation, curriculum persistence, follow toggles) using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use eduhire_core::curriculum::{ContainerId, Curriculum, DropResult, ItemId, NewLesson, Section};
use eduhire_core::optimistic::{FollowState, Optimistic};
use eduhire_core::wizard::{CreatedInstitution, CreationEndpoint, SubmissionPayload};

use crate::config::ClientConfig;
use crate::error::{extract_error_message, ApiError};
use crate::records::{
    CreatedInstitutionRecord, CreatedItem, FollowResponse, InstitutionRecord,
    LessonSectionUpdate, OrderRequest, SectionRecord,
};

/// HTTP client for one eduhire API root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.token.clone(),
        ))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path. Paths keep their trailing slash; the
    /// backend routes require it.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ---- institutions ----

    /// Create an institution from a submitted wizard form.
    ///
    /// Sends a multipart `POST /institutions/` with every text field and any
    /// uploaded files. Any 2xx counts as created: the backend echoes the
    /// submitted fields and may leave out `id` and `slug`, and a body that
    /// is not JSON at all is only logged.
    pub async fn create_institution(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<CreatedInstitution, ApiError> {
        let form = build_multipart(payload)?;
        tracing::info!(
            fields = payload.text_parts.len(),
            files = payload.file_parts.len(),
            "Submitting institution"
        );
        let response = self
            .authorize(self.client.post(self.url("institutions/")))
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;
        let record = match serde_json::from_slice::<CreatedInstitutionRecord>(&body) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Institution created but the response body was not understood");
                CreatedInstitutionRecord::default()
            }
        };

        let name = record
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| payload.text("name").map(str::to_string))
            .unwrap_or_default();
        Ok(CreatedInstitution {
            id: record.id,
            slug: record.slug,
            name,
        })
    }

    /// Current follow state of an institution, from its detail view.
    pub async fn follow_state(&self, slug: &str) -> Result<FollowState, ApiError> {
        let response = self
            .authorize(self.client.get(self.url(&format!("institutions/{slug}/"))))
            .send()
            .await?;

        let record: InstitutionRecord = Self::parse_response(response).await?;
        Ok(record.follow_state())
    }

    /// Toggle follow on an institution. The server answers with the new
    /// state.
    pub async fn toggle_follow(&self, slug: &str) -> Result<FollowState, ApiError> {
        let response = self
            .authorize(self.client.post(self.url(&format!("institutions/{slug}/follow/"))))
            .send()
            .await?;

        let body: FollowResponse = Self::parse_response(response).await?;
        Ok(body.into())
    }

    /// Toggle follow with an optimistic update: the speculative state is
    /// visible while the request is in flight and is rolled back exactly if
    /// it fails.
    pub async fn toggle_follow_optimistic(
        &self,
        slug: &str,
        state: &mut Optimistic<FollowState>,
    ) -> Result<(), ApiError> {
        state.apply(state.get().toggled());
        match self.toggle_follow(slug).await {
            Ok(confirmed) => {
                state.commit(confirmed);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(slug, error = %e, "Follow toggle failed, rolling back");
                state.rollback();
                Err(e)
            }
        }
    }

    // ---- curriculum ----

    /// Load a course's sections with nested lessons.
    pub async fn list_sections(&self, course_id: Uuid) -> Result<Curriculum, ApiError> {
        let response = self
            .authorize(self.client.get(self.sections_url(course_id)))
            .send()
            .await?;

        let records: Vec<SectionRecord> = Self::parse_response(response).await?;
        let sections: Vec<Section> = records.into_iter().map(SectionRecord::into_section).collect();
        Ok(Curriculum::from_sections(sections))
    }

    /// Create a section at the end of a course.
    pub async fn create_section(&self, course_id: Uuid, title: &str) -> Result<CreatedItem, ApiError> {
        let response = self
            .authorize(self.client.post(self.sections_url(course_id)))
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a lesson at the end of a section.
    pub async fn create_lesson(
        &self,
        section_id: Uuid,
        lesson: &NewLesson,
    ) -> Result<CreatedItem, ApiError> {
        let response = self
            .authorize(self.client.post(self.lessons_url(section_id)))
            .json(lesson)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Move a lesson to another section (`PATCH` partial update keyed by
    /// the lesson id). The lesson's position is set by the following
    /// reorder calls.
    pub async fn move_lesson_to_section(
        &self,
        lesson_id: Uuid,
        section_id: Uuid,
    ) -> Result<(), ApiError> {
        let response = self
            .authorize(self.client.patch(self.lesson_url(lesson_id)))
            .json(&LessonSectionUpdate {
                section: section_id,
            })
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Persist section display order.
    pub async fn reorder_sections(&self, course_id: Uuid, order: &[Uuid]) -> Result<(), ApiError> {
        let response = self
            .authorize(self.client.put(self.sections_url(course_id)))
            .json(&OrderRequest { order })
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Persist lesson display order within one section.
    pub async fn reorder_lessons(&self, section_id: Uuid, order: &[Uuid]) -> Result<(), ApiError> {
        let response = self
            .authorize(self.client.put(self.lessons_url(section_id)))
            .json(&OrderRequest { order })
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Push every change a drop made.
    ///
    /// Call after [`Curriculum::apply_drop`] succeeded. A lesson moved to
    /// another section is first re-parented, then the order of both
    /// sections is sent. Unsaved sections and lessons are skipped; their
    /// order is sent once they have a server id. A saved lesson dropped
    /// into an unsaved section is an error, since the server can not
    /// record that owner yet.
    pub async fn persist_drop(
        &self,
        course_id: Uuid,
        curriculum: &Curriculum,
        drop: &DropResult,
    ) -> Result<(), ApiError> {
        let Some(dest) = &drop.destination else {
            return Ok(());
        };

        match (&drop.source.container, &dest.container) {
            (ContainerId::Sections, _) => {
                self.reorder_sections(course_id, &curriculum.section_order())
                    .await
            }
            (ContainerId::Section(src), ContainerId::Section(dst)) if src == dst => {
                self.persist_lesson_order(curriculum, src).await
            }
            (ContainerId::Section(src), ContainerId::Section(dst)) => {
                let moved = curriculum
                    .section(dst)
                    .and_then(|s| s.lessons.get(dest.index))
                    .ok_or_else(|| {
                        ApiError::InvalidRequest(format!(
                            "no lesson at index {} of section {dst}; apply the drop first",
                            dest.index
                        ))
                    })?;
                if let Some(lesson_id) = moved.id.as_persisted() {
                    let section_id = dst.as_persisted().ok_or_else(|| {
                        ApiError::InvalidRequest(format!(
                            "lesson {lesson_id} can not move to unsaved section {dst}"
                        ))
                    })?;
                    self.move_lesson_to_section(lesson_id, section_id).await?;
                }
                self.persist_lesson_order(curriculum, src).await?;
                self.persist_lesson_order(curriculum, dst).await
            }
            (ContainerId::Section(_), ContainerId::Sections) => Err(ApiError::InvalidRequest(
                "a lesson can not be dropped into the section list".to_string(),
            )),
        }
    }

    async fn persist_lesson_order(
        &self,
        curriculum: &Curriculum,
        section: &ItemId,
    ) -> Result<(), ApiError> {
        let Some(section_id) = section.as_persisted() else {
            tracing::debug!(section = %section, "Skipping lesson order for unsaved section");
            return Ok(());
        };
        let order = curriculum
            .lesson_order(section)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.reorder_lessons(section_id, &order).await
    }

    // ---- private helpers ----

    fn sections_url(&self, course_id: Uuid) -> String {
        self.url(&format!("courses/instructor/courses/{course_id}/sections/"))
    }

    fn lessons_url(&self, section_id: Uuid) -> String {
        self.url(&format!("courses/instructor/sections/{section_id}/lessons/"))
    }

    fn lesson_url(&self, lesson_id: Uuid) -> String {
        self.url(&format!("courses/instructor/lessons/{lesson_id}/"))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] carrying the
    /// extracted message on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = extract_error_message(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CreationEndpoint for ApiClient {
    type Error = ApiError;

    async fn create_institution(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<CreatedInstitution, ApiError> {
        ApiClient::create_institution(self, payload).await
    }
}

/// Turn a submission payload into a multipart body.
pub fn build_multipart(payload: &SubmissionPayload) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in &payload.text_parts {
        form = form.text(name.clone(), value.clone());
    }
    for (name, file) in &payload.file_parts {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| {
                ApiError::InvalidRequest(format!(
                    "file '{}' has an invalid content type '{}': {e}",
                    file.file_name, file.mime_type
                ))
            })?;
        form = form.part(name.clone(), part);
    }
    Ok(form)
}
