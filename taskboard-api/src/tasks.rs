//! The remote task store over HTTP.

use taskboard_core::board::BoardSnapshot;
use taskboard_core::{ServiceError, Task, TaskDraft, TaskPatch, TaskService};

use crate::client::{ApiClient, MessageBody};

#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: ApiClient,
}

impl HttpTaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn message_of(resp: reqwest::Response, fallback: &str) -> String {
        match resp.json::<MessageBody>().await {
            Ok(MessageBody { mensagem: Some(m) }) if !m.is_empty() => m,
            _ => fallback.to_string(),
        }
    }
}

impl TaskService for HttpTaskService {
    async fn list(&self) -> Result<BoardSnapshot, ServiceError> {
        let rb = self.client.authed(self.client.get("/tasks"))?;
        let resp = self.client.send(rb).await?;
        resp.json::<BoardSnapshot>()
            .await
            .map_err(|e| ServiceError::Network(format!("unexpected task list body: {e}")))
    }

    async fn create(&self, draft: &TaskDraft) -> Result<String, ServiceError> {
        let rb = self.client.authed(self.client.post("/tasks"))?.json(draft);
        let resp = self.client.send(rb).await?;
        Ok(Self::message_of(resp, "task created").await)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), ServiceError> {
        let rb = self
            .client
            .authed(self.client.patch(&format!("/tasks/{id}")))?
            .json(patch);
        self.client.send(rb).await?;
        Ok(())
    }

    async fn replace(&self, id: &str, draft: &TaskDraft) -> Result<String, ServiceError> {
        let rb = self
            .client
            .authed(self.client.put(&format!("/tasks/{id}")))?
            .json(draft);
        let resp = self.client.send(rb).await?;
        Ok(Self::message_of(resp, "task updated").await)
    }

    async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let rb = self
            .client
            .authed(self.client.delete(&format!("/tasks/{id}")))?;
        self.client.send(rb).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Task, ServiceError> {
        let rb = self.client.authed(self.client.get(&format!("/tasks/{id}")))?;
        let resp = self.client.send(rb).await?;
        resp.json::<Task>()
            .await
            .map_err(|e| ServiceError::Network(format!("unexpected task body: {e}")))
    }
}
