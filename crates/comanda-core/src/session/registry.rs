//! Process-wide table of open sessions.
//!
//! Each session kind is opened from a registered [`SessionBlueprint`].
//! Sessions are independent: closing or failing one never touches another.
//! Controllers are handed out as `Arc`s and no `DashMap` guard is held
//! past the call that reads it.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use comanda_types::error::SessionError;
use comanda_types::session::{SessionInfo, SessionKind};

use super::controller::{SessionBlueprint, SessionController};

#[derive(Debug, Default)]
pub struct SessionRegistry {
    blueprints: HashMap<SessionKind, SessionBlueprint>,
    sessions: DashMap<Uuid, Arc<SessionController>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the blueprint for its kind.
    pub fn with_blueprint(mut self, blueprint: SessionBlueprint) -> Self {
        self.blueprints.insert(blueprint.kind, blueprint);
        self
    }

    /// Kinds that can be opened, in declaration order.
    pub fn kinds(&self) -> Vec<SessionKind> {
        SessionKind::ALL
            .into_iter()
            .filter(|kind| self.blueprints.contains_key(kind))
            .collect()
    }

    pub fn blueprint(&self, kind: SessionKind) -> Option<&SessionBlueprint> {
        self.blueprints.get(&kind)
    }

    /// Open a new idle session of `kind`.
    pub fn open(&self, kind: SessionKind) -> Result<Arc<SessionController>, SessionError> {
        let blueprint = self
            .blueprints
            .get(&kind)
            .ok_or_else(|| SessionError::KindUnavailable(kind.to_string()))?;

        let controller = Arc::new(SessionController::new(blueprint));
        self.sessions.insert(controller.id(), controller.clone());
        info!(session_id = %controller.id(), %kind, "session opened");
        Ok(controller)
    }

    pub fn get(&self, id: Uuid) -> Result<Arc<SessionController>, SessionError> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(SessionError::NotFound)
    }

    /// Listing of open sessions, oldest first.
    pub fn list(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<SessionInfo> = self
            .sessions
            .iter()
            .map(|entry| entry.value().info())
            .collect();
        infos.sort_by_key(|info| info.id);
        infos
    }

    /// Remove a session, cancelling its in-flight request.
    pub fn close(&self, id: Uuid) -> Result<(), SessionError> {
        let (_, controller) = self.sessions.remove(&id).ok_or(SessionError::NotFound)?;
        controller.close();
        info!(session_id = %id, "session closed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{BoxQueryService, QueryService};
    use crate::session::SessionOptions;
    use comanda_types::query::{QueryError, QueryRequest, QueryResponse};
    use comanda_types::session::FailureKind;
    use std::time::Duration;

    struct EchoService;

    impl QueryService for EchoService {
        fn name(&self) -> &str {
            "echo"
        }

        async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
            Ok(QueryResponse::text(format!("echo: {}", request.prompt)))
        }
    }

    struct DownService;

    impl QueryService for DownService {
        fn name(&self) -> &str {
            "down"
        }

        async fn ask(&self, _request: &QueryRequest) -> Result<QueryResponse, QueryError> {
            Err(QueryError::Unavailable {
                status: 503,
                message: "maintenance".to_string(),
            })
        }
    }

    fn options() -> SessionOptions {
        SessionOptions {
            greeting: "Hola".to_string(),
            failure_notice: "Lo siento".to_string(),
            timeout: Duration::from_secs(5),
            context: serde_json::Value::Null,
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new()
            .with_blueprint(SessionBlueprint::new(
                SessionKind::Assistant,
                BoxQueryService::new(EchoService),
                options(),
            ))
            .with_blueprint(SessionBlueprint::new(
                SessionKind::Analytics,
                BoxQueryService::new(DownService),
                options(),
            ))
    }

    #[tokio::test]
    async fn open_get_list_close() {
        let registry = registry();
        assert!(registry.is_empty());
        assert_eq!(
            registry.kinds(),
            vec![SessionKind::Assistant, SessionKind::Analytics]
        );

        let first = registry.open(SessionKind::Assistant).unwrap();
        let second = registry.open(SessionKind::Analytics).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(first.id()).unwrap().id(), first.id());

        let listing = registry.list();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id, first.id());
        assert_eq!(listing[0].message_count, 1);

        registry.close(first.id()).unwrap();
        assert_eq!(registry.get(first.id()).unwrap_err(), SessionError::NotFound);
        assert_eq!(registry.close(first.id()).unwrap_err(), SessionError::NotFound);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(second.id()).is_ok());
    }

    #[tokio::test]
    async fn missing_blueprint_is_unavailable() {
        let registry = SessionRegistry::new();
        let err = registry.open(SessionKind::Analytics).unwrap_err();
        assert_eq!(err, SessionError::KindUnavailable("analytics".to_string()));
        assert!(registry.kinds().is_empty());
    }

    #[tokio::test]
    async fn failure_in_one_session_leaves_others_untouched() {
        let registry = registry();
        let assistant = registry.open(SessionKind::Assistant).unwrap();
        let analytics = registry.open(SessionKind::Analytics).unwrap();

        analytics.submit("ventas");
        let failed = analytics.wait_idle().await;
        assert_eq!(
            failed.log[2].failure.as_ref().unwrap().kind,
            FailureKind::RequestFailed
        );

        let untouched = assistant.snapshot();
        assert_eq!(untouched.log.len(), 1);
        assert!(untouched.last_error.is_none());

        assistant.submit("hola");
        let answered = assistant.wait_idle().await;
        assert_eq!(answered.log[2].content, "echo: hola");
    }
}
