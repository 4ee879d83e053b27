//! Shared test fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use emrlink::adapters::session::{RequestOptions, SessionHandle};
use emrlink::domain::{ContextKind, EmrError, Result, SessionError, SessionResource};
use serde_json::{json, Value};
use std::sync::Mutex;

/// How the mock session answers `create`
#[derive(Debug, Clone)]
pub enum CreateReply {
    /// Echo the submitted resource back with an id
    Echo,
    /// Return this body verbatim
    Body(Value),
    /// Fail with a server error
    Fail(u16),
}

/// In-memory session with fixed context
#[derive(Debug)]
pub struct MockSession {
    pub server_url: String,
    pub patient: Option<String>,
    pub encounter: Option<String>,
    pub user: Option<String>,
    pub user_resource: Value,
    pub reply: CreateReply,
    pub created: Mutex<Vec<(SessionResource, RequestOptions)>>,
    pub requests: Mutex<Vec<RequestOptions>>,
}

impl MockSession {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.to_string(),
            patient: Some("12724066".to_string()),
            encounter: Some("97939518".to_string()),
            user: Some("12742069".to_string()),
            user_resource: json!({"resourceType": "Practitioner", "id": "12742069"}),
            reply: CreateReply::Echo,
            created: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, reply: CreateReply) -> Self {
        self.reply = reply;
        self
    }

    pub fn without_encounter(mut self) -> Self {
        self.encounter = None;
        self
    }

    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }

    pub fn with_user_resource(mut self, resource: Value) -> Self {
        self.user_resource = resource;
        self
    }

    pub fn created(&self) -> Vec<(SessionResource, RequestOptions)> {
        self.created.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RequestOptions> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionHandle for MockSession {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn context_id(&self, kind: ContextKind) -> Result<Option<String>> {
        Ok(match kind {
            ContextKind::Patient => self.patient.clone(),
            ContextKind::Encounter => self.encounter.clone(),
            ContextKind::User => self.user.clone(),
        })
    }

    async fn read_context(&self, kind: ContextKind) -> Result<Value> {
        match kind {
            ContextKind::User => Ok(self.user_resource.clone()),
            ContextKind::Patient => Ok(json!({
                "resourceType": "Patient",
                "id": self.patient.clone().unwrap_or_default(),
            })),
            ContextKind::Encounter => match self.encounter {
                Some(ref id) => Ok(json!({"resourceType": "Encounter", "id": id})),
                None => Err(EmrError::MissingIdentifier(kind)),
            },
        }
    }

    async fn create(&self, resource: SessionResource, options: RequestOptions) -> Result<Value> {
        self.created
            .lock()
            .unwrap()
            .push((resource.clone(), options));

        match self.reply {
            CreateReply::Echo => {
                let mut body = resource.into_map();
                body.insert("id".to_string(), json!("created-1"));
                Ok(Value::Object(body))
            }
            CreateReply::Body(ref body) => Ok(body.clone()),
            CreateReply::Fail(status) => Err(SessionError::RequestFailed {
                status,
                message: "server rejected the resource".to_string(),
            }
            .into()),
        }
    }

    async fn request(&self, options: RequestOptions) -> Result<Value> {
        self.requests.lock().unwrap().push(options.clone());
        Ok(json!({"resourceType": "Observation", "id": "obs-1"}))
    }
}
