use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    Action, BlockingAction, Call, FunctionAction, Reply, Request, ServerError, Service, Status,
};

const EVENT_CAPACITY: usize = 256;

/// Lifecycle notifications emitted around every dispatched call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CallEvent {
    Started { call_id: Uuid, action: String },
    Finished { call_id: Uuid, action: String, ok: bool },
}

/// Emits `Started` on creation and `Finished` when dropped, whichever way
/// the call ends
struct CallGuard {
    events: broadcast::Sender<CallEvent>,
    call_id: Uuid,
    action: String,
    ok: bool,
}

impl CallGuard {
    fn start(events: broadcast::Sender<CallEvent>, call_id: Uuid, action: String) -> Self {
        // No subscribers is fine
        let _ = events.send(CallEvent::Started {
            call_id,
            action: action.clone(),
        });
        Self {
            events,
            call_id,
            action,
            ok: false,
        }
    }

    fn complete(&mut self, result: &Result<Value, Status>) {
        self.ok = result.is_ok();
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        let _ = self.events.send(CallEvent::Finished {
            call_id: self.call_id,
            action: std::mem::take(&mut self.action),
            ok: self.ok,
        });
    }
}

/// Serves the actions of one [`Service`] type
pub struct Servicer<S: Service> {
    name: String,
    config: Arc<S::Config>,
    actions: HashMap<String, Arc<dyn Action<S>>>,
    events: broadcast::Sender<CallEvent>,
}

impl<S: Service> Servicer<S> {
    pub fn new(name: impl Into<String>, config: S::Config) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            name: name.into(),
            config: Arc::new(config),
            actions: HashMap::new(),
            events,
        }
    }

    /// Build from a JSON config. The config type decides which keys are
    /// accepted; undeclared keys surface as [`ServerError::InvalidConfig`]
    /// when it denies unknown fields.
    pub fn from_value(name: impl Into<String>, config: Value) -> Result<Self, ServerError>
    where
        S::Config: DeserializeOwned,
    {
        let config = serde_json::from_value(config)
            .map_err(|e| ServerError::InvalidConfig(e.to_string()))?;
        Ok(Self::new(name, config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an action under `name`, replacing any previous one
    pub fn action<A>(mut self, name: impl Into<String>, action: A) -> Self
    where
        A: Action<S> + 'static,
    {
        let name = name.into();
        debug!("Registered action {}::{}", self.name, name);
        self.actions.insert(name, Arc::new(action));
        self
    }

    pub fn sync_action<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(S, Call) -> Result<Value, Status> + Send + Sync + 'static,
    {
        self.action(name, BlockingAction::new(handler))
    }

    pub fn async_action<F, Fut>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(S, Call) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value, Status>> + Send + 'static,
    {
        self.action(name, FunctionAction::new(handler))
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn actions(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }

    /// Serve one call, awaiting the handler if it answers later
    pub async fn dispatch(&self, action: &str, request: Request) -> Result<Value, Status> {
        let (handler, call) = self.prepare(action, request)?;
        let mut guard = CallGuard::start(self.events.clone(), call.call_id, call.action.clone());

        let service = S::from_config(&self.config);
        let result = match handler.invoke(service, call) {
            Reply::Ready(result) => result,
            Reply::Pending(future) => future.await,
        };

        guard.complete(&result);
        result
    }

    /// Serve one call from a thread that is not driving an async runtime.
    /// Pending replies run to completion on a private current-thread runtime.
    pub fn dispatch_blocking(&self, action: &str, request: Request) -> Result<Value, Status> {
        let (handler, call) = self.prepare(action, request)?;
        let mut guard = CallGuard::start(self.events.clone(), call.call_id, call.action.clone());

        let service = S::from_config(&self.config);
        let result = match handler.invoke(service, call) {
            Reply::Ready(result) => result,
            Reply::Pending(future) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Status::internal(format!("failed to start runtime: {}", e)))
                .and_then(|runtime| runtime.block_on(future)),
        };

        guard.complete(&result);
        result
    }

    fn prepare(&self, action: &str, request: Request) -> Result<(Arc<dyn Action<S>>, Call), Status> {
        let Some(handler) = self.actions.get(action) else {
            warn!("{}::{} is not implemented", self.name, action);
            return Err(Status::unimplemented());
        };
        let call = Call {
            action: action.to_string(),
            call_id: Uuid::new_v4(),
            request,
        };
        debug!("Dispatching {}::{} ({})", self.name, action, call.call_id);
        Ok((handler.clone(), call))
    }
}
