use crate::Status;
use futures::future::BoxFuture;
use protoforge_core::parse_dict;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use uuid::Uuid;

/// A handler type served by a [`crate::Servicer`]. A fresh instance is
/// built from the servicer's config for every call.
pub trait Service: Sized + Send + 'static {
    type Config: Send + Sync + 'static;

    fn from_config(config: &Self::Config) -> Self;
}

/// Incoming request payload plus caller metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub message: Value,
    pub metadata: BTreeMap<String, String>,
}

impl Request {
    pub fn new(message: Value) -> Self {
        Self {
            message,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Decode the payload into a typed message, ignoring undeclared keys
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Status> {
        Ok(parse_dict(self.message.clone())?)
    }
}

/// Everything a handler sees about the call it is serving
#[derive(Debug, Clone)]
pub struct Call {
    pub action: String,
    pub call_id: Uuid,
    pub request: Request,
}

pub type ReplyFuture = BoxFuture<'static, Result<Value, Status>>;

/// Handler result: available now, or still to be driven to completion
pub enum Reply {
    Ready(Result<Value, Status>),
    Pending(ReplyFuture),
}

/// One named action of a service
pub trait Action<S>: Send + Sync {
    fn invoke(&self, service: S, call: Call) -> Reply;
}

/// Action backed by a plain function that answers immediately
pub struct BlockingAction<F> {
    handler: F,
}

impl<F> BlockingAction<F> {
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<S, F> Action<S> for BlockingAction<F>
where
    F: Fn(S, Call) -> Result<Value, Status> + Send + Sync,
{
    fn invoke(&self, service: S, call: Call) -> Reply {
        Reply::Ready((self.handler)(service, call))
    }
}

/// Action backed by an async function
pub struct FunctionAction<F> {
    handler: F,
}

impl<F> FunctionAction<F> {
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<S, F, Fut> Action<S> for FunctionAction<F>
where
    F: Fn(S, Call) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, Status>> + Send + 'static,
{
    fn invoke(&self, service: S, call: Call) -> Reply {
        Reply::Pending(Box::pin((self.handler)(service, call)))
    }
}
