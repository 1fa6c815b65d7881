use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use protoforge_core::message_to_dict;
use protoforge_server::{Call, CallEvent, Request, Service, Servicer, Status};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Post {
    #[serde(default)]
    id: i32,
    title: String,
    #[serde(default)]
    published: bool,
}

#[derive(Debug, Deserialize)]
struct GetPostRequest {
    id: i32,
}

#[derive(Debug, Deserialize)]
struct UpdatePostRequest {
    post: Post,
}

#[derive(Default)]
struct Store {
    next_id: i32,
    posts: BTreeMap<i32, Post>,
}

#[derive(Default)]
struct BlogConfig {
    store: Arc<Mutex<Store>>,
}

struct PostService {
    store: Arc<Mutex<Store>>,
}

impl Service for PostService {
    type Config = BlogConfig;

    fn from_config(config: &BlogConfig) -> Self {
        Self {
            store: config.store.clone(),
        }
    }
}

impl PostService {
    fn store(&self) -> Result<MutexGuard<'_, Store>, Status> {
        self.store
            .lock()
            .map_err(|_| Status::internal("post store poisoned"))
    }

    fn list(&self) -> Result<Value, Status> {
        let store = self.store()?;
        let posts: Vec<_> = store.posts.values().cloned().collect();
        Ok(json!({ "posts": message_to_dict(&posts)?, "next_page_token": "" }))
    }

    fn create(&self, call: &Call) -> Result<Value, Status> {
        let mut post: Post = call.request.parse()?;
        let mut store = self.store()?;
        store.next_id += 1;
        post.id = store.next_id;
        store.posts.insert(post.id, post.clone());
        Ok(message_to_dict(&post)?)
    }

    fn retrieve(&self, call: &Call) -> Result<Value, Status> {
        let request: GetPostRequest = call.request.parse()?;
        let store = self.store()?;
        let post = store
            .posts
            .get(&request.id)
            .ok_or_else(|| Status::not_found(format!("Post:{} not found!", request.id)))?;
        Ok(message_to_dict(post)?)
    }

    fn update(&self, call: &Call) -> Result<Value, Status> {
        let request: UpdatePostRequest = call.request.parse()?;
        let mut store = self.store()?;
        let post = store
            .posts
            .get_mut(&request.post.id)
            .ok_or_else(|| Status::not_found(format!("Post:{} not found!", request.post.id)))?;
        *post = request.post;
        Ok(message_to_dict(post)?)
    }

    fn destroy(&self, call: &Call) -> Result<Value, Status> {
        let request: GetPostRequest = call.request.parse()?;
        self.store()?.posts.remove(&request.id);
        Ok(json!({}))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let servicer = Servicer::<PostService>::new("PostController", BlogConfig::default())
        .sync_action("List", |svc: PostService, _call| svc.list())
        .sync_action("Create", |svc: PostService, call| svc.create(&call))
        .sync_action("Retrieve", |svc: PostService, call| svc.retrieve(&call))
        .sync_action("Update", |svc: PostService, call| svc.update(&call))
        .sync_action("Destroy", |svc: PostService, call| svc.destroy(&call));

    let mut events = servicer.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let CallEvent::Finished { action, ok, .. } = event {
                info!("{} finished (ok: {})", action, ok);
            }
        }
    });

    let created = servicer
        .dispatch("Create", Request::new(json!({ "title": "Hello", "published": true })))
        .await?;
    println!("Created: {}", created);

    let id = created["id"].clone();
    let fetched = servicer
        .dispatch("Retrieve", Request::new(json!({ "id": id })))
        .await?;
    println!("Retrieved: {}", fetched);

    servicer
        .dispatch(
            "Update",
            Request::new(json!({ "post": { "id": id, "title": "Hello again" }, "update_mask": "title" })),
        )
        .await?;
    println!("Listed: {}", servicer.dispatch("List", Request::default()).await?);

    servicer.dispatch("Destroy", Request::new(json!({ "id": id }))).await?;
    if let Err(status) = servicer.dispatch("Retrieve", Request::new(json!({ "id": id }))).await {
        println!("After destroy: {}", status);
    }
    if let Err(status) = servicer.dispatch("Archive", Request::default()).await {
        error!("{}", status);
    }

    Ok(())
}
