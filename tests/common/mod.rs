//! Shared fixtures: an in-memory blog whose resolvers count their invocations.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parambind::resolver::parse_raw;
use parambind::{resolver_fn, BindingRegistry, RequestInfo, ResolveStatus};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author: u64,
    pub title: String,
}

/// Backing store with per-resolver call counters.
#[derive(Default)]
pub struct Blog {
    pub user_calls: AtomicUsize,
    pub post_calls: AtomicUsize,
    pub latency: Duration,
}

impl Blog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency,
            ..Self::default()
        })
    }

    pub fn user(id: u64) -> Option<User> {
        match id {
            1 => Some(User {
                id: 1,
                name: "Mirko".into(),
            }),
            2 => Some(User {
                id: 2,
                name: "Ana".into(),
            }),
            _ => None,
        }
    }

    pub fn post(id: u64) -> Option<Post> {
        // Odd posts belong to user 1, even posts to user 2; 999 and up do not exist.
        (id < 999).then(|| Post {
            id,
            author: 2 - id % 2,
            title: format!("Post {id}"),
        })
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    async fn load_user(self: Arc<Self>, raw: String) -> anyhow::Result<Value> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        let id: u64 = parse_raw(&raw)?;
        let user = Self::user(id)
            .ok_or_else(|| ResolveStatus::not_found(format!("user {id} does not exist")))?;
        Ok(serde_json::to_value(user)?)
    }

    async fn load_post(self: Arc<Self>, raw: String, info: RequestInfo) -> anyhow::Result<Value> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        let id: u64 = parse_raw(&raw)?;
        let post = Self::post(id)
            .ok_or_else(|| ResolveStatus::not_found(format!("post {id} does not exist")))?;

        if let Some(user) = info.resolved_params().and_then(|p| p.get_as::<User>("user").ok()) {
            if post.author != user.id {
                return Err(ResolveStatus::not_found(format!(
                    "post {id} does not belong to user {}",
                    user.id
                ))
                .into());
            }
        }
        Ok(json!(post))
    }

    /// Registry binding `user` and `post` to this store.
    pub fn registry(self: &Arc<Self>) -> BindingRegistry {
        let mut registry = BindingRegistry::new();

        let blog = Arc::clone(self);
        registry
            .register(
                "user",
                resolver_fn(move |raw, _| Arc::clone(&blog).load_user(raw)),
            )
            .unwrap();

        let blog = Arc::clone(self);
        registry
            .register(
                "post",
                resolver_fn(move |raw, info| Arc::clone(&blog).load_post(raw, info)),
            )
            .unwrap();

        registry
    }
}
