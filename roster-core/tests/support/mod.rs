#![allow(dead_code)]

//! Shared fixtures for the integration tests: a scripted gateway and record
//! builders.

use async_trait::async_trait;
use roster_core::error::{CoreError, Result};
use roster_core::gateway::UserGateway;
use roster_model::{NewUser, PageSnapshot, User, UserId};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

pub fn user(id: UserId, first: &str, last: &str, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: String::new(),
    }
}

pub fn remote_user(id: u64) -> User {
    user(
        UserId::Num(id),
        &format!("Remote{id}"),
        "Person",
        &format!("remote{id}@x.com"),
    )
}

pub fn draft(first: &str, last: &str, email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: String::new(),
    }
}

pub fn page_snapshot(ids: &[u64], total: u32) -> PageSnapshot {
    PageSnapshot {
        items: ids.iter().copied().map(remote_user).collect(),
        page: 1,
        per_page: 6,
        total,
    }
}

pub fn server_error(message: &str) -> CoreError {
    CoreError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Gateway double fed from scripted response queues. Every remote call is
/// also recorded so tests can assert ordering (remote ack before overlay
/// mutation, and so on).
#[derive(Default)]
pub struct StubGateway {
    pages: Mutex<VecDeque<Result<PageSnapshot>>>,
    creates: Mutex<VecDeque<Result<User>>>,
    updates: Mutex<VecDeque<Result<User>>>,
    deletes: Mutex<VecDeque<Result<()>>>,
    calls: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_page(&self, outcome: Result<PageSnapshot>) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    pub fn script_create(&self, outcome: Result<User>) {
        self.creates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    pub fn script_update(&self, outcome: Result<User>) {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    pub fn script_delete(&self, outcome: Result<()>) {
        self.deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
        queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(CoreError::Api {
                    status: 599,
                    message: "no scripted response".to_string(),
                })
            })
    }
}

#[async_trait]
impl UserGateway for StubGateway {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<PageSnapshot> {
        self.record(format!("fetch page={page} per_page={per_page}"));
        Self::next(&self.pages)
    }

    async fn create_user(&self, draft: &NewUser) -> Result<User> {
        self.record(format!("create {}", draft.email));
        Self::next(&self.creates)
    }

    async fn update_user(&self, id: &UserId, _draft: &NewUser) -> Result<User> {
        self.record(format!("update {id}"));
        Self::next(&self.updates)
    }

    async fn delete_user(&self, id: &UserId) -> Result<()> {
        self.record(format!("delete {id}"));
        Self::next(&self.deletes)
    }
}
