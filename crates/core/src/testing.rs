//! Scripted [`Transport`] for unit tests.

use crate::client::{HttpReply, Transport};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Method {
    Get,
    Delete,
}

enum Scripted {
    Reply(HttpReply),
    Fail(String),
    Gated(oneshot::Receiver<HttpReply>),
}

/// Replies are queued per `(method, path)` and consumed in order. Unscripted requests get 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<(Method, String)>>,
}

impl FakeTransport {
    pub(crate) fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        let body = match body {
            Value::Null => String::new(),
            other => other.to_string(),
        };
        self.push(method, path, Scripted::Reply(HttpReply { status, body }));
    }

    pub(crate) fn reply_text(&self, method: Method, path: &str, status: u16, body: &str) {
        let reply = HttpReply {
            status,
            body: body.to_string(),
        };
        self.push(method, path, Scripted::Reply(reply));
    }

    pub(crate) fn fail(&self, method: Method, path: &str, error: &str) {
        self.push(method, path, Scripted::Fail(error.to_string()));
    }

    /// The request stays pending until the returned sender fires.
    pub(crate) fn gate(&self, method: Method, path: &str) -> oneshot::Sender<HttpReply> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Gated(rx));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    async fn serve(&self, method: Method, path: &str) -> anyhow::Result<HttpReply> {
        self.requests
            .lock()
            .unwrap()
            .push((method, path.to_string()));

        let next = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);

        match next {
            None => Ok(HttpReply {
                status: 404,
                body: String::new(),
            }),
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(error)) => Err(anyhow::anyhow!(error)),
            Some(Scripted::Gated(rx)) => Ok(rx.await?),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str) -> anyhow::Result<HttpReply> {
        self.serve(Method::Get, path).await
    }

    async fn delete(&self, path: &str) -> anyhow::Result<HttpReply> {
        self.serve(Method::Delete, path).await
    }
}

pub(crate) fn ok_json(body: Value) -> HttpReply {
    HttpReply {
        status: 200,
        body: body.to_string(),
    }
}
