#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use shiftlink_client::{EventChannel, UploadNotice, UploadView};
use shiftlink_core::{LocalFile, UploadError};
use tokio::sync::broadcast;

/// In-process event channel: canned replies for requests, recorded pushes.
#[derive(Default)]
pub struct FakeChannel {
    replies: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<(String, Value)>>,
    pushes: Mutex<Vec<(String, Value)>>,
}

impl FakeChannel {
    pub fn with_replies(replies: impl IntoIterator<Item = Value>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Default::default()
        })
    }

    pub fn granting(upload_url: &str, upload_id: &str) -> Arc<Self> {
        Self::with_replies([json!({"upload_url": upload_url, "upload_id": upload_id})])
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<(String, Value)> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn pushed_events(&self) -> Vec<String> {
        self.pushes().into_iter().map(|(event, _)| event).collect()
    }
}

#[async_trait]
impl EventChannel for FakeChannel {
    async fn request(
        &self,
        _target: &str,
        event: &str,
        payload: Value,
    ) -> Result<Value, UploadError> {
        self.requests
            .lock()
            .unwrap()
            .push((event.to_string(), payload));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| UploadError::Channel("no reply queued".to_string()))
    }

    async fn push(&self, _target: &str, event: &str, payload: Value) -> Result<(), UploadError> {
        self.pushes
            .lock()
            .unwrap()
            .push((event.to_string(), payload));
        Ok(())
    }
}

/// Every view published since `notices` subscribed and not yet received.
pub fn drain_views(notices: &mut broadcast::Receiver<UploadNotice>) -> Vec<UploadView> {
    let mut views = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        views.push(notice.view);
    }
    views
}

pub fn pdf(name: &str, size: usize) -> LocalFile {
    LocalFile::from_bytes(name, Some("application/pdf"), vec![b'x'; size])
}
