//! Recording adapter for the `ChangeRequestHost` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ChangeRequestEvent, ChangeRequestHost, HostFuture, PortError};

/// Records host interactions while delegating to an inner implementation.
pub struct RecordingHost {
    inner: Box<dyn ChangeRequestHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHost {
    /// Creates a recording host wrapping `inner`.
    pub fn new(inner: Box<dyn ChangeRequestHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct TextInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct OutputInput<'a> {
    name: &'a str,
    value: &'a str,
}

impl ChangeRequestHost for RecordingHost {
    fn event(&self) -> Result<ChangeRequestEvent, PortError> {
        let result = self.inner.event();
        record_result(&self.recorder, "host", "event", &json!({}), &result);
        result
    }

    fn update_body(&self, body: &str) -> HostFuture<'_> {
        let body = body.to_string();
        Box::pin(async move {
            let result = self.inner.update_body(&body).await;
            record_result(&self.recorder, "host", "update_body", &TextInput { text: &body }, &result);
            result
        })
    }

    fn post_comment(&self, comment: &str) -> HostFuture<'_> {
        let comment = comment.to_string();
        Box::pin(async move {
            let result = self.inner.post_comment(&comment).await;
            record_result(
                &self.recorder,
                "host",
                "post_comment",
                &TextInput { text: &comment },
                &result,
            );
            result
        })
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), PortError> {
        let result = self.inner.set_output(name, value);
        record_result(&self.recorder, "host", "set_output", &OutputInput { name, value }, &result);
        result
    }

    fn fail(&self, message: &str) -> Result<(), PortError> {
        let result = self.inner.fail(message);
        record_result(&self.recorder, "host", "fail", &TextInput { text: message }, &result);
        result
    }
}
