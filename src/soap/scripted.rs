//! In-memory transport replaying canned responses.

use super::SoapTransport;
use crate::error::{DeepSecurityError, Result, SoapErrorKind};
use crate::mapping::WireValue;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A call seen by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Vec<(String, WireValue)>,
}

impl RecordedCall {
    /// Value of a recorded parameter.
    pub fn param(&self, name: &str) -> Option<&WireValue> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

type Reply = std::result::Result<WireValue, (String, String)>;

/// Transport answering from per-method queues of scripted replies.
///
/// The last reply queued for a method is repeated once the queue drains;
/// a method with no script fails like an unreachable manager.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `method`.
    #[must_use]
    pub fn reply(self, method: &str, payload: WireValue) -> Self {
        self.push(method, Ok(payload));
        self
    }

    /// Queue a SOAP fault for `method`.
    #[must_use]
    pub fn fault(self, method: &str, code: &str, message: &str) -> Self {
        self.push(method, Err((code.to_string(), message.to_string())));
        self
    }

    fn push(&self, method: &str, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.entry(method.to_string()).or_default().push_back(reply);
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of calls received for `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }
}

impl SoapTransport for ScriptedTransport {
    fn call(&self, method: &str, params: &[(&str, WireValue)]) -> Result<WireValue> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method: method.to_string(),
                params: params
                    .iter()
                    .map(|(name, value)| ((*name).to_string(), value.clone()))
                    .collect(),
            });
        }

        let reply = {
            let mut replies = self
                .replies
                .lock()
                .map_err(|_| {
                    DeepSecurityError::soap(
                        format!("calling {method}"),
                        SoapErrorKind::Network("scripted transport poisoned".to_string()),
                    )
                })?;
            let queue = replies.get_mut(method);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Ok(payload)) => Ok(payload),
            Some(Err((code, message))) => Err(DeepSecurityError::soap(
                format!("calling {method}"),
                SoapErrorKind::Fault { code, message },
            )),
            None => Err(DeepSecurityError::soap(
                format!("calling {method}"),
                SoapErrorKind::Network(format!("no scripted reply for {method}")),
            )),
        }
    }
}
