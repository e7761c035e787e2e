// ABOUTME: LXD container backend speaking the REST API over its Unix socket.
// ABOUTME: One HTTP/1.1 connection per request, each bounded by the backend deadline.

use crate::config::Settings;
use crate::runtime::detection::detect_lxd_socket;
use crate::runtime::error::RuntimeError;
use crate::runtime::traits::{
    ContainerError, ContainerOps, ContainerSpec, RuntimeInfo, RuntimeInfoError,
};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;

/// Standard LXD response envelope.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    operation: String,
    #[serde(default)]
    error: String,
    #[serde(default)]
    metadata: serde_json::Value,
}

/// Request body plus the extra headers it needs.
struct Payload {
    body: Bytes,
    headers: Vec<(&'static str, String)>,
}

impl Payload {
    fn empty() -> Self {
        Self {
            body: Bytes::new(),
            headers: Vec::new(),
        }
    }

    fn json(value: &serde_json::Value) -> Self {
        Self {
            body: Bytes::from(value.to_string()),
            headers: vec![("Content-Type", "application/json".to_string())],
        }
    }
}

pub struct LxdRuntime {
    socket_path: PathBuf,
    call_timeout: Duration,
}

impl LxdRuntime {
    pub fn new(socket_path: impl Into<PathBuf>, call_timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            call_timeout,
        }
    }

    /// Detect the LXD socket and check that the daemon answers.
    pub async fn connect(settings: &Settings) -> Result<Self, RuntimeError> {
        let socket = detect_lxd_socket(settings.lxd_socket.as_deref())?;
        let runtime = Self::new(socket, settings.backend_timeout);
        let version = runtime.ping().await?;
        tracing::debug!(
            "Connected to LXD at {} (API {})",
            runtime.socket_path.display(),
            version
        );
        Ok(runtime)
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        payload: Payload,
    ) -> Result<(StatusCode, Envelope), ContainerError> {
        let what = format!("{} {}", method, uri);
        tokio::time::timeout(self.call_timeout, self.send(method, uri, payload))
            .await
            .map_err(|_| ContainerError::Timeout(what))?
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        payload: Payload,
    ) -> Result<(StatusCode, Envelope), ContainerError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            ContainerError::Runtime(format!(
                "failed to connect to {}: {}",
                self.socket_path.display(),
                e
            ))
        })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| ContainerError::Runtime(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("LXD connection error: {}", e);
            }
        });

        let mut builder = hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header("Host", "lxd");
        for (name, value) in &payload.headers {
            builder = builder.header(*name, value.as_str());
        }
        let req = builder
            .body(Full::new(payload.body))
            .map_err(|e| ContainerError::Runtime(format!("failed to build request: {}", e)))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| ContainerError::Runtime(format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| ContainerError::Runtime(format!("failed to read response: {}", e)))?
            .to_bytes();

        let envelope = if body.is_empty() {
            Envelope::default()
        } else {
            serde_json::from_slice(&body).map_err(|e| {
                ContainerError::Runtime(format!("malformed LXD response: {}", e))
            })?
        };

        Ok((status, envelope))
    }

    /// Block until a background operation finishes.
    async fn wait_operation(&self, operation: &str) -> Result<(), ContainerError> {
        let uri = format!("{}/wait?timeout={}", operation, self.call_timeout.as_secs());
        let (status, envelope) = self.request(Method::GET, &uri, Payload::empty()).await?;
        if !status.is_success() {
            return Err(ContainerError::Runtime(format!(
                "waiting for {} failed: {}",
                operation, envelope.error
            )));
        }

        let code = envelope.metadata["status_code"].as_u64().unwrap_or(0);
        if code == 200 {
            Ok(())
        } else {
            let err = envelope.metadata["err"].as_str().unwrap_or("unknown error");
            Err(ContainerError::Runtime(format!("operation {} failed: {}", operation, err)))
        }
    }

    /// Wait for async responses, pass sync ones through.
    async fn settle(&self, envelope: &Envelope) -> Result<(), ContainerError> {
        if envelope.kind == "async" && !envelope.operation.is_empty() {
            self.wait_operation(&envelope.operation).await
        } else {
            Ok(())
        }
    }

    async fn change_state(&self, name: &str, action: &str) -> Result<(), ContainerError> {
        let body = serde_json::json!({ "action": action, "timeout": 30, "force": false });
        let uri = format!("/1.0/instances/{}/state", name);
        let (status, envelope) = self.request(Method::PUT, &uri, Payload::json(&body)).await?;
        check_status(status, &envelope, name)
    }
}

fn check_status(status: StatusCode, envelope: &Envelope, name: &str) -> Result<(), ContainerError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(ContainerError::NotFound(name.to_string()))
    } else if status == StatusCode::CONFLICT {
        Err(ContainerError::AlreadyExists(name.to_string()))
    } else {
        Err(ContainerError::Runtime(format!(
            "{} ({}): {}",
            name,
            status.as_u16(),
            envelope.error
        )))
    }
}

#[async_trait]
impl RuntimeInfo for LxdRuntime {
    async fn ping(&self) -> Result<String, RuntimeInfoError> {
        let (status, envelope) = self
            .request(Method::GET, "/1.0", Payload::empty())
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(RuntimeInfoError::Runtime(format!(
                "{}: {}",
                status.as_u16(),
                envelope.error
            )));
        }

        Ok(envelope.metadata["api_version"]
            .as_str()
            .unwrap_or("unknown")
            .to_string())
    }
}

#[async_trait]
impl ContainerOps for LxdRuntime {
    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError> {
        let uri = format!("/1.0/instances/{}", name);
        let (status, envelope) = self.request(Method::GET, &uri, Payload::empty()).await?;
        match check_status(status, &envelope, name) {
            Ok(()) => Ok(true),
            Err(ContainerError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn container_status(&self, name: &str) -> Result<String, ContainerError> {
        let uri = format!("/1.0/instances/{}/state", name);
        let (status, envelope) = self.request(Method::GET, &uri, Payload::empty()).await?;
        check_status(status, &envelope, name)?;

        envelope.metadata["status"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ContainerError::Runtime(format!("no status reported for {}", name)))
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<(), ContainerError> {
        let body = serde_json::json!({
            "name": spec.name,
            "type": "container",
            "source": { "type": "image", "alias": spec.image_alias },
            "ephemeral": false,
            "config": spec.config,
            "devices": spec.devices,
        });

        let (status, envelope) = self
            .request(Method::POST, "/1.0/instances", Payload::json(&body))
            .await?;
        check_status(status, &envelope, &spec.name)?;
        self.settle(&envelope).await
    }

    async fn start_container(&self, name: &str) -> Result<(), ContainerError> {
        self.change_state(name, "start").await
    }

    async fn stop_container(&self, name: &str) -> Result<(), ContainerError> {
        self.change_state(name, "stop").await
    }

    async fn delete_container(&self, name: &str) -> Result<(), ContainerError> {
        let uri = format!("/1.0/instances/{}", name);
        let (status, envelope) = self.request(Method::DELETE, &uri, Payload::empty()).await?;
        check_status(status, &envelope, name)?;
        self.settle(&envelope).await
    }

    async fn write_file(
        &self,
        name: &str,
        path: &str,
        contents: &[u8],
    ) -> Result<(), ContainerError> {
        let uri = format!(
            "/1.0/instances/{}/files?path={}",
            name,
            urlencoding::encode(path)
        );
        let payload = Payload {
            body: Bytes::copy_from_slice(contents),
            headers: vec![
                ("Content-Type", "application/octet-stream".to_string()),
                ("X-LXD-type", "file".to_string()),
                ("X-LXD-mode", "0644".to_string()),
                ("X-LXD-uid", "0".to_string()),
                ("X-LXD-gid", "0".to_string()),
                ("X-LXD-write", "overwrite".to_string()),
            ],
        };

        let (status, envelope) = self.request(Method::POST, &uri, payload).await?;
        check_status(status, &envelope, name)
    }
}
