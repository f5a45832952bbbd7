use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use url::Url;

use crate::chat::ChatConfig;
use crate::chat::config::DEFAULT_TIMEOUT;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, CLIENT_UPLOAD_BYTES,
    CLIENT_UPLOAD_ERRORS, CLIENT_UPLOADS,
};
use crate::remote_model::RemoteModel;
use crate::types::{
    Content, FileReference, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Model, OutgoingTurn, Turn, UploadFileRequest, UploadFileResponse,
};

/// Default endpoint of the Gemini API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/";
const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    model: Model,
    system_instruction: Option<String>,
    generation_config: GenerationConfig,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client from a resolved chat configuration.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let mut client = Self::with_options(
            config.api_key.expose().to_string(),
            Some(config.base_url.clone()),
            Some(config.timeout),
        )?;
        client.model = config.model.clone();
        client.system_instruction = config.system_prompt.clone();
        client.generation_config = GenerationConfig {
            max_output_tokens: Some(config.max_tokens),
            temperature: config.temperature,
        };
        Ok(client)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::configuration("API key must not be empty"));
        }

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            model: Model::default(),
            system_instruction: None,
            generation_config: GenerationConfig::default(),
            logger: None,
        })
    }

    /// Sets the model used for `generateContent` calls.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system instruction sent with every request.
    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    /// Attaches a logger that observes every request, response and upload.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the model used for requests.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, self.api_key_header()?);
        Ok(headers)
    }

    fn api_key_header(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::configuration("API key contains invalid characters"))?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let status = detail.as_ref().and_then(|d| d.status.clone());
        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| error_body.clone());

        match status_code {
            400 => Error::bad_request(message),
            401 => Error::authentication(message),
            403 => Error::permission(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            429 => Error::rate_limit(message, retry_after),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message, retry_after),
            _ => Error::api(status_code, status, message),
        }
    }

    /// Send a `generateContent` request and return the parsed response.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let model = self.model.to_string();
        if let Some(logger) = &self.logger {
            logger.log_request(&model, request);
        }
        CLIENT_REQUESTS.click();
        let started = Instant::now();
        let result = self.generate_inner(request).await;
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(&model, response);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_error("generate", err);
                }
            }
        }
        result
    }

    async fn generate_inner(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(&format!(
            "{API_VERSION}/{}:generateContent",
            self.model.resource_name()
        ))?;

        let response = self
            .client
            .post(url)
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })
    }

    /// Upload a local file through the Files API.
    ///
    /// Uses the resumable protocol: one request opens an upload session, a second
    /// sends the bytes and finalizes it.
    pub async fn upload_file(&self, path: &Path) -> Result<FileReference> {
        CLIENT_UPLOADS.click();
        let result = self.upload_file_inner(path).await;
        match &result {
            Ok(reference) => {
                if let Some(logger) = &self.logger {
                    logger.log_upload(reference);
                }
            }
            Err(err) => {
                CLIENT_UPLOAD_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_error("upload", err);
                }
            }
        }
        result
    }

    async fn upload_file_inner(&self, path: &Path) -> Result<FileReference> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|err| Error::io_at("failed to inspect file", path, err))?;
        if !metadata.is_file() {
            return Err(Error::file_not_found(path));
        }
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| Error::io_at("failed to read file", path, err))?;
        let mime_type = mime_guess::from_path(path)
            .first_or_text_plain()
            .essence_str()
            .to_string();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let url = self.endpoint(&format!("upload/{API_VERSION}/files"))?;
        let response = self
            .client
            .post(url)
            .headers(self.default_headers()?)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type.as_str())
            .json(&UploadFileRequest::new(display_name))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let upload_url = response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|val| val.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                Error::http_client(
                    format!("upload session response is missing the {UPLOAD_URL_HEADER} header"),
                    None,
                )
            })?;

        let size = bytes.len() as u64;
        let response = self
            .client
            .post(upload_url)
            .header(API_KEY_HEADER, self.api_key_header()?)
            .header(header::CONTENT_TYPE, mime_type.as_str())
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let uploaded = response.json::<UploadFileResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse upload response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        CLIENT_UPLOAD_BYTES.count(size);
        Ok(uploaded.file)
    }

    /// Build the request for `turn` following `history`.
    pub fn build_request(&self, history: &[Turn], turn: &OutgoingTurn) -> GenerateContentRequest {
        let contents = history
            .iter()
            .map(Content::from)
            .chain(std::iter::once(Content::from(turn)))
            .collect();
        GenerateContentRequest::new(contents)
            .with_system_instruction(self.system_instruction.as_deref().map(Content::text))
            .with_generation_config(self.generation_config.clone())
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("system_instruction", &self.system_instruction)
            .field("generation_config", &self.generation_config)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl RemoteModel for Gemini {
    async fn register_file(&self, path: &Path) -> Result<FileReference> {
        self.upload_file(path).await
    }

    async fn send_turn(&self, history: &[Turn], turn: &OutgoingTurn) -> Result<String> {
        let request = self.build_request(history, turn);
        self.generate(&request).await?.into_reply()
    }
}
