//! Audio upload and download handlers

use axum::{
    Extension, Json,
    extract::{
        Multipart, Path, State,
        multipart::{Field, MultipartError, MultipartRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::{AudioFormat, RequestId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

const NO_AUDIO: &str = "No audio file provided";

/// Upload response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Reference to pass back as `user_message` with `dtype: "audio"`
    pub audio_filepath: String,
}

/// Container format of an uploaded part
///
/// The declared content type wins, then the file extension; anything
/// unrecognised is stored as MP3.
pub fn detect_format(content_type: Option<&str>, file_name: Option<&str>) -> AudioFormat {
    content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .and_then(|m| AudioFormat::from_mime_type(m.essence_str()))
        .or_else(|| file_name.and_then(AudioFormat::from_file_name))
        .unwrap_or(AudioFormat::Mp3)
}

fn multipart_error(err: &MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Audio file exceeds {limit} bytes"))
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

async fn read_field(field: Field<'_>, limit: usize) -> Result<(AudioFormat, Vec<u8>), ApiError> {
    let format = detect_format(field.content_type(), field.file_name());
    let data = field
        .bytes()
        .await
        .map_err(|e| multipart_error(&e, limit))?;

    if data.len() > limit {
        return Err(ApiError::PayloadTooLarge(format!(
            "Audio file exceeds {limit} bytes"
        )));
    }
    Ok((format, data.to_vec()))
}

/// Store an uploaded recording under the request's id
#[instrument(skip(state, multipart))]
pub async fn upload_audio(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest(NO_AUDIO.to_string()))?;
    let limit = state.max_upload_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, limit))?
    {
        if field.name() == Some(AUDIO_FIELD) {
            upload = Some(read_field(field, limit).await?);
            break;
        }
    }

    let (format, data) = upload.ok_or_else(|| ApiError::BadRequest(NO_AUDIO.to_string()))?;
    debug!(format = %format, bytes = data.len(), "Audio upload received");

    let audio_filepath = state.audio.store_upload(&data, format, request_id).await?;
    Ok(Json(UploadResponse { audio_filepath }))
}

/// Serve a stored audio file
#[instrument(skip(state))]
pub async fn serve_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let stored = state.audio.fetch(&filename).await?;

    let content_type = stored
        .format
        .map_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string(), |f| {
            f.mime_type().to_string()
        });

    Ok(([(header::CONTENT_TYPE, content_type)], stored.data).into_response())
}
