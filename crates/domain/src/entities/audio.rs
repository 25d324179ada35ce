//! Stored audio artifacts: uploads and synthesized replies

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::value_objects::RequestId;

/// Prefix of the public path under which stored audio is served
pub const PUBLIC_AUDIO_PREFIX: &str = "audios";

/// Supported audio container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Opus codec
    Opus,
    /// OGG container
    Ogg,
    /// MP3 format
    Mp3,
    /// WAV format (uncompressed)
    Wav,
    /// FLAC format (lossless)
    Flac,
    /// WebM format (browser recordings)
    Webm,
    /// M4A/AAC format
    M4a,
}

impl AudioFormat {
    /// MIME type for this format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Opus => "audio/opus",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Webm => "audio/webm",
            Self::M4a => "audio/mp4",
        }
    }

    /// File extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Opus => "opus",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Webm => "webm",
            Self::M4a => "m4a",
        }
    }

    /// Parse from a MIME type, ignoring parameters such as `codecs=`
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let base = mime.split(';').next().unwrap_or(mime).trim();

        match base.to_ascii_lowercase().as_str() {
            "audio/opus" => Some(Self::Opus),
            "audio/ogg" | "application/ogg" => Some(Self::Ogg),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/m4a" | "audio/mp4" | "audio/x-m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Parse from a file extension (without the dot)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "opus" => Some(Self::Opus),
            "ogg" | "oga" => Some(Self::Ogg),
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "flac" => Some(Self::Flac),
            "webm" => Some(Self::Webm),
            "m4a" | "mp4" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Parse from the extension of a file name
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Whether audio came from the client or was synthesized for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioKind {
    /// Audio uploaded by the client
    Upload,
    /// Synthesized reply audio
    Reply,
}

impl AudioKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Reply => "reply",
        }
    }
}

/// Per-request storage key for an audio artifact.
///
/// Two keys with different request ids never map to the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioKey {
    /// Upload or reply
    pub kind: AudioKind,
    /// Request that produced the artifact
    pub id: RequestId,
    /// Container format
    pub format: AudioFormat,
}

impl AudioKey {
    /// Key for an uploaded file
    pub const fn upload(id: RequestId, format: AudioFormat) -> Self {
        Self {
            kind: AudioKind::Upload,
            id,
            format,
        }
    }

    /// Key for a synthesized reply
    pub const fn reply(id: RequestId, format: AudioFormat) -> Self {
        Self {
            kind: AudioKind::Reply,
            id,
            format,
        }
    }

    /// File name inside the audio directory
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.kind.prefix(),
            self.id,
            self.format.extension()
        )
    }

    /// Path handed to clients as `audio_filepath`
    pub fn public_path(&self) -> String {
        format!("{PUBLIC_AUDIO_PREFIX}/{}", self.file_name())
    }
}

/// Final file-name component of a client-supplied audio reference.
///
/// Accepts both `/` and `\` separators. Returns `None` when the reference
/// has no usable name (empty, `.` or `..`).
pub fn reference_file_name(reference: &str) -> Option<&str> {
    let name = reference
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    match name {
        "" | "." | ".." => None,
        other => Some(other),
    }
}
