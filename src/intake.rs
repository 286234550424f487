use bytes::Bytes;
use thiserror::Error;

/// Raster image types the form accepts.
pub const ALLOWED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please upload a JPG, PNG, or WEBP image.")]
    UnsupportedType { media_type: String },
    #[error("File size must be 50MB or less.")]
    TooLarge { byte_size: u64, limit: u64 },
    #[error("Please select an image to upload.")]
    NoFile,
    #[error("Please fill in all required fields.")]
    MissingFields,
}

/// A file accepted into the current draft, held in memory until the form is
/// submitted or reset.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub media_type: String,
    pub byte_size: u64,
    pub data: Bytes,
}

impl StagedFile {
    /// Validate and stage a candidate file. Type is checked before size so
    /// the user sees the more specific complaint first.
    pub fn stage(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: Bytes,
        max_size: u64,
    ) -> Result<Self, ValidationError> {
        let media_type = media_type.into();

        if !ALLOWED_TYPES.contains(&media_type.as_str()) {
            return Err(ValidationError::UnsupportedType { media_type });
        }

        let byte_size = data.len() as u64;
        if byte_size > max_size {
            return Err(ValidationError::TooLarge {
                byte_size,
                limit: max_size,
            });
        }

        Ok(Self {
            name: name.into(),
            media_type,
            byte_size,
            data,
        })
    }

    /// Render the staged bytes as a data URL for local preview display.
    pub fn preview_data_url(&self) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{encoded}", self.media_type)
    }

    /// Label shown next to the preview, e.g. `sunset.jpg • 2.4 MB`.
    pub fn info_label(&self) -> String {
        format!("{} \u{2022} {}", self.name, format_file_size(self.byte_size))
    }
}

/// Human-readable size: whole bytes below 1 KB, then KB or MB to one decimal.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
