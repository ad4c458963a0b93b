use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FacturaError {
    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("{tool} not found. Install poppler-utils and tesseract-ocr: brew install poppler tesseract (macOS) or apt install poppler-utils tesseract-ocr (Linux)")]
    ToolNotFound { tool: String },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("failed to parse OCR output: {0}")]
    OcrParse(String),

    #[error("failed to load template from {path}: {reason}")]
    TemplateLoad { path: PathBuf, reason: String },

    #[error("invalid template: {0}")]
    TemplateInvalid(String),

    #[error("unknown template preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
