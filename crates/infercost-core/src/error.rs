#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("unknown model class: '{0}' (expected 7B, 13B, or GPT-4)")]
    UnknownModel(String),

    #[error("unknown hardware type: '{0}' (expected CPU or GPU_4GB through GPU_32GB)")]
    UnknownHardware(String),

    #[error("invalid deployment mode: '{0}' (expected 'local' or 'api')")]
    InvalidMode(String),

    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("bad data table: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
