#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid rule configuration: {0}")]
    Configuration(String),
}
