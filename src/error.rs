pub type EmberdeckResult<T> = Result<T, EmberdeckError>;

#[derive(thiserror::Error, Debug)]
pub enum EmberdeckError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EmberdeckError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            EmberdeckError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            EmberdeckError::data("x")
                .to_string()
                .contains("data error:")
        );
        assert!(
            EmberdeckError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            EmberdeckError::asset("x")
                .to_string()
                .contains("asset error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = EmberdeckError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
