use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),

    #[error("execution service unreachable: {0}")]
    Transport(String),

    /// message reported by the execution service, passed through untouched
    #[error("{0}")]
    RemoteExecution(String),

    #[error("invalid execution service response: {0}")]
    Protocol(String),

    #[error("refusing to run potentially destructive sql: {0}")]
    UnsafeStatement(String),

    #[error("completion failed: {0}")]
    Generation(String),

    #[error("tracing initialization failed: {0}")]
    Tracing(String),
}

impl AssistantError {
    /// true when the execution service could not be reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, AssistantError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_execution_message_is_verbatim() {
        let err = AssistantError::RemoteExecution("column \"x\" does not exist".to_string());
        assert_eq!(err.to_string(), "column \"x\" does not exist");
    }

    #[test]
    fn test_only_transport_is_transport() {
        assert!(AssistantError::Transport("refused".to_string()).is_transport());
        assert!(!AssistantError::Protocol("bad".to_string()).is_transport());
        assert!(!AssistantError::Generation("bad".to_string()).is_transport());
    }
}
