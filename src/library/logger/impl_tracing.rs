use crate::library::logger::interface::Logger;
use std::sync::Arc;

/// Forwards log lines to `tracing`, carrying the namespace as a field.
#[derive(Debug, Clone, Default)]
pub struct LoggerTracing {
    namespace: Option<String>,
}

impl LoggerTracing {
    pub fn new() -> Self {
        Self { namespace: None }
    }
}

impl Logger for LoggerTracing {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let namespace = self.namespace.as_deref().unwrap_or("");
        tracing::info!(namespace, "{}", message);
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let namespace = self.namespace.as_deref().unwrap_or("");
        tracing::error!(namespace, "{}", message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerTracing {
            namespace: Some(new_namespace),
        })
    }
}
