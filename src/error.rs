use thiserror::Error;

/// Errors raised by the wizard engine and its collaborators.
///
/// Conditions that the wizard tolerates (unknown component tags, unknown
/// actions, unmapped pages, stale fetch results) are not represented here;
/// they are logged and reported through typed outcomes instead.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Failed to parse page schema JSON ({context}): {source}")]
    SchemaJson {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse page schema YAML ({context}): {source}")]
    SchemaYaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid page schema: {0}")]
    SchemaValidation(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {feed} (HTTP {status})")]
    HttpStatus { feed: String, status: u16 },

    #[error("Failed to load {feed}: {message}")]
    Fetch { feed: String, message: String },

    #[error("Failed to save {target}: {message}")]
    Persistence { target: String, message: String },

    #[error("Invalid walkthrough script ({context}): {source}")]
    Script {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl WizardError {
    pub fn fetch(feed: impl Into<String>, message: impl Into<String>) -> Self {
        WizardError::Fetch {
            feed: feed.into(),
            message: message.into(),
        }
    }

    pub fn persistence(target: impl Into<String>, message: impl Into<String>) -> Self {
        WizardError::Persistence {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        WizardError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type WizardResult<T> = Result<T, WizardError>;
