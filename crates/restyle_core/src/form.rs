use thiserror::Error;
use url::Url;

/// Path segment appended to the API base URL for every submission.
pub const REQUEST_PATH: &str = "input_url";

/// Message shown when either form field is blank.
pub const VALIDATION_MESSAGE: &str = "Please provide both URL and topic";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", VALIDATION_MESSAGE)]
    MissingField,
    #[error("api base url cannot be used as a base for request paths: {0}")]
    UnusableBaseUrl(String),
}

/// Raw form fields as typed by the user. Never reset after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInputs {
    pub input_url: String,
    pub topic: String,
}

/// Trimmed, non-empty form fields. Only obtainable through [`FormInputs::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInputs {
    input_url: String,
    topic: String,
}

impl FormInputs {
    pub fn new(input_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            input_url: input_url.into(),
            topic: topic.into(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedInputs, ValidationError> {
        let input_url = self.input_url.trim();
        let topic = self.topic.trim();
        if input_url.is_empty() || topic.is_empty() {
            return Err(ValidationError::MissingField);
        }
        Ok(ValidatedInputs {
            input_url: input_url.to_owned(),
            topic: topic.to_owned(),
        })
    }
}

impl ValidatedInputs {
    pub fn input_url(&self) -> &str {
        &self.input_url
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Builds `{base}/input_url?input_url=<url>&topic=<topic>`.
///
/// A trailing slash on the base is tolerated and any query already present on
/// the base is replaced.
pub fn build_request_url(base: &Url, inputs: &ValidatedInputs) -> Result<Url, ValidationError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ValidationError::UnusableBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(REQUEST_PATH);
    url.query_pairs_mut()
        .clear()
        .append_pair("input_url", inputs.input_url())
        .append_pair("topic", inputs.topic());
    Ok(url)
}
