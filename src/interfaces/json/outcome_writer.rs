use crate::domain::auth::{AuthOutcome, PaymentAuthResult};
use crate::error::{AuthError, Result};
use serde::Serialize;
use std::io::Write;

/// One line of output: the terminal outcome of an attempt, or why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub intent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AuthOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutcomeRecord {
    pub fn from_result(intent_id: impl Into<String>, result: &Result<PaymentAuthResult>) -> Self {
        let intent_id = intent_id.into();
        match result {
            Ok(auth) => Self {
                intent_id,
                outcome: Some(auth.outcome),
                status: auth.intent.status().map(|s| s.code().to_string()),
                error: None,
            },
            Err(e) => Self::from_error(intent_id, e),
        }
    }

    pub fn from_error(intent_id: impl Into<String>, error: &AuthError) -> Self {
        Self {
            intent_id: intent_id.into(),
            outcome: None,
            status: None,
            error: Some(error.to_string()),
        }
    }
}

/// Writes outcome records as JSON lines.
pub struct OutcomeWriter<W: Write> {
    writer: W,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_record(&mut self, record: &OutcomeRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
