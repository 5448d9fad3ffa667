use std::fmt::Display;

/// Operator facing outcome of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

impl Notification {
    pub(crate) fn all_saved() -> Self {
        Self::Success("All user limits updated!".to_string())
    }

    /// `failed_names` lists the users whose update was rejected
    pub(crate) fn save_failed(failed_names: &[String], committed_count: usize) -> Self {
        let mut msg = format!(
            "Failed to update limits for: {}.",
            failed_names.join(", ")
        );
        if committed_count > 0 {
            msg.push_str(&format!(
                " {committed_count} other update(s) were saved. Save again to retry."
            ));
        } else {
            msg.push_str(" Save again to retry.");
        }
        Self::Failure(msg)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(..))
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(msg) | Notification::Failure(msg) => msg,
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
