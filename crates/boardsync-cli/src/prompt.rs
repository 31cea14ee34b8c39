//! Interactive completion of missing board credentials.

use boardsync_core::{ConfigError, CredentialField, CredentialResolver};
use console::{Term, style};

/// Asks on the terminal for values that were neither passed nor stored.
/// Fails without a terminal instead of blocking on stdin.
#[derive(Debug)]
pub struct ConsolePrompt {
    term: Term,
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl CredentialResolver for ConsolePrompt {
    fn resolve(&mut self, board_name: &str, field: CredentialField) -> Result<String, ConfigError> {
        if !self.term.is_term() {
            return Err(ConfigError::MissingCredential(field));
        }

        let label = match field {
            CredentialField::ApiKey => "API Key",
            CredentialField::BoardId => "Board ID",
        };
        let prompt = format!("{} {label} for '{board_name}': ", style("?").cyan().bold());

        let answer = self.term.write_str(&prompt).and_then(|()| match field {
            CredentialField::ApiKey => self.term.read_secure_line(),
            CredentialField::BoardId => self.term.read_line(),
        });

        answer.map_err(|_| ConfigError::MissingCredential(field))
    }
}
