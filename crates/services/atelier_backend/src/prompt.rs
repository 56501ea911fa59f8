// --- File: crates/services/atelier_backend/src/prompt.rs ---
//! Terminal authorization prompt: prints the consent URL and reads the code
//! the operator pastes back on standard input.

use atelier_common::credentials::{AuthorizationPrompt, CredentialError};
use atelier_common::services::BoxFuture;
use std::io::BufRead;

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl AuthorizationPrompt for TerminalPrompt {
    fn authorize<'a>(&'a self, url: &'a str) -> BoxFuture<'a, String, CredentialError> {
        Box::pin(async move {
            println!("Please visit this URL to authorize this application:\n{}", url);
            println!("Enter the authorization code:");

            let line = tokio::task::spawn_blocking(|| {
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line).map(|_| line)
            })
            .await
            .map_err(|e| CredentialError::Prompt(e.to_string()))?
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;

            read_code(&line)
        })
    }
}

fn read_code(line: &str) -> Result<String, CredentialError> {
    let code = line.trim();
    if code.is_empty() {
        return Err(CredentialError::Prompt(
            "no authorization code entered".to_string(),
        ));
    }
    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_code_trims_line() {
        assert_eq!(read_code("4/0Aabc\n").unwrap(), "4/0Aabc");
    }

    #[test]
    fn test_read_code_rejects_blank_line() {
        assert!(matches!(read_code("  \n"), Err(CredentialError::Prompt(_))));
    }
}
