//! Subcommand execution.

use crate::cli::Command;
use crate::output;
use echo_client::{ClientConfig, EchoClient, ProxyRequest};

pub async fn run(command: Command, echo: &EchoClient) -> anyhow::Result<()> {
    match command {
        Command::Send {
            url,
            method,
            headers,
            data,
            include,
        } => {
            let mut request = ProxyRequest::new(method, url);
            for (name, value) in headers {
                request = request.with_header(name, value);
            }
            if let Some(body) = data {
                request = request.with_body(body);
            }
            let response = echo.proxy().send(&request).await?;
            output::response(&response, include);
        }
        Command::Mode { mode: None } => {
            output::mode(echo.modes().get_mode().await?);
        }
        Command::Mode {
            mode: Some(requested),
        } => {
            let confirmed = echo.modes().switch_mode(requested).await?;
            output::mode_switched(requested, confirmed);
        }
        Command::Status => {
            let snapshot = echo.modes().refresh().await?;
            output::status(&snapshot);
        }
        Command::Target { url: None } => {
            output::value("Target URL", &echo.modes().get_target_url().await?);
        }
        Command::Target { url: Some(url) } => {
            let stored = echo.modes().update_target_url(&url).await?;
            output::success(&format!("Target URL set to {stored}"));
        }
        Command::Session { id: None } => {
            output::value("Session", &echo.modes().get_session_id().await?);
        }
        Command::Session { id: Some(id) } => {
            let stored = echo.modes().update_session_id(&id).await?;
            output::success(&format!("Session set to {stored}"));
        }
        Command::Sessions => {
            output::sessions(&echo.query().list_sessions().await?);
        }
        Command::Traffic { session } => {
            let session = session_or_default(session, echo.config());
            let records = echo.query().traffic_for_session(&session).await?;
            output::traffic(&session, &records);
        }
        Command::DeleteRecord { id } => {
            echo.query().delete_traffic_record(id).await?;
            output::success(&format!("Deleted traffic record {id}"));
        }
        Command::Clear { session } => {
            let session = session_or_default(session, echo.config());
            echo.query().delete_session_traffic(&session).await?;
            output::success(&format!("Cleared traffic for session {session}"));
        }
    }
    Ok(())
}

fn session_or_default(session: Option<String>, config: &ClientConfig) -> String {
    session.unwrap_or_else(|| config.default_session.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_falls_back_to_config() {
        let config = ClientConfig {
            default_session: "nightly".to_string(),
            ..Default::default()
        };
        assert_eq!(session_or_default(None, &config), "nightly");
        assert_eq!(session_or_default(Some("demo".to_string()), &config), "demo");
        assert_eq!(
            session_or_default(None, &ClientConfig::default()),
            "default-session"
        );
    }
}
