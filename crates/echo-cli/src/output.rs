//! Terminal rendering.

use chrono::{DateTime, Local, Utc};
use echo_client::mode::{Cached, ModeSnapshot};
use echo_client::translator::StatusClass;
use echo_client::{ProxyMode, ProxyResponse, SessionSummary, TrafficRecord};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn status_color(class: StatusClass) -> &'static str {
    match class {
        StatusClass::Success => GREEN,
        StatusClass::Informational | StatusClass::Redirect => CYAN,
        StatusClass::ClientError => YELLOW,
        StatusClass::ServerError => RED,
    }
}

pub fn status_line(response: &ProxyResponse) -> String {
    let color = status_color(response.status_class());
    format!(
        "{color}{BOLD}{} {}{RESET} {DIM}({}ms){RESET}",
        response.status_code, response.status_text, response.elapsed_millis
    )
}

pub fn response(response: &ProxyResponse, include_headers: bool) {
    println!("{}", status_line(response));
    if include_headers {
        for (name, value) in &response.headers {
            println!("{DIM}{name}:{RESET} {value}");
        }
    }
    if !response.body.is_empty() {
        println!();
        println!("{}", response.pretty_body());
    }
}

pub fn mode(mode: ProxyMode) {
    println!("Mode: {CYAN}{BOLD}{mode}{RESET}");
    println!("{DIM}{}{RESET}", mode.description());
}

pub fn mode_switched(requested: ProxyMode, confirmed: ProxyMode) {
    if requested != confirmed {
        println!("{YELLOW}Warning:{RESET} requested {requested}, proxy stayed in {confirmed}");
    } else {
        println!("{GREEN}✓{RESET} Switched to {BOLD}{confirmed}{RESET}");
    }
    println!("{DIM}{}{RESET}", confirmed.description());
}

fn confirmed<T: std::fmt::Display>(value: &Option<Cached<T>>) -> String {
    match value {
        Some(cached) => format!(
            "{BOLD}{}{RESET} {DIM}(as of {}){RESET}",
            cached.value(),
            local_time(cached.confirmed_at())
        ),
        None => format!("{DIM}unknown{RESET}"),
    }
}

pub fn status(snapshot: &ModeSnapshot) {
    println!("{DIM}Mode:{RESET}    {}", confirmed(&snapshot.mode));
    println!("{DIM}Target:{RESET}  {}", confirmed(&snapshot.target_url));
    println!("{DIM}Session:{RESET} {}", confirmed(&snapshot.session_id));
    if snapshot.switching {
        println!("{YELLOW}A mode switch is in progress{RESET}");
    }
}

pub fn value(label: &str, value: &str) {
    println!("{DIM}{label}:{RESET} {BOLD}{value}{RESET}");
}

pub fn success(message: &str) {
    println!("{GREEN}✓{RESET} {message}");
}

pub fn sessions(sessions: &[SessionSummary]) {
    if sessions.is_empty() {
        println!("{DIM}No recorded sessions{RESET}");
        return;
    }
    for session in sessions {
        println!(
            "{CYAN}{}{RESET}  {BOLD}{}{RESET} {DIM}record(s){RESET}",
            session.session_id, session.record_count
        );
    }
}

pub fn traffic_line(record: &TrafficRecord) -> String {
    let status = match record.status_code {
        Some(code) => format!("{}{code}{RESET}", status_color(StatusClass::of(code))),
        None => format!("{DIM}---{RESET}"),
    };
    let when = record
        .timestamp
        .or(record.created_at)
        .map(local_time)
        .unwrap_or_default();
    format!(
        "{DIM}#{:<6}{RESET} {BOLD}{:<6}{RESET} {} {} {DIM}{}{RESET}",
        record.id,
        record.method,
        status,
        record.full_path(),
        when
    )
}

pub fn traffic(session: &str, records: &[TrafficRecord]) {
    if records.is_empty() {
        println!("{DIM}No traffic recorded for session {session}{RESET}");
        return;
    }
    for record in records {
        println!("{}", traffic_line(record));
    }
}

pub fn error(err: &anyhow::Error) {
    eprintln!("{RED}{BOLD}error:{RESET} {err:#}");
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn response_with(status_code: u16, status_text: &str) -> ProxyResponse {
        ProxyResponse {
            status_code,
            status_text: status_text.to_string(),
            headers: BTreeMap::new(),
            body: String::new(),
            elapsed_millis: 12,
        }
    }

    #[test]
    fn test_status_line_colored_by_class() {
        let line = status_line(&response_with(200, "OK"));
        assert!(line.starts_with(GREEN));
        assert!(line.contains("200 OK"));
        assert!(line.contains("(12ms)"));

        assert!(status_line(&response_with(404, "Not Found")).starts_with(YELLOW));
        assert!(status_line(&response_with(503, "Service Unavailable")).starts_with(RED));
    }

    #[test]
    fn test_traffic_line() {
        let record = TrafficRecord {
            id: 7,
            session_id: "demo".to_string(),
            method: "GET".to_string(),
            path: "/posts".to_string(),
            query_params: Some("userId=1".to_string()),
            request_headers: BTreeMap::new(),
            request_body: None,
            status_code: Some(500),
            response_headers: BTreeMap::new(),
            response_body: None,
            timestamp: None,
            created_at: None,
        };
        let line = traffic_line(&record);
        assert!(line.contains("#7"));
        assert!(line.contains("/posts?userId=1"));
        assert!(line.contains(&format!("{RED}500")));
    }
}
