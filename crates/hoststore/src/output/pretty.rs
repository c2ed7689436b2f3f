//! Pretty output formatting.

use chrono::{DateTime, Utc};

use hoststore_core::host::{AuthMethod, HostRecord};

/// Format an epoch-millisecond timestamp, or "never" for 0.
fn format_timestamp(millis: i64) -> String {
    if millis == 0 {
        return "never".to_string();
    }
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Format a host for display.
pub fn format_host(host: &HostRecord) -> String {
    let mut output = format!(
        "{}\n  ID: {}\n  Target: {}@{}:{}\n  Auth: {}",
        host.display_name(),
        host.id,
        host.username,
        host.address,
        host.port,
        host.auth_method
    );
    if host.auth_method == AuthMethod::Key {
        output.push_str(&format!("\n  Key: {}", host.private_key_path));
    }
    if let Some(dir) = &host.initial_directory {
        output.push_str(&format!("\n  Directory: {}", dir));
    }
    output.push_str(&format!(
        "\n  Order: {}\n  Last connected: {}",
        host.sort_order,
        format_timestamp(host.last_connected_at)
    ));
    output
}

/// Format hosts for display.
pub fn format_hosts(hosts: &[HostRecord]) -> String {
    if hosts.is_empty() {
        return "No hosts found.".to_string();
    }
    let mut output = format!("HOSTS ({})\n", hosts.len());
    output.push_str(&"-".repeat(40));
    for host in hosts {
        output.push_str(&format!("\n{}", format_host(host)));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_host_with_key() {
        let host = HostRecord::new("bastion", "203.0.113.7", "ops")
            .with_id(9)
            .with_port(2222)
            .with_key("/keys/ops", "")
            .with_initial_directory(None);

        let output = format_host(&host);

        assert!(output.starts_with("bastion\n"));
        assert!(output.contains("Target: ops@203.0.113.7:2222"));
        assert!(output.contains("Auth: KEY"));
        assert!(output.contains("Key: /keys/ops"));
        assert!(!output.contains("Directory"));
        assert!(output.contains("Last connected: never"));
    }

    #[test]
    fn test_format_host_uses_display_name_fallback() {
        let host = HostRecord::new("", "10.0.0.1", "root");
        assert!(format_host(&host).starts_with("root@10.0.0.1:22\n"));
    }

    #[test]
    fn test_format_hosts_empty() {
        assert_eq!(format_hosts(&[]), "No hosts found.");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "never");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20 UTC");
    }
}
