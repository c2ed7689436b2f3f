//! JSON output formatting.

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoststore_core::host::HostRecord;

    #[test]
    fn test_host_serializes_camel_case() {
        let host = HostRecord::new("web", "10.0.0.5", "deploy").with_id(3);
        let json = format_json(&host);

        assert!(json.contains(r#""authMethod":"PASSWORD""#));
        assert!(json.contains(r#""lastConnectedAt":0"#));
        assert!(json.contains(r#""id":3"#));
    }
}
