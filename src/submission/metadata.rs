use axum::http::HeaderMap;

pub const UNKNOWN_IP: &str = "unknown";

/// Client IP as reported by the fronting proxy: the first
/// `X-Forwarded-For` entry, else `X-Real-IP`, else `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(xff) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = xff.split(',').map(|s| s.trim()).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    header_str(headers, "x-real-ip")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "user-agent").map(|s| s.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
