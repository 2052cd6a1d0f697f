pub mod types;
pub mod utils;
pub mod observability;
pub mod admin_http;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn status_line_formats_code_and_reason() {
        assert_eq!(types::status_line(axum::http::StatusCode::BAD_REQUEST), "400 Bad Request");
        assert_eq!(types::status_line(axum::http::StatusCode::OK), "200 OK");
    }
}
