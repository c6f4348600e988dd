//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::PortalError;

impl HttpServer {
    /// Turn a bind failure into an actionable message
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> PortalError {
        match error.kind() {
            std::io::ErrorKind::AddrInUse => PortalError::internal(format!(
                "Port {} is already in use. Stop the other process or set PORTAL_PORT={}",
                port,
                port.saturating_add(1)
            )),
            std::io::ErrorKind::PermissionDenied => PortalError::internal(format!(
                "Permission denied for port {}. Use a port >= 1024, e.g. PORTAL_PORT=8080",
                port
            )),
            _ => PortalError::internal(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_format_bind_error_address_in_use() {
        let error = Error::new(ErrorKind::AddrInUse, "Address already in use");
        let message = HttpServer::format_bind_error(error, "0.0.0.0:8080", 8080).to_string();
        assert!(message.contains("8080"));
        assert!(message.contains("already in use"));
        assert!(message.contains("8081"));
    }

    #[test]
    fn test_format_bind_error_permission_denied() {
        let error = Error::new(ErrorKind::PermissionDenied, "Permission denied");
        let message = HttpServer::format_bind_error(error, "0.0.0.0:80", 80).to_string();
        assert!(message.contains("Permission denied for port 80"));
        assert!(message.contains("1024"));
    }

    #[test]
    fn test_format_bind_error_generic() {
        let error = Error::new(ErrorKind::Other, "Network unreachable");
        let message = HttpServer::format_bind_error(error, "192.168.1.1:8080", 8080).to_string();
        assert!(message.contains("Failed to bind to 192.168.1.1:8080"));
        assert!(message.contains("Network unreachable"));
    }
}
