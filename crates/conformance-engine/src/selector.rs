//! Profile/version selection.
//!
//! Decides which test profile applies to a target service: an
//! explicit override wins, then the version the service reports on
//! its root endpoint, then a fallback. Every branch produces a
//! human-auditable reason that becomes part of the report.

use conformance_client::RequestTransport;
use conformance_core::StandardVersion;
use tracing::debug;

/// Outcome of profile selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSelection {
    pub version: StandardVersion,
    pub reason: String,
}

/// Selects the test profile for one service.
pub struct ProfileSelector<'a> {
    transport: &'a dyn RequestTransport,
}

impl<'a> ProfileSelector<'a> {
    pub fn new(transport: &'a dyn RequestTransport) -> Self {
        Self { transport }
    }

    /// Select the profile for `service_url`, honoring an explicit
    /// override first. `service_url` must already be normalized.
    pub async fn select(&self, service_url: &str, explicit: Option<&str>) -> ProfileSelection {
        if let Some(token) = explicit.filter(|t| !t.is_empty()) {
            return match StandardVersion::parse(token) {
                Ok(version) => ProfileSelection {
                    version,
                    reason: format!("Standard version {version} read from profile parameter"),
                },
                Err(_) => {
                    let version = StandardVersion::newest();
                    ProfileSelection {
                        version,
                        reason: format!(
                            "Could not read standard version from profile parameter defaulting to {version}"
                        ),
                    }
                }
            };
        }

        let root = match self.transport.get(&format!("{service_url}/")).await {
            Ok(document) => document,
            Err(err) => {
                debug!(%err, "root endpoint unreachable, selecting oldest version");
                let version = StandardVersion::oldest();
                return ProfileSelection {
                    version,
                    reason: format!(
                        "Could not read response from '/' endpoint defaulting to {version}"
                    ),
                };
            }
        };

        match root
            .get("version")
            .and_then(|v| v.as_str())
            .and_then(|token| StandardVersion::parse(token).ok())
        {
            Some(version) => ProfileSelection {
                version,
                reason: format!("Standard version {version} read from '/' endpoint"),
            },
            None => {
                let version = StandardVersion::newest();
                ProfileSelection {
                    version,
                    reason: format!(
                        "Could not read standard version from '/' endpoint defaulting to {version}"
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conformance_client::{MemoryTransport, TransportError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const URL: &str = "https://x.org";

    #[tokio::test]
    async fn test_explicit_recognized_token_wins() {
        let transport = MemoryTransport::new();
        let selector = ProfileSelector::new(&transport);

        let selection = selector.select(URL, Some("HSDS-UK-1.0")).await;
        assert_eq!(selection.version, StandardVersion::V1);
        assert_eq!(
            selection.reason,
            "Standard version HSDS-UK-1.0 read from profile parameter"
        );
        // The root endpoint is never consulted.
        assert!(transport.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_unrecognized_token_falls_back_to_newest() {
        let transport = MemoryTransport::new();
        let selector = ProfileSelector::new(&transport);

        let selection = selector.select(URL, Some("HSDS-UK-9.9")).await;
        assert_eq!(selection.version, StandardVersion::V3);
        assert!(selection.reason.contains("profile parameter"));
        assert!(selection.reason.contains("defaulting"));
    }

    #[tokio::test]
    async fn test_version_read_from_root_endpoint() {
        let mut transport = MemoryTransport::new();
        transport.insert(format!("{URL}/"), json!({"version": "HSDS-UK-3.0"}));
        let selector = ProfileSelector::new(&transport);

        let selection = selector.select(URL, None).await;
        assert_eq!(selection.version, StandardVersion::V3);
        assert_eq!(
            selection.reason,
            "Standard version HSDS-UK-3.0 read from '/' endpoint"
        );
        // The probe hits the `/` endpoint, not the bare base URL.
        assert_eq!(transport.requested_urls(), vec![format!("{URL}/")]);
    }

    #[tokio::test]
    async fn test_unreachable_root_falls_back_to_oldest() {
        let mut transport = MemoryTransport::new();
        transport.insert_failure(format!("{URL}/"), TransportError::network("connection refused"));
        let selector = ProfileSelector::new(&transport);

        let selection = selector.select(URL, None).await;
        assert_eq!(selection.version, StandardVersion::V1);
        assert_eq!(
            selection.reason,
            "Could not read response from '/' endpoint defaulting to HSDS-UK-1.0"
        );
    }

    #[tokio::test]
    async fn test_root_without_version_falls_back_to_newest() {
        let mut transport = MemoryTransport::new();
        transport.insert(format!("{URL}/"), json!({"name": "a service directory"}));
        let selector = ProfileSelector::new(&transport);

        let selection = selector.select(URL, None).await;
        assert_eq!(selection.version, StandardVersion::V3);
        assert_eq!(
            selection.reason,
            "Could not read standard version from '/' endpoint defaulting to HSDS-UK-3.0"
        );
    }

    #[tokio::test]
    async fn test_selection_is_deterministic() {
        let mut transport = MemoryTransport::new();
        transport.insert(format!("{URL}/"), json!({"version": "HSDS-UK-3.0"}));
        let selector = ProfileSelector::new(&transport);

        let first = selector.select(URL, None).await;
        let second = selector.select(URL, None).await;
        assert_eq!(first, second);
    }
}
