//! User-Agent for requests to the compound database.
//!
//! PubChem asks automated clients to identify themselves; every gateway client
//! sends this header.

const PROJECT_URL: &str = "https://github.com/fierce/chemly";

/// `chemly/<version> (batch-identifier-resolver; +<project url>)`
#[must_use]
pub(crate) fn default_gateway_user_agent() -> String {
    format!(
        "chemly/{} (batch-identifier-resolver; +{PROJECT_URL})",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_user_agent_names_tool_and_version() {
        let ua = default_gateway_user_agent();
        assert!(ua.starts_with(&format!("chemly/{} ", env!("CARGO_PKG_VERSION"))));
        assert!(ua.ends_with(&format!("+{PROJECT_URL})")), "got {ua}");
    }
}
