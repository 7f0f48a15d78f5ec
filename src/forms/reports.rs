use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Upper bound on the size of ad-hoc query text.
const QUERY_MAX_LEN: u64 = 64 * 1024;

/// Errors that can occur while processing report payloads.
#[derive(Debug, Error)]
pub enum ReportFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("query text is required")]
    EmptyQuery,
}

/// SQL submitted to the query console.
#[derive(Debug, Deserialize, Validate)]
pub struct AdHocQueryForm {
    #[serde(default)]
    #[validate(length(max = QUERY_MAX_LEN))]
    pub query: String,
}

impl AdHocQueryForm {
    /// Return the trimmed query text, rejecting blank input.
    pub fn into_query(self) -> Result<String, ReportFormError> {
        self.validate()?;

        let query = self.query.trim();
        if query.is_empty() {
            return Err(ReportFormError::EmptyQuery);
        }

        Ok(query.to_string())
    }
}

/// Direction of the goods an inventory report is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventoryScope {
    /// Shipping out: only stock with available quantity is listed.
    #[default]
    Outbound,
    /// Any other order type: every stock row is listed.
    Inbound,
}

impl InventoryScope {
    pub fn only_available(&self) -> bool {
        matches!(self, InventoryScope::Outbound)
    }
}

/// Query string accepted by the inventory report endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    /// `outbound` when omitted.
    pub order_type: Option<String>,
}

impl InventoryQuery {
    pub fn scope(&self) -> InventoryScope {
        match self.order_type.as_deref() {
            None => InventoryScope::Outbound,
            Some(value) if value.trim().eq_ignore_ascii_case("outbound") => {
                InventoryScope::Outbound
            }
            Some(_) => InventoryScope::Inbound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_hoc_query_is_trimmed() {
        let form = AdHocQueryForm {
            query: "  SELECT 1  ".to_string(),
        };

        assert_eq!(form.into_query().expect("query"), "SELECT 1");
    }

    #[test]
    fn blank_ad_hoc_query_is_rejected() {
        let form = AdHocQueryForm {
            query: " \n ".to_string(),
        };

        assert!(matches!(form.into_query(), Err(ReportFormError::EmptyQuery)));
    }

    #[test]
    fn inventory_scope_defaults_to_outbound() {
        let query = InventoryQuery::default();
        assert_eq!(query.scope(), InventoryScope::Outbound);
        assert!(InventoryScope::Outbound.only_available());

        let query = InventoryQuery {
            order_type: Some("OUTBOUND".to_string()),
        };
        assert_eq!(query.scope(), InventoryScope::Outbound);

        let query = InventoryQuery {
            order_type: Some("inbound".to_string()),
        };
        assert_eq!(query.scope(), InventoryScope::Inbound);
        assert!(!InventoryScope::Inbound.only_available());
    }
}
