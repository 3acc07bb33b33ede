use super::{Error, Result};

/// Cancellation reason that replaces a document with a substitute.
const REASON_SUBSTITUTION: &str = "01";

/// A single document reference inside a cancellation request.
///
/// The UUID is normalized to uppercase on construction. Reason `01`
/// (substitution) must name the replacing UUID; this is enforced here,
/// before any signing work begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folio {
    uuid: String,
    reason: String,
    substitution: Option<String>,
}

impl Folio {
    pub fn new(uuid: impl Into<String>, reason: impl Into<String>) -> Result<Self> {
        Self::build(uuid.into(), reason.into(), None)
    }

    pub fn with_substitution(
        uuid: impl Into<String>,
        reason: impl Into<String>,
        substitution: impl Into<String>,
    ) -> Result<Self> {
        Self::build(uuid.into(), reason.into(), Some(substitution.into()))
    }

    fn build(uuid: String, reason: String, substitution: Option<String>) -> Result<Self> {
        let uuid = uuid.to_uppercase();
        let substitution = substitution.filter(|s| !s.is_empty());
        if reason == REASON_SUBSTITUTION && substitution.is_none() {
            return Err(Error::MissingSubstitution { uuid });
        }
        Ok(Self {
            uuid,
            reason,
            substitution,
        })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn substitution(&self) -> Option<&str> {
        self.substitution.as_deref()
    }

    /// UUID written to the request: the substitution target when the reason
    /// signals substitution.
    pub(crate) fn effective_uuid(&self) -> &str {
        if self.reason == REASON_SUBSTITUTION {
            self.substitution.as_deref().unwrap_or(&self.uuid)
        } else {
            &self.uuid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_is_uppercased() {
        let folio = Folio::new("e174f807-befa-4cf6-9b11-2a013b12f398", "02").unwrap();
        assert_eq!(folio.uuid(), "E174F807-BEFA-4CF6-9B11-2A013B12F398");
        assert_eq!(folio.reason(), "02");
        assert!(folio.substitution().is_none());
    }

    #[test]
    fn test_reason_01_requires_substitution() {
        let result = Folio::new("11111111-2222-3333-4444-000000000001", "01");
        assert!(matches!(result, Err(Error::MissingSubstitution { .. })));

        let result = Folio::with_substitution("11111111-2222-3333-4444-000000000001", "01", "");
        assert!(matches!(result, Err(Error::MissingSubstitution { .. })));
    }

    #[test]
    fn test_reason_01_with_substitution_uses_substitute() {
        let folio = Folio::with_substitution(
            "11111111-2222-3333-4444-000000000001",
            "01",
            "99999999-2222-3333-4444-000000000001",
        )
        .unwrap();
        assert_eq!(
            folio.effective_uuid(),
            "99999999-2222-3333-4444-000000000001"
        );
        assert_eq!(folio.uuid(), "11111111-2222-3333-4444-000000000001");
    }

    #[test]
    fn test_other_reasons_keep_own_uuid() {
        let folio = Folio::with_substitution(
            "11111111-2222-3333-4444-000000000001",
            "02",
            "99999999-2222-3333-4444-000000000001",
        )
        .unwrap();
        assert_eq!(
            folio.effective_uuid(),
            "11111111-2222-3333-4444-000000000001"
        );
    }
}
