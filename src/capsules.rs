mod cancellation;
mod error;
mod folio;
mod obtain_related;

pub use cancellation::Cancellation;
pub use error::Error;
pub use folio::Folio;
pub use obtain_related::{ObtainRelated, RfcRole};

use crate::xml::Element;

pub type Result<T> = std::result::Result<T, Error>;

// Request schema namespaces published by SAT
pub mod ns {
    pub const CANCELACION_CFDI: &str = "http://cancelacfd.sat.gob.mx";
    pub const CANCELACION_RETENCIONES: &str = "http://www.sat.gob.mx/esquemas/retencionpago/1";
}

/// Schema the cancellation request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentType {
    #[default]
    Cfdi,
    Retention,
}

impl DocumentType {
    pub fn namespace(self) -> &'static str {
        match self {
            DocumentType::Cfdi => ns::CANCELACION_CFDI,
            DocumentType::Retention => ns::CANCELACION_RETENCIONES,
        }
    }
}

/// A request payload that renders itself as an unsigned element tree.
///
/// Implementations are the fixed request types the signing service accepts;
/// the signer never inspects the tree beyond canonicalizing it.
pub trait Capsule {
    /// Taxpayer RFC that owns the request.
    fn rfc(&self) -> &str;

    /// Unsigned root element for this request.
    fn to_element_tree(&self) -> Element;

    fn belongs_to(&self, rfc: &str) -> bool {
        self.rfc() == rfc
    }
}
