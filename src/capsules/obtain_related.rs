use super::{Capsule, ns};
use crate::xml::Element;

/// Role the taxpayer plays in a related-documents lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfcRole {
    Issuer,
    Receiver,
}

impl RfcRole {
    pub fn is_issuer(self) -> bool {
        matches!(self, RfcRole::Issuer)
    }

    pub fn is_receiver(self) -> bool {
        matches!(self, RfcRole::Receiver)
    }
}

/// Query for the documents related to a given UUID.
///
/// The taxpayer RFC lands in `RfcEmisor` or `RfcReceptor` depending on the
/// role; the other attribute is sent empty, as the service expects.
#[derive(Debug, Clone)]
pub struct ObtainRelated {
    uuid: String,
    rfc: String,
    role: RfcRole,
    pac_rfc: String,
}

impl ObtainRelated {
    pub fn new(
        uuid: impl Into<String>,
        rfc: impl Into<String>,
        role: RfcRole,
        pac_rfc: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            rfc: rfc.into(),
            role,
            pac_rfc: pac_rfc.into(),
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn role(&self) -> RfcRole {
        self.role
    }

    pub fn pac_rfc(&self) -> &str {
        &self.pac_rfc
    }
}

impl Capsule for ObtainRelated {
    fn rfc(&self) -> &str {
        &self.rfc
    }

    fn to_element_tree(&self) -> Element {
        let mut root =
            Element::with_namespace("PeticionConsultaRelacionados", ns::CANCELACION_CFDI);
        root.set_attribute(
            "RfcEmisor",
            if self.role.is_issuer() { self.rfc.as_str() } else { "" },
        );
        root.set_attribute("RfcPacEnviaSolicitud", &self.pac_rfc);
        root.set_attribute(
            "RfcReceptor",
            if self.role.is_receiver() { self.rfc.as_str() } else { "" },
        );
        root.set_attribute("Uuid", &self.uuid);
        root
    }
}
