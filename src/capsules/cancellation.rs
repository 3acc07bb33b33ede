use chrono::NaiveDateTime;

use super::{Capsule, DocumentType, Folio};
use crate::xml::Element;

/// Cancellation request for one or more issued documents.
///
/// Folios are keyed by UUID: a folio repeating an already-present UUID
/// replaces that entry in place, keeping the first occurrence's position.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rfc: String,
    date: NaiveDateTime,
    folios: Vec<Folio>,
    document_type: DocumentType,
}

impl Cancellation {
    pub fn new(
        rfc: impl Into<String>,
        folios: impl IntoIterator<Item = Folio>,
        date: NaiveDateTime,
    ) -> Self {
        Self::with_document_type(rfc, folios, date, DocumentType::default())
    }

    pub fn with_document_type(
        rfc: impl Into<String>,
        folios: impl IntoIterator<Item = Folio>,
        date: NaiveDateTime,
        document_type: DocumentType,
    ) -> Self {
        let mut deduped: Vec<Folio> = Vec::new();
        for folio in folios {
            match deduped.iter_mut().find(|f| f.uuid() == folio.uuid()) {
                Some(existing) => *existing = folio,
                None => deduped.push(folio),
            }
        }
        Self {
            rfc: rfc.into(),
            date,
            folios: deduped,
            document_type,
        }
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn folios(&self) -> &[Folio] {
        &self.folios
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn len(&self) -> usize {
        self.folios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folios.is_empty()
    }
}

impl Capsule for Cancellation {
    fn rfc(&self) -> &str {
        &self.rfc
    }

    fn to_element_tree(&self) -> Element {
        let ns = self.document_type.namespace();
        let mut root = Element::with_namespace("Cancelacion", ns);
        root.set_attribute("RfcEmisor", &self.rfc);
        root.set_attribute("Fecha", self.date.format("%Y-%m-%dT%H:%M:%S").to_string());

        let mut folios = Element::with_namespace("Folios", ns);
        for folio in &self.folios {
            let mut element = Element::with_namespace("Folio", ns);
            element.set_attribute("UUID", folio.effective_uuid());
            element.set_attribute("Motivo", folio.reason());
            folios.append_child(element);
        }
        root.append_child(folios);
        root
    }
}
