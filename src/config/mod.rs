pub mod outbound;
pub mod stream;

use serde::Deserialize;

use crate::error::ShareError;
use outbound::OutboundDescriptor;

/// The parts of an Xray configuration document that share links are built from.
/// Every other top-level section is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub outbounds: Vec<OutboundDescriptor>,
}

pub fn load_document(bytes: &[u8]) -> Result<ConfigDocument, ShareError> {
    let document: ConfigDocument = serde_json::from_slice(bytes)?;
    Ok(document)
}

/// Decode `bytes` and return its outbounds, failing when there are none.
pub fn load_outbounds(bytes: &[u8]) -> Result<Vec<OutboundDescriptor>, ShareError> {
    let document = load_document(bytes)?;
    if document.outbounds.is_empty() {
        return Err(ShareError::NoOutbounds);
    }
    Ok(document.outbounds)
}
