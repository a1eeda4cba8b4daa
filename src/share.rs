use log::{debug, info, warn};

use crate::builder::build_link;
use crate::config::load_outbounds;
use crate::config::outbound::OutboundDescriptor;
use crate::error::{LinkError, ShareError};
use crate::link::ShareLink;
use crate::query::append_stream_query;

/// Convert an Xray JSON configuration into newline-separated share links,
/// one per convertible outbound, in document order.
pub fn convert_xray_json_to_share_links(bytes: &[u8]) -> Result<String, ShareError> {
    let outbounds = load_outbounds(bytes)?;
    let links = share_links(&outbounds)?;
    Ok(links
        .iter()
        .map(ShareLink::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Build links for every outbound that can be shared, skipping the rest.
pub fn share_links(outbounds: &[OutboundDescriptor]) -> Result<Vec<ShareLink>, ShareError> {
    let links: Vec<ShareLink> = outbounds
        .iter()
        .enumerate()
        .filter_map(|(idx, outbound)| match outbound_link(outbound) {
            Ok(link) => {
                debug!("Outbound {} ({}) -> {}", idx, outbound.protocol.name(), link.scheme);
                Some(link)
            }
            Err(e) => {
                warn!("Skipping outbound {} ({}): {}", idx, outbound.protocol.name(), e);
                None
            }
        })
        .collect();

    if links.is_empty() {
        return Err(ShareError::NoValidOutbounds);
    }

    info!("Built {} share links from {} outbounds", links.len(), outbounds.len());
    Ok(links)
}

/// Full link for a single outbound: base link plus stream parameters.
pub fn outbound_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    let stream = outbound.decode_stream_settings()?;
    let mut link = build_link(outbound)?;
    append_stream_query(stream.as_ref(), &mut link);
    Ok(link)
}
