// 💬 Popup Renderer - shop record → popup content
//
// A popup shows the shop name in bold, the address, and a link that opens
// the record's maps URL in a new browsing context. The URL is passed through
// untouched; a dead link fails in the browser, not here.

use crate::catalog::ShopRecord;
use crate::config::PopupSettings;
use crate::error::Result;
use askama::Template;
use serde::Serialize;

/// Open the link in a new browsing context
pub const NEW_BROWSING_CONTEXT: &str = "_blank";

/// Don't leak the map page as referrer
pub const LINK_REL: &str = "noreferrer";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundLink {
    pub href: String,
    pub caption: String,
    pub target: &'static str,
    pub rel: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    /// Displayed bold
    pub title: String,
    pub address: String,
    pub link: OutboundLink,
}

#[derive(Template)]
#[template(path = "popup.html")]
struct PopupTemplate<'a> {
    popup: &'a Popup,
}

impl Popup {
    /// HTML fragment handed to the mapping widget. Name and address are
    /// escaped as text, nothing else is altered.
    pub fn to_html(&self) -> Result<String> {
        Ok(PopupTemplate { popup: self }.render()?)
    }
}

#[derive(Debug, Clone)]
pub struct PopupRenderer {
    link_caption: String,
}

impl PopupRenderer {
    pub fn new(link_caption: &str) -> Self {
        PopupRenderer {
            link_caption: link_caption.to_string(),
        }
    }

    pub fn from_settings(settings: &PopupSettings) -> Self {
        Self::new(&settings.link_caption)
    }

    pub fn render(&self, shop: &ShopRecord) -> Popup {
        Popup {
            title: shop.name.clone(),
            address: shop.address.clone(),
            link: OutboundLink {
                href: shop.maps_url.clone(),
                caption: self.link_caption.clone(),
                target: NEW_BROWSING_CONTEXT,
                rel: LINK_REL,
            },
        }
    }
}

impl Default for PopupRenderer {
    fn default() -> Self {
        Self::from_settings(&PopupSettings::default())
    }
}
