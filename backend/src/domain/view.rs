//! Pure view projection for dashboard lists.
//!
//! Rendering maps records to an environment-free [`ViewNode`] tree; the
//! browser shell turns nodes into markup. Given the same list, rendering
//! always produces the same tree, so re-renders are idempotent and the
//! mapping is testable without a live page.

use serde::Serialize;

use super::catalog::{CatalogRecord, Enquiry, Property, SellListing, Subscriber, Vehicle};

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// One node of a rendered view tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "node")]
pub enum ViewNode {
    Element {
        tag: String,
        class: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attrs: Vec<(String, String)>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<ViewNode>,
    },
    Text {
        content: String,
    },
}

impl ViewNode {
    /// Create an element node with no attributes or children.
    pub fn element(tag: &str, class: &str) -> Self {
        Self::Element {
            tag: tag.to_owned(),
            class: class.to_owned(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Append an attribute; no-op on text nodes.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((name.to_owned(), value.into()));
        }
        self
    }

    /// Append a child; no-op on text nodes.
    pub fn child(mut self, node: ViewNode) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Append a text child; no-op on text nodes.
    pub fn text_child(self, content: impl Into<String>) -> Self {
        self.child(Self::text(content))
    }
}

/// Records that project to a dashboard card or table row.
pub trait RenderCard {
    /// Project this record to its list-view node.
    fn render_card(&self) -> ViewNode;
}

/// Render a full list view: cards in the given order, or an empty-state
/// placeholder when nothing is visible.
pub fn render_list<T: RenderCard>(records: &[T], empty_message: &str) -> ViewNode {
    if records.is_empty() {
        return ViewNode::element("div", "no-data").text_child(empty_message);
    }
    let mut list = ViewNode::element("div", "item-grid");
    for record in records {
        list = list.child(record.render_card());
    }
    list
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

fn format_price(price: f64) -> String {
    let whole = price.trunc() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        grouped.push(c);
        if remaining > 1 && (remaining - 1) % 3 == 0 {
            grouped.push(',');
        }
    }
    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn status_badge(status: &str) -> ViewNode {
    ViewNode::element("span", "status-badge").text_child(status)
}

impl RenderCard for Vehicle {
    fn render_card(&self) -> ViewNode {
        let main_image = self
            .images
            .first()
            .map_or("assets/images/placeholder-car.jpg", String::as_str);
        ViewNode::element("div", "admin-item-card vehicle-card")
            .attr("data-id", self.id.to_string())
            .child(
                ViewNode::element("div", "item-image")
                    .child(
                        ViewNode::element("img", "")
                            .attr("src", main_image)
                            .attr("alt", format!("{} {}", self.make, self.model)),
                    )
                    .child(status_badge(&self.status_key())),
            )
            .child(
                ViewNode::element("div", "item-info")
                    .child(
                        ViewNode::element("h3", "")
                            .text_child(format!("{} {}", self.make, self.model)),
                    )
                    .child(
                        ViewNode::element("p", "item-details")
                            .text_child(format!("{}", self.year))
                            .text_child(format!("KES {}", format_price(self.price))),
                    )
                    .child(
                        ViewNode::element("p", "item-id")
                            .text_child(format!("ID: {}", self.vehicle_id)),
                    )
                    .child(
                        ViewNode::element("p", "item-description").text_child(truncate(
                            &self.description,
                            DESCRIPTION_PREVIEW_CHARS,
                        )),
                    ),
            )
    }
}

impl RenderCard for Property {
    fn render_card(&self) -> ViewNode {
        let main_image = self
            .images
            .first()
            .map_or("assets/images/placeholder-property.jpg", String::as_str);
        let mut features = ViewNode::element("div", "property-features");
        if let Some(bedrooms) = self.bedrooms {
            features = features.text_child(format!("{bedrooms} beds"));
        }
        if let Some(bathrooms) = self.bathrooms {
            features = features.text_child(format!("{bathrooms} baths"));
        }
        if let Some(area) = self.area {
            features = features.text_child(format!("{area} sq ft"));
        }
        ViewNode::element("div", "admin-item-card property-card")
            .attr("data-id", self.id.to_string())
            .child(
                ViewNode::element("div", "item-image")
                    .child(
                        ViewNode::element("img", "")
                            .attr("src", main_image)
                            .attr("alt", self.title.clone()),
                    )
                    .child(status_badge(&self.status_key())),
            )
            .child(
                ViewNode::element("div", "item-info")
                    .child(ViewNode::element("h3", "").text_child(self.title.clone()))
                    .child(
                        ViewNode::element("p", "item-details")
                            .text_child(self.location.clone())
                            .text_child(format!("KES {}", format_price(self.price))),
                    )
                    .child(
                        ViewNode::element("p", "item-id")
                            .text_child(format!("ID: {}", self.property_id)),
                    )
                    .child(features),
            )
    }
}

impl RenderCard for SellListing {
    fn render_card(&self) -> ViewNode {
        ViewNode::element("tr", "listing-row")
            .attr("data-id", self.id.to_string())
            .child(
                ViewNode::element("td", "listing-type").text_child(
                    self.type_key().unwrap_or_default()),
            )
            .child(ViewNode::element("td", "listing-title").text_child(self.display_title()))
            .child(
                ViewNode::element("td", "contact-info")
                    .text_child(self.seller_name.clone())
                    .text_child(self.seller_email.clone()),
            )
            .child(ViewNode::element("td", "price").text_child(
                self.price
                    .map_or_else(|| "N/A".to_owned(), |price| format_price(price)),
            ))
            .child(
                ViewNode::element("td", "listing-status").child(status_badge(&self.status_key())),
            )
    }
}

impl RenderCard for Subscriber {
    fn render_card(&self) -> ViewNode {
        ViewNode::element("tr", "subscriber-row")
            .attr("data-id", self.id.to_string())
            .child(ViewNode::element("td", "email-info").text_child(self.email.clone()))
            .child(
                ViewNode::element("td", "subscriber-name")
                    .text_child(self.name.clone().unwrap_or_else(|| "N/A".to_owned())),
            )
            .child(
                ViewNode::element("td", "subscriber-status").child(status_badge(&self.status_key())),
            )
    }
}

impl RenderCard for Enquiry {
    fn render_card(&self) -> ViewNode {
        let mut details = ViewNode::element("div", "enquiry-details")
            .text_child(format!("Email: {}", self.email))
            .text_child(format!(
                "Phone: {}",
                self.phone.clone().unwrap_or_else(|| "Not provided".to_owned())
            ));
        if let Some(subject) = &self.subject {
            details = details.text_child(format!("Subject: {subject}"));
        }
        details = details.child(
            ViewNode::element("p", "enquiry-message")
                .text_child(truncate(&self.message, DESCRIPTION_PREVIEW_CHARS)),
        );
        ViewNode::element("div", "enquiry-card")
            .attr("data-id", self.id.to_string())
            .child(
                ViewNode::element("div", "enquiry-header")
                    .child(ViewNode::element("h4", "").text_child(self.name.clone()))
                    .child(
                        ViewNode::element("span", "enquiry-type").text_child(
                            self.type_key().unwrap_or_default(),
                        ),
                    )
                    .child(status_badge(&self.status_key())),
            )
            .child(details)
    }
}
