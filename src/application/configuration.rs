use crate::application::preview::{PreviewJob, PreviewResult};
use crate::domain::attachment::{
    Attachment, AttachmentCandidate, AttachmentId, AttachmentSource, Preview,
};
use crate::domain::order::{Color, Material, OrderPayload, OrderText, Price, Product};
use crate::domain::pricing::compute_price;
use crate::error::{OrderError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// The single live order being configured.
///
/// Every mutation goes through a method that ends by recomputing the price,
/// so [`OrderConfiguration::price`] always reflects the current selections.
#[derive(Debug, Clone)]
pub struct OrderConfiguration {
    product: Product,
    color: Color,
    material: Material,
    text: OrderText,
    attachment: Option<Attachment>,
    preview: Option<Preview>,
    price: Price,
    last_attachment_id: u64,
    drag_active: bool,
}

/// Read-only view of the configuration, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationSummary {
    pub product: Product,
    pub color: Color,
    pub material: Material,
    pub text: String,
    pub attachment: Option<String>,
    pub price: String,
}

impl Default for OrderConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderConfiguration {
    pub fn new() -> Self {
        let mut config = Self {
            product: Product::default(),
            color: Color::default(),
            material: Material::default(),
            text: OrderText::default(),
            attachment: None,
            preview: None,
            price: Price::ZERO,
            last_attachment_id: 0,
            drag_active: false,
        };
        config.recompute();
        config
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn text(&self) -> &OrderText {
        &self.text
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Switches product. A color outside the new palette falls back to black.
    pub fn set_product(&mut self, product: Product) {
        self.product = product;
        if !product.offers(self.color) {
            debug!(%product, color = %self.color, "Color not offered, resetting to black");
            self.color = Color::Black;
        }
        self.recompute();
    }

    pub fn set_color(&mut self, color: Color) -> Result<()> {
        if !self.product.offers(color) {
            return Err(OrderError::InvalidInput(format!(
                "{} is not available in {color}",
                self.product.label()
            )));
        }
        self.color = color;
        self.recompute();
        Ok(())
    }

    /// Kept for sweaters too, where it does not affect the price.
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.recompute();
    }

    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = OrderText::new(text)?;
        self.recompute();
        Ok(())
    }

    /// Validates and commits an attachment.
    ///
    /// The attachment is committed (and priced) right away; the returned job
    /// decodes the preview, whose result goes back through
    /// [`OrderConfiguration::apply_preview`].
    pub fn select_attachment(
        &mut self,
        candidate: AttachmentCandidate,
        source: AttachmentSource,
    ) -> Result<PreviewJob> {
        let candidate = candidate.validate().inspect_err(|e| {
            debug!(?source, "Attachment rejected: {e}");
        })?;

        self.last_attachment_id += 1;
        let attachment = Attachment::from_candidate(AttachmentId(self.last_attachment_id), candidate);
        info!(
            id = %attachment.id,
            file = %attachment.file_name,
            bytes = attachment.size(),
            ?source,
            "Attachment selected"
        );

        let job = PreviewJob::new(
            attachment.id,
            attachment.media_type.clone(),
            attachment.bytes.clone(),
        );
        self.attachment = Some(attachment);
        self.preview = None;
        self.recompute();
        Ok(job)
    }

    /// Handles a drop onto the form. Non-image drops are ignored without
    /// touching the configuration.
    pub fn drop_attachment(&mut self, candidate: AttachmentCandidate) -> Option<PreviewJob> {
        self.drag_active = false;
        self.select_attachment(candidate, AttachmentSource::Drop).ok()
    }

    pub fn clear_attachment(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            info!(id = %attachment.id, "Attachment removed");
        }
        self.preview = None;
        self.recompute();
    }

    /// Applies a decoded preview if it still belongs to the current
    /// attachment. Returns whether it was applied.
    pub fn apply_preview(&mut self, result: PreviewResult) -> bool {
        let current = self.attachment.as_ref().map(|a| a.id);
        if current != Some(result.attachment) {
            debug!(stale = %result.attachment, ?current, "Discarding preview for superseded attachment");
            return false;
        }
        match result.preview {
            Ok(preview) => {
                self.preview = Some(preview);
                true
            }
            Err(e) => {
                warn!(attachment = %result.attachment, "Preview unavailable: {e}");
                false
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Freezes the current selections into a submission payload.
    pub fn snapshot(&self) -> OrderPayload {
        OrderPayload {
            product: self.product,
            color: self.color,
            material: self.material,
            text: self.text.clone(),
            price: self.price,
            image: self.attachment.clone(),
        }
    }

    pub fn summary(&self) -> ConfigurationSummary {
        ConfigurationSummary {
            product: self.product,
            color: self.color,
            material: self.material,
            text: self.text.as_str().to_string(),
            attachment: self.attachment.as_ref().map(|a| a.file_name.clone()),
            price: self.price.to_form_value(),
        }
    }

    fn recompute(&mut self) {
        self.price = compute_price(
            self.product,
            self.color,
            self.material,
            self.text.len(),
            self.attachment.is_some(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn image(name: &str) -> AttachmentCandidate {
        AttachmentCandidate::new(name, "image/png", name.as_bytes().to_vec())
    }

    #[test]
    fn test_defaults() {
        let config = OrderConfiguration::new();
        assert_eq!(config.product(), Product::Tshirt);
        assert_eq!(config.color(), Color::Black);
        assert_eq!(config.material(), Material::Light);
        assert!(config.text().is_empty());
        assert!(config.attachment().is_none());
        assert_eq!(config.price(), Price::new(dec!(16.95)));
    }

    #[test]
    fn test_price_follows_every_change() {
        let mut config = OrderConfiguration::new();
        config.set_color(Color::Red).unwrap();
        assert_eq!(config.price(), Price::new(dec!(18.95)));
        config.set_material(Material::Heavy);
        assert_eq!(config.price(), Price::new(dec!(21.95)));
        config.set_text("HELLO!!!").unwrap();
        assert_eq!(config.price(), Price::new(dec!(21.95)));
        config.set_text("HELLO!!!!").unwrap();
        assert_eq!(config.price(), Price::new(dec!(26.95)));
        config.select_attachment(image("a.png"), AttachmentSource::Selector).unwrap();
        assert_eq!(config.price(), Price::new(dec!(36.95)));
        config.clear_attachment();
        assert_eq!(config.price(), Price::new(dec!(26.95)));
    }

    #[test]
    fn test_product_switch_resets_unavailable_color() {
        let mut config = OrderConfiguration::new();
        config.set_color(Color::Green).unwrap();
        config.set_product(Product::Sweater);
        assert_eq!(config.color(), Color::Black);
        assert_eq!(config.price(), Price::new(dec!(28.95)));
    }

    #[test]
    fn test_product_switch_keeps_shared_color() {
        let mut config = OrderConfiguration::new();
        config.set_color(Color::White).unwrap();
        config.set_product(Product::Sweater);
        assert_eq!(config.color(), Color::White);
    }

    #[test]
    fn test_rejected_input_leaves_state_alone() {
        let mut config = OrderConfiguration::new();
        config.set_text("short").unwrap();
        let before = config.summary();

        assert!(matches!(config.set_color(Color::Pink), Err(OrderError::InvalidInput(_))));
        assert!(matches!(
            config.set_text("this text is far too long"),
            Err(OrderError::InvalidInput(_))
        ));
        let text = AttachmentCandidate::new("notes.txt", "text/plain", b"hi".to_vec());
        assert!(matches!(
            config.select_attachment(text, AttachmentSource::Selector),
            Err(OrderError::InvalidInput(_))
        ));

        assert_eq!(config.summary(), before);
    }

    #[test]
    fn test_non_image_drop_is_silently_ignored() {
        let mut config = OrderConfiguration::new();
        config.drag_enter();
        assert!(config.is_drag_active());

        let pdf = AttachmentCandidate::new("a.pdf", "application/pdf", b"%PDF".to_vec());
        assert!(config.drop_attachment(pdf).is_none());
        assert!(!config.is_drag_active());
        assert!(config.attachment().is_none());
        assert_eq!(config.price(), Price::new(dec!(16.95)));
    }

    #[test]
    fn test_image_drop_is_committed() {
        let mut config = OrderConfiguration::new();
        config.drag_enter();
        let job = config.drop_attachment(image("drop.png")).unwrap();
        assert!(!config.is_drag_active());
        assert_eq!(config.attachment().map(|a| a.id), Some(job.attachment));
    }

    #[test]
    fn test_drag_leave_clears_indicator() {
        let mut config = OrderConfiguration::new();
        config.drag_enter();
        config.drag_leave();
        assert!(!config.is_drag_active());
    }

    #[tokio::test]
    async fn test_stale_preview_is_discarded() {
        let mut config = OrderConfiguration::new();
        let first = config.select_attachment(image("a.png"), AttachmentSource::Selector).unwrap();
        let second = config.select_attachment(image("b.png"), AttachmentSource::Selector).unwrap();

        // The newer decode finishes first, then the older one lands.
        let second_result = second.run().await;
        let first_result = first.run().await;
        assert!(config.apply_preview(second_result));
        assert!(!config.apply_preview(first_result));

        let preview = config.preview().unwrap();
        assert_eq!(Some(preview.attachment), config.attachment().map(|a| a.id));
        assert_eq!(config.attachment().unwrap().file_name, "b.png");
    }

    #[tokio::test]
    async fn test_preview_after_clear_is_discarded() {
        let mut config = OrderConfiguration::new();
        let job = config.select_attachment(image("a.png"), AttachmentSource::Selector).unwrap();
        config.clear_attachment();
        assert!(!config.apply_preview(job.run().await));
        assert!(config.preview().is_none());
    }

    #[tokio::test]
    async fn test_failed_decode_keeps_attachment_without_preview() {
        let mut config = OrderConfiguration::new();
        let empty = AttachmentCandidate::new("empty.png", "image/png", Vec::new());
        let job = config.select_attachment(empty, AttachmentSource::Selector).unwrap();
        assert!(!config.apply_preview(job.run().await));
        assert!(config.attachment().is_some());
        assert!(config.preview().is_none());
    }

    #[test]
    fn test_repeated_recompute_is_stable() {
        let mut config = OrderConfiguration::new();
        config.set_product(Product::Sweater);
        config.set_color(Color::Yellow).unwrap();
        let price = config.price();
        for _ in 0..100 {
            config.set_material(Material::Heavy);
            config.set_material(Material::Light);
        }
        assert_eq!(config.price(), price);
    }

    #[test]
    fn test_snapshot_carries_attachment() {
        let mut config = OrderConfiguration::new();
        config.select_attachment(image("logo.png"), AttachmentSource::Selector).unwrap();
        let payload = config.snapshot();
        assert_eq!(payload.price, config.price());
        assert_eq!(payload.image.unwrap().file_name, "logo.png");
    }
}
