#![allow(dead_code)]

use apparel_order::application::configuration::OrderConfiguration;
use apparel_order::domain::attachment::{AttachmentCandidate, AttachmentSource};
use apparel_order::domain::order::{Color, Material};
use std::io::Write;
use tempfile::NamedTempFile;

pub const PNG_BYTES: &[u8] = b"\x89PNG fake image body";

pub fn write_file(suffix: &str, contents: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// Red heavy t-shirt with 9 characters of text and an image: every surcharge.
pub fn fully_loaded_order() -> OrderConfiguration {
    let mut order = OrderConfiguration::new();
    order.set_color(Color::Red).unwrap();
    order.set_material(Material::Heavy);
    order.set_text("HELLO!!!!").unwrap();
    order
        .select_attachment(
            AttachmentCandidate::new("logo.png", "image/png", b"logo-bytes".to_vec()),
            AttachmentSource::Selector,
        )
        .unwrap();
    order
}
