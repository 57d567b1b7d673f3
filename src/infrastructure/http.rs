use crate::config::Config;
use crate::domain::order::OrderPayload;
use crate::domain::ports::OrderTransport;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// Submits orders to the remote order service as a multipart POST.
///
/// Fields are `product`, `color`, `material`, `text`, `price` and, when an
/// image is attached, a binary `image` part. Any 2xx response is success.
#[derive(Debug, Clone)]
pub struct HttpOrderTransport {
    client: Client,
    endpoint: String,
}

impl HttpOrderTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }
}

fn build_form(payload: &OrderPayload) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in payload.form_fields() {
        form = form.text(name, value);
    }
    if let Some(image) = &payload.image {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.media_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

#[async_trait]
impl OrderTransport for HttpOrderTransport {
    async fn submit(&self, payload: OrderPayload) -> Result<()> {
        let form = build_form(&payload)?;
        debug!(endpoint = %self.endpoint, with_image = payload.image.is_some(), "Posting order");

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(OrderError::Transfer(format!(
                "order service responded with {status}"
            )))
        }
    }
}
