//! Form-to-email relay client.
//!
//! Submissions are posted as JSON to a Web3Forms-compatible endpoint. Any 2xx
//! status counts as delivered; the response body is not inspected.

use std::time::Duration;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::{
    catalog::{contact_subject_label, find_frequency, find_service, Frequency, SizeTier},
    config::RelayConfig,
    models::{BookingRequest, ContactMessage},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("email relay is not configured")]
    Disabled,
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay answered with status {0}")]
    Rejected(u16),
}

#[derive(Clone)]
pub struct RelayClient {
    config: RelayConfig,
    http: reqwest::Client,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, http })
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled()
    }

    /// Adds the access key and recipient, then posts the payload.
    pub async fn submit(&self, fields: Map<String, Value>) -> Result<(), RelayError> {
        if !self.enabled() {
            return Err(RelayError::Disabled);
        }
        let body = self.envelope(fields);
        let response = self.http.post(&self.config.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Rejected(status.as_u16()));
        }
        Ok(())
    }

    fn envelope(&self, mut fields: Map<String, Value>) -> Value {
        fields.insert("access_key".into(), json!(self.config.access_key));
        if let Some(to) = &self.config.recipient {
            fields.insert("to".into(), json!(to));
        }
        Value::Object(fields)
    }
}

pub fn booking_payload(business: &str, request: &BookingRequest) -> Map<String, Value> {
    let service = find_service(&request.service_id)
        .map(|service| service.name)
        .unwrap_or(request.service_id.as_str());
    let size = request
        .size
        .parse::<SizeTier>()
        .map(|size| size.label())
        .unwrap_or(request.size.as_str());
    let frequency = request
        .frequency
        .parse::<Frequency>()
        .ok()
        .and_then(find_frequency)
        .map(|option| option.label)
        .unwrap_or(request.frequency.as_str());
    let price = request
        .estimated_price
        .map(|price| format!("${price} CAD"))
        .unwrap_or_else(|| "to be quoted".to_string());
    let property = match request.area {
        Some(area) => format!("{} ({size}, {area} sq ft)", request.property_type),
        None => format!("{} ({size})", request.property_type),
    };
    let contact = &request.contact;

    let message = format!(
        "Service: {service}\n\
         Property: {property}\n\
         Frequency: {frequency}\n\
         Date: {} at {}\n\
         Staff: {}\n\
         Estimated price: {price}\n\n\
         Name: {}\nEmail: {}\nPhone: {}\nAddress: {}, {} {}\n\n\
         Special instructions: {}",
        request.date,
        request.time,
        request.staff_count,
        contact.name,
        contact.email,
        contact.phone,
        contact.address,
        contact.city,
        contact.postal_code,
        request.special_instructions.as_deref().unwrap_or("none"),
    );

    let mut fields = Map::new();
    fields.insert("subject".into(), json!(format!("New booking request - {business}")));
    fields.insert("from_name".into(), json!(format!("{business} Website")));
    fields.insert("replyto".into(), json!(contact.email));
    fields.insert("message".into(), json!(message));
    fields
}

pub fn contact_payload(business: &str, message: &ContactMessage) -> Map<String, Value> {
    let subject = contact_subject_label(&message.subject).unwrap_or("Other");

    let mut fields = Map::new();
    fields.insert("subject".into(), json!(format!("{subject} - {business}")));
    fields.insert("from_name".into(), json!(message.name));
    fields.insert("name".into(), json!(message.name));
    fields.insert("email".into(), json!(message.email));
    fields.insert("phone".into(), json!(message.phone));
    fields.insert("message".into(), json!(message.message));
    fields
}
