//! Working copy of the booking form.
//!
//! The draft holds raw field values exactly as posted. The price estimate is
//! never stored: it is derived from the current values whenever it is read,
//! so it always matches the service, size, frequency, staff and area shown.

use std::{collections::BTreeMap, sync::LazyLock};

use chrono::{Days, Months, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::ValidateEmail;

use crate::{
    availability::{format_time, is_daily_slot, parse_date, parse_time, DAILY_SLOTS},
    catalog::{find_service, is_property_type, Frequency, SizeTier, MAX_STAFF},
    models::{BookingRequest, ContactDetails, ContactMessage},
    pricing::{estimate_for, PriceError, PriceEstimate, PriceSelection},
};

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z] \d[A-Za-z]\d$").expect("postal code pattern is valid")
});

pub const DEFAULT_CITY: &str = "Ottawa";
/// Days ahead of today pre-filled in a fresh form.
const DEFAULT_LEAD_DAYS: u64 = 2;
const MAX_LEAD_MONTHS: u32 = 3;

/// Field name to message, in field order for stable rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BookingDraft {
    pub service: String,
    pub property_type: String,
    pub property_size: String,
    pub frequency: String,
    pub staff_count: String,
    pub area: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub special_instructions: String,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            service: String::new(),
            property_type: String::new(),
            property_size: SizeTier::default().as_str().to_string(),
            frequency: Frequency::default().as_str().to_string(),
            staff_count: "1".to_string(),
            area: String::new(),
            date: String::new(),
            time: format_time(DAILY_SLOTS[0]),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: DEFAULT_CITY.to_string(),
            postal_code: String::new(),
            special_instructions: String::new(),
        }
    }
}

impl BookingDraft {
    /// A fresh form dated `DEFAULT_LEAD_DAYS` after `today`.
    pub fn new(today: NaiveDate) -> Self {
        let date = today
            .checked_add_days(Days::new(DEFAULT_LEAD_DAYS))
            .unwrap_or(today);
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn staff(&self) -> u32 {
        self.staff_count.trim().parse().unwrap_or(1)
    }

    pub fn area_value(&self) -> Option<Decimal> {
        self.area.trim().parse::<Decimal>().ok()
    }

    pub fn needs_area(&self) -> bool {
        find_service(&self.service).is_some_and(|service| service.price_unit.needs_area())
    }

    pub fn selection(&self) -> PriceSelection<'_> {
        PriceSelection {
            service: self.service.trim(),
            size: self.property_size.trim(),
            frequency: self.frequency.trim(),
            area: self.area_value(),
            staff_count: self.staff(),
        }
    }

    pub fn estimate(&self) -> Result<PriceEstimate, PriceError> {
        estimate_for(&self.selection())
    }

    /// Check every field and build the request to persist.
    pub fn validate(&self, today: NaiveDate) -> Result<BookingRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let service = self.service.trim();
        if service.is_empty() {
            errors.add("service", "Please select a service");
        } else if find_service(service).is_none() {
            errors.add("service", "Please select a valid service");
        }

        let property_type = self.property_type.trim();
        if property_type.is_empty() {
            errors.add("property_type", "Please select a property type");
        } else if !is_property_type(property_type) {
            errors.add("property_type", "Please select a valid property type");
        }

        if self.property_size.parse::<SizeTier>().is_err() {
            errors.add("property_size", "Please select a property size");
        }
        if self.frequency.parse::<Frequency>().is_err() {
            errors.add("frequency", "Please select a frequency");
        }

        let staff = self.staff_count.trim().parse::<u32>().unwrap_or(0);
        if staff == 0 || staff > MAX_STAFF {
            errors.add("staff_count", format!("Choose between 1 and {MAX_STAFF} staff members"));
        }

        let date = validate_date(&self.date, today, &mut errors);

        let time = parse_time(&self.time).filter(|time| is_daily_slot(*time));
        if self.time.trim().is_empty() {
            errors.add("time", "Time is required");
        } else if time.is_none() {
            errors.add("time", "Please pick one of the listed times");
        }

        required(&mut errors, "name", &self.name, "Name is required");
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        required(&mut errors, "phone", &self.phone, "Phone number is required");
        required(&mut errors, "address", &self.address, "Address is required");
        required(&mut errors, "city", &self.city, "City is required");
        if self.postal_code.trim().is_empty() {
            errors.add("postal_code", "Postal code is required");
        } else if !POSTAL_CODE.is_match(self.postal_code.trim()) {
            errors.add("postal_code", "Enter a valid postal code (e.g. K1A 0B1)");
        }

        let estimate = match self.estimate() {
            Ok(estimate) => Some(estimate.total_price),
            Err(PriceError::AreaRequired) => {
                errors.add("area", "Please enter the area in square feet");
                None
            }
            // Services without a listed price are quoted by the office.
            Err(PriceError::NotFound) => None,
            Err(err) => {
                errors.add("staff_count", err.to_string());
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        let (Some(date), Some(time)) = (date, time) else {
            return Err(errors);
        };

        let instructions = self.special_instructions.trim();
        Ok(BookingRequest {
            service_id: service.to_string(),
            property_type: property_type.to_string(),
            size: self.property_size.trim().to_string(),
            area: self.needs_area().then(|| self.area_value()).flatten(),
            date: date.format("%Y-%m-%d").to_string(),
            time: format_time(time),
            frequency: self.frequency.trim().to_string(),
            staff_count: staff,
            contact: ContactDetails {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                phone: self.phone.trim().to_string(),
                address: self.address.trim().to_string(),
                city: self.city.trim().to_string(),
                postal_code: self.postal_code.trim().to_uppercase(),
            },
            special_instructions: (!instructions.is_empty()).then(|| instructions.to_string()),
            estimated_price: estimate,
        })
    }
}

fn validate_date(value: &str, today: NaiveDate, errors: &mut FieldErrors) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        errors.add("date", "Date is required");
        return None;
    }
    let Some(date) = parse_date(value) else {
        errors.add("date", "Enter the date as YYYY-MM-DD");
        return None;
    };
    if date <= today {
        errors.add("date", "Bookings start from tomorrow");
        return None;
    }
    let latest = today
        .checked_add_months(Months::new(MAX_LEAD_MONTHS))
        .unwrap_or(today);
    if date > latest {
        errors.add("date", "Bookings can be made up to 3 months in advance");
        return None;
    }
    Some(date)
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    value.validate_email()
        && value
            .rsplit_once('.')
            .is_some_and(|(_, tld)| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactDraft {
    pub fn validate(&self) -> Result<ContactMessage, FieldErrors> {
        let mut errors = FieldErrors::default();
        required(&mut errors, "name", &self.name, "Name is required");
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        if crate::catalog::contact_subject_label(self.subject.trim()).is_none() {
            errors.add("subject", "Please select a subject");
        }
        required(&mut errors, "message", &self.message, "Message is required");

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        })
    }
}
