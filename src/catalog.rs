//! Static reference data: services, pricing table, frequencies and FAQs.
//!
//! Everything here is built once on first access and never mutated. Lookups
//! return `Option` so an unselected or stale id is an ordinary state for the
//! forms rather than an error.

use std::{fmt, str::FromStr, sync::LazyLock};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownId {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownId {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Residential,
    Commercial,
    Industrial,
    Specialized,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Residential,
        ServiceCategory::Commercial,
        ServiceCategory::Industrial,
        ServiceCategory::Specialized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Residential => "residential",
            ServiceCategory::Commercial => "commercial",
            ServiceCategory::Industrial => "industrial",
            ServiceCategory::Specialized => "specialized",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Residential => "Residential",
            ServiceCategory::Commercial => "Commercial",
            ServiceCategory::Industrial => "Industrial",
            ServiceCategory::Specialized => "Specialized",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = UnknownId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ServiceCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
            .ok_or_else(|| UnknownId::new("category", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceUnit {
    Fixed,
    PerArea,
    PerHour,
    PerRoom,
}

impl PriceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceUnit::Fixed => "fixed",
            PriceUnit::PerArea => "per-area",
            PriceUnit::PerHour => "per-hour",
            PriceUnit::PerRoom => "per-room",
        }
    }

    /// Suffix shown after a price, e.g. `$0.75 / sq ft`.
    pub fn suffix(&self) -> &'static str {
        match self {
            PriceUnit::Fixed => "",
            PriceUnit::PerArea => " / sq ft",
            PriceUnit::PerHour => " / hour",
            PriceUnit::PerRoom => " / room",
        }
    }

    pub fn needs_area(&self) -> bool {
        matches!(self, PriceUnit::PerArea)
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SizeTier {
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "xlarge")]
    ExtraLarge,
}

impl SizeTier {
    pub const ALL: [SizeTier; 4] = [
        SizeTier::Small,
        SizeTier::Medium,
        SizeTier::Large,
        SizeTier::ExtraLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
            SizeTier::ExtraLarge => "xlarge",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Small => "Small (< 1,000 sq ft)",
            SizeTier::Medium => "Medium (1,000 - 2,000 sq ft)",
            SizeTier::Large => "Large (2,000 - 3,500 sq ft)",
            SizeTier::ExtraLarge => "Extra Large (> 3,500 sq ft)",
        }
    }
}

impl Default for SizeTier {
    fn default() -> Self {
        SizeTier::Medium
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeTier {
    type Err = UnknownId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "small" => Ok(SizeTier::Small),
            "medium" => Ok(SizeTier::Medium),
            "large" => Ok(SizeTier::Large),
            "xlarge" | "extra-large" => Ok(SizeTier::ExtraLarge),
            _ => Err(UnknownId::new("size", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Monthly,
    BiWeekly,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::OneTime => "one-time",
            Frequency::Monthly => "monthly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Weekly => "weekly",
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::OneTime
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = UnknownId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "one-time" => Ok(Frequency::OneTime),
            "monthly" => Ok(Frequency::Monthly),
            "bi-weekly" => Ok(Frequency::BiWeekly),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(UnknownId::new("frequency", value)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ServiceCategory,
    pub base_price: Decimal,
    pub price_unit: PriceUnit,
    pub eco: bool,
    pub popular: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOption {
    pub service_id: &'static str,
    pub size: SizeTier,
    pub price: Decimal,
    pub unit: PriceUnit,
    pub estimated_duration: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyOption {
    pub id: Frequency,
    pub label: &'static str,
    pub discount_percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqCategory {
    General,
    Residential,
    Industrial,
    Pricing,
    Booking,
}

#[derive(Debug, Clone, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
    pub category: FaqCategory,
}

/// A `<select>` entry with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

pub const PROPERTY_TYPES: [Choice; 8] = [
    Choice { value: "apartment", label: "Apartment" },
    Choice { value: "house", label: "House" },
    Choice { value: "office", label: "Office" },
    Choice { value: "retail", label: "Retail Space" },
    Choice { value: "restaurant", label: "Restaurant" },
    Choice { value: "warehouse", label: "Warehouse" },
    Choice { value: "industrial", label: "Industrial Facility" },
    Choice { value: "other", label: "Other" },
];

pub const CONTACT_SUBJECTS: [Choice; 5] = [
    Choice { value: "quote", label: "Request a Quote" },
    Choice { value: "booking", label: "Booking Inquiry" },
    Choice { value: "feedback", label: "Feedback" },
    Choice { value: "complaint", label: "Complaint" },
    Choice { value: "other", label: "Other" },
];

pub const STAFF_CHOICES: [(u32, &str); 3] = [
    (1, "1 Person (Standard)"),
    (2, "2 People (Faster)"),
    (3, "3 People (Quickest)"),
];

pub const MAX_STAFF: u32 = 3;

static SERVICES: LazyLock<Vec<Service>> = LazyLock::new(|| {
    use PriceUnit::{Fixed, PerArea};
    use ServiceCategory::*;

    vec![
        Service {
            id: "residential-standard",
            name: "Standard Home Cleaning",
            description: "Complete cleaning of living spaces including dusting, vacuuming, mopping, and bathroom sanitization.",
            category: Residential,
            base_price: dec!(120),
            price_unit: Fixed,
            eco: true,
            popular: true,
        },
        Service {
            id: "residential-deep",
            name: "Deep Home Cleaning",
            description: "Thorough cleaning including hard-to-reach areas, inside appliances, detailed kitchen and bathroom cleaning.",
            category: Residential,
            base_price: dec!(220),
            price_unit: Fixed,
            eco: true,
            popular: true,
        },
        Service {
            id: "residential-move",
            name: "Move-In/Move-Out Cleaning",
            description: "Comprehensive cleaning for moving in or out of a property to ensure a pristine space.",
            category: Residential,
            base_price: dec!(240),
            price_unit: Fixed,
            eco: true,
            popular: false,
        },
        Service {
            id: "commercial-office",
            name: "Office Cleaning",
            description: "Professional cleaning for office spaces including workstations, meeting rooms, and common areas.",
            category: Commercial,
            base_price: dec!(0.75),
            price_unit: PerArea,
            eco: true,
            popular: true,
        },
        Service {
            id: "commercial-retail",
            name: "Retail Space Cleaning",
            description: "Specialized cleaning for retail environments focusing on customer areas and merchandise displays.",
            category: Commercial,
            base_price: dec!(0.85),
            price_unit: PerArea,
            eco: true,
            popular: false,
        },
        Service {
            id: "commercial-restaurant",
            name: "Restaurant Cleaning",
            description: "Detailed cleaning for food service areas, dining spaces, and kitchens with attention to health regulations.",
            category: Commercial,
            base_price: dec!(1.25),
            price_unit: PerArea,
            eco: true,
            popular: false,
        },
        Service {
            id: "industrial-warehouse",
            name: "Warehouse Cleaning",
            description: "Heavy-duty cleaning for warehouses, including floor scrubbing, dust removal, and loading dock areas.",
            category: Industrial,
            base_price: dec!(0.55),
            price_unit: PerArea,
            eco: false,
            popular: false,
        },
        Service {
            id: "industrial-manufacturing",
            name: "Manufacturing Facility Cleaning",
            description: "Specialized cleaning for manufacturing environments, addressing machinery areas and production floors.",
            category: Industrial,
            base_price: dec!(0.85),
            price_unit: PerArea,
            eco: false,
            popular: false,
        },
        Service {
            id: "industrial-construction",
            name: "Post-Construction Cleaning",
            description: "Thorough cleaning after construction or renovation projects, removing dust, debris, and construction materials.",
            category: Industrial,
            base_price: dec!(1.05),
            price_unit: PerArea,
            eco: false,
            popular: true,
        },
        Service {
            id: "specialized-carpet",
            name: "Carpet Cleaning",
            description: "Deep cleaning of carpets using steam extraction method to remove stains, allergens, and odors.",
            category: Specialized,
            base_price: dec!(0.40),
            price_unit: PerArea,
            eco: true,
            popular: false,
        },
        Service {
            id: "specialized-window",
            name: "Window Cleaning",
            description: "Professional cleaning of interior and exterior windows, including frames and sills.",
            category: Specialized,
            base_price: dec!(8),
            price_unit: Fixed,
            eco: true,
            popular: false,
        },
        Service {
            id: "specialized-pressure",
            name: "Pressure Washing",
            description: "High-pressure cleaning for exterior surfaces, driveways, decks, and siding.",
            category: Specialized,
            base_price: dec!(0.75),
            price_unit: PerArea,
            eco: false,
            popular: false,
        },
    ]
});

static PRICING: LazyLock<Vec<PricingOption>> = LazyLock::new(|| {
    use PriceUnit::{Fixed, PerArea};
    use SizeTier::*;

    let fixed = |service_id, size, price, duration| PricingOption {
        service_id,
        size,
        price,
        unit: Fixed,
        estimated_duration: Some(duration),
    };
    let per_area = |service_id, size, price| PricingOption {
        service_id,
        size,
        price,
        unit: PerArea,
        estimated_duration: None,
    };

    vec![
        fixed("residential-standard", Small, dec!(120), "2-3 hours"),
        fixed("residential-standard", Medium, dec!(160), "3-4 hours"),
        fixed("residential-standard", Large, dec!(200), "4-5 hours"),
        fixed("residential-standard", ExtraLarge, dec!(240), "5-6 hours"),
        fixed("residential-deep", Small, dec!(220), "4-5 hours"),
        fixed("residential-deep", Medium, dec!(280), "5-6 hours"),
        fixed("residential-deep", Large, dec!(340), "6-7 hours"),
        fixed("residential-deep", ExtraLarge, dec!(400), "7-8 hours"),
        per_area("commercial-office", Small, dec!(0.75)),
        per_area("commercial-office", Medium, dec!(0.70)),
        per_area("commercial-office", Large, dec!(0.65)),
        per_area("commercial-office", ExtraLarge, dec!(0.60)),
        per_area("industrial-warehouse", Small, dec!(0.55)),
        per_area("industrial-warehouse", Medium, dec!(0.50)),
        per_area("industrial-warehouse", Large, dec!(0.45)),
        per_area("industrial-warehouse", ExtraLarge, dec!(0.40)),
    ]
});

static FREQUENCIES: [FrequencyOption; 4] = [
    FrequencyOption {
        id: Frequency::OneTime,
        label: "One-time",
        discount_percent: 0,
    },
    FrequencyOption {
        id: Frequency::Monthly,
        label: "Monthly",
        discount_percent: 5,
    },
    FrequencyOption {
        id: Frequency::BiWeekly,
        label: "Bi-weekly",
        discount_percent: 10,
    },
    FrequencyOption {
        id: Frequency::Weekly,
        label: "Weekly",
        discount_percent: 15,
    },
];

static FAQS: [Faq; 10] = [
    Faq {
        question: "How do I book a cleaning service?",
        answer: "You can book our services through our online booking system on this website, by calling our customer service line, or by sending an email. Our online system allows you to select the type of service, date, time, and any special requirements you may have.",
        category: FaqCategory::Booking,
    },
    Faq {
        question: "What areas in Ottawa do you serve?",
        answer: "We serve the entire Ottawa region, including downtown, suburbs, and surrounding areas like Kanata, Orleans, Barrhaven, Nepean, and Stittsville. For locations outside these areas, please contact us to check availability.",
        category: FaqCategory::General,
    },
    Faq {
        question: "Do I need to provide cleaning supplies?",
        answer: "No, we bring all necessary cleaning supplies and equipment. We use professional-grade products that are effective and, when requested, environmentally friendly. If you have specific products you prefer we use in your home or business, we're happy to accommodate.",
        category: FaqCategory::General,
    },
    Faq {
        question: "What is included in your standard residential cleaning?",
        answer: "Our standard residential cleaning includes dusting of all accessible surfaces, vacuuming carpets and floors, mopping hard floors, cleaning kitchen counters, appliance exteriors, sinks, and fixtures, bathroom sanitization including toilets, showers, tubs, and sinks, and emptying trash bins.",
        category: FaqCategory::Residential,
    },
    Faq {
        question: "How does your pricing work?",
        answer: "Our pricing is based on several factors including the type of service, size of the space, frequency of cleaning, and any special requirements. We offer fixed pricing for standard residential services and per square foot pricing for commercial and industrial spaces. You can get an estimate using our pricing calculator.",
        category: FaqCategory::Pricing,
    },
    Faq {
        question: "Do you offer recurring cleaning schedules?",
        answer: "Yes, we offer weekly, bi-weekly, and monthly recurring cleaning services. Regular clients receive priority scheduling and discounted rates. You can easily set up a recurring schedule through our booking system.",
        category: FaqCategory::Booking,
    },
    Faq {
        question: "What COVID-19 precautions do your cleaners take?",
        answer: "Our staff follows all public health guidelines, including wearing masks and gloves, maintaining social distancing when clients are present, using disinfectants effective against viruses, and practicing thorough hand hygiene. All our team members are screened regularly.",
        category: FaqCategory::General,
    },
    Faq {
        question: "Can you accommodate specialized industrial cleaning needs?",
        answer: "Yes, we have specialized teams for industrial cleaning with expertise in manufacturing facilities, warehouses, and construction sites. We can develop customized cleaning protocols for your specific industrial environment and compliance requirements.",
        category: FaqCategory::Industrial,
    },
    Faq {
        question: "What eco-friendly options do you offer?",
        answer: "We offer completely eco-friendly cleaning options using green-certified products that are effective yet safe for the environment, children, and pets. Our eco-friendly approach includes microfiber cleaning cloths, HEPA filter vacuums, and sustainable practices to minimize waste.",
        category: FaqCategory::General,
    },
    Faq {
        question: "How do you ensure quality control?",
        answer: "We maintain high standards through comprehensive training of our staff, detailed cleaning checklists, regular supervision, and quality inspections. We also value client feedback and conduct follow-ups after service to ensure satisfaction.",
        category: FaqCategory::General,
    },
];

pub fn services() -> &'static [Service] {
    &SERVICES
}

pub fn pricing_options() -> &'static [PricingOption] {
    &PRICING
}

pub fn frequencies() -> &'static [FrequencyOption] {
    &FREQUENCIES
}

pub fn find_service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.id == id)
}

pub fn find_pricing_option(service_id: &str, size: SizeTier) -> Option<&'static PricingOption> {
    PRICING
        .iter()
        .find(|option| option.service_id == service_id && option.size == size)
}

pub fn find_frequency(id: Frequency) -> Option<&'static FrequencyOption> {
    FREQUENCIES.iter().find(|option| option.id == id)
}

pub fn services_by_category(category: ServiceCategory) -> Vec<&'static Service> {
    SERVICES
        .iter()
        .filter(|service| service.category == category)
        .collect()
}

pub fn popular_services() -> Vec<&'static Service> {
    SERVICES.iter().filter(|service| service.popular).collect()
}

#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub category: ServiceCategory,
    pub services: Vec<&'static Service>,
}

/// Services grouped by category in catalog order, empty groups skipped.
pub fn category_groups() -> Vec<CategoryGroup> {
    ServiceCategory::ALL
        .into_iter()
        .map(|category| CategoryGroup {
            category,
            services: services_by_category(category),
        })
        .filter(|group| !group.services.is_empty())
        .collect()
}

pub fn faqs_for(category: Option<FaqCategory>, limit: usize) -> Vec<&'static Faq> {
    FAQS.iter()
        .filter(|faq| category.map_or(true, |wanted| faq.category == wanted))
        .take(limit)
        .collect()
}

pub fn is_property_type(value: &str) -> bool {
    PROPERTY_TYPES.iter().any(|choice| choice.value == value)
}

pub fn contact_subject_label(value: &str) -> Option<&'static str> {
    CONTACT_SUBJECTS
        .iter()
        .find(|choice| choice.value == value)
        .map(|choice| choice.label)
}
