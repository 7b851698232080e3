use actix_web::{http::StatusCode, web, HttpResponse};
use askama::Template;
use chrono::{Days, Local, Months, NaiveDate};
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
    availability::{available_from_strings, format_time, parse_date, DAILY_SLOTS},
    catalog::{
        category_groups, faqs_for, find_service, popular_services, Faq, FaqCategory,
        ServiceCategory, CONTACT_SUBJECTS, PROPERTY_TYPES,
    },
    db::StoreError,
    draft::{BookingDraft, ContactDraft, FieldErrors},
    pricing::{estimate_for, PriceError, PriceEstimate, PriceSelection},
    relay::{booking_payload, contact_payload, RelayError},
    routes::{
        frequency_options, service_groups, size_options, staff_options, FrequencyView,
        OptionGroup, OptionView, ServiceCard,
    },
    state::AppState,
    templates::{render, render_with_status},
};

const BOOKING_UNAVAILABLE: &str =
    "Online booking is temporarily unavailable. Please call us to book your cleaning.";
const BOOKING_FAILED: &str = "We could not complete your booking. Please try again.";
const SLOT_TAKEN: &str = "That time has just been booked. Please pick another time.";
const CONTACT_UNAVAILABLE: &str =
    "Our contact form is temporarily unavailable. Please call or email us directly.";
const CONTACT_FAILED: &str = "Your message could not be sent. Please try again.";

#[derive(Clone, Debug)]
struct EstimateView {
    total: i64,
    base_label: String,
    discount: u8,
    staff: Option<u32>,
    duration: Option<String>,
}

impl EstimateView {
    fn new(estimate: &PriceEstimate, service_id: &str) -> Self {
        let suffix = find_service(service_id)
            .map(|service| service.price_unit.suffix())
            .unwrap_or_default();
        Self {
            total: estimate.total_price,
            base_label: format!("${}{}", estimate.base_price, suffix),
            discount: estimate.discount_percent,
            staff: estimate.staff_count,
            duration: estimate.estimated_duration.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug)]
struct ServiceGroupView {
    label: String,
    slug: String,
    services: Vec<ServiceCard>,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    business: String,
    popular: Vec<ServiceCard>,
    frequencies: Vec<FrequencyView>,
    faqs: Vec<&'static Faq>,
}

#[derive(Template)]
#[template(path = "services.html")]
struct ServicesTemplate {
    business: String,
    filters: Vec<OptionView>,
    groups: Vec<ServiceGroupView>,
}

#[derive(Template)]
#[template(path = "pricing.html")]
struct PricingTemplate {
    business: String,
    services: Vec<OptionGroup>,
    sizes: Vec<OptionView>,
    frequencies: Vec<FrequencyView>,
    staff: Vec<OptionView>,
    area: String,
    needs_area: bool,
    estimate: Option<EstimateView>,
    notice: Option<String>,
    booking_link: String,
    faqs: Vec<&'static Faq>,
}

#[derive(Template)]
#[template(path = "booking.html")]
struct BookingTemplate {
    business: String,
    form: BookingDraft,
    errors: Vec<String>,
    field_errors: FieldErrors,
    form_error: Option<String>,
    services: Vec<OptionGroup>,
    property_types: Vec<OptionView>,
    sizes: Vec<OptionView>,
    frequencies: Vec<FrequencyView>,
    staff: Vec<OptionView>,
    times: Vec<OptionView>,
    fully_booked: bool,
    availability_note: Option<String>,
    needs_area: bool,
    estimate: Option<EstimateView>,
    booking_enabled: bool,
    min_date: String,
    max_date: String,
    faqs: Vec<&'static Faq>,
}

#[derive(Template)]
#[template(path = "booking_success.html")]
struct BookingSuccessTemplate {
    business: String,
    booking_id: String,
    service_name: String,
    date: String,
    time: String,
    total: Option<i64>,
}

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactTemplate {
    business: String,
    form: ContactDraft,
    field_errors: FieldErrors,
    form_error: Option<String>,
    subjects: Vec<OptionView>,
    sent: bool,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    business: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CategoryQuery {
    category: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct SelectionQuery {
    pub service: String,
    pub size: String,
    pub frequency: String,
    pub staff: String,
    pub area: String,
    pub date: String,
}

impl SelectionQuery {
    pub(crate) fn selection(&self) -> PriceSelection<'_> {
        PriceSelection {
            service: self.service.trim(),
            size: non_empty_or(&self.size, "medium"),
            frequency: non_empty_or(&self.frequency, "one-time"),
            area: self.area.trim().parse().ok(),
            staff_count: self.staff.trim().parse().unwrap_or(1),
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/services").route(web::get().to(services)))
        .service(web::resource("/pricing").route(web::get().to(pricing)))
        .service(
            web::resource("/booking")
                .route(web::get().to(show_booking))
                .route(web::post().to(submit_booking)),
        )
        .service(
            web::resource("/contact")
                .route(web::get().to(show_contact))
                .route(web::post().to(submit_contact)),
        )
        .service(web::resource("/about").route(web::get().to(about)))
        .service(web::resource("/health").route(web::get().to(health)));
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn home(state: web::Data<AppState>) -> HttpResponse {
    render(HomeTemplate {
        business: state.business_name.clone(),
        popular: popular_services().into_iter().map(ServiceCard::from).collect(),
        frequencies: frequency_options(""),
        faqs: faqs_for(Some(FaqCategory::General), 4),
    })
}

async fn services(state: web::Data<AppState>, query: web::Query<CategoryQuery>) -> HttpResponse {
    let wanted = query.category.parse::<ServiceCategory>().ok();
    let current = wanted.map(|category| category.as_str()).unwrap_or("all");

    let mut filters = vec![OptionView {
        value: "all".to_string(),
        label: "All Services".to_string(),
        selected: wanted.is_none(),
    }];
    filters.extend(ServiceCategory::ALL.into_iter().map(|category| OptionView {
        value: category.as_str().to_string(),
        label: category.label().to_string(),
        selected: category.as_str() == current,
    }));

    let groups = category_groups()
        .into_iter()
        .filter(|group| wanted.map_or(true, |category| group.category == category))
        .map(|group| ServiceGroupView {
            label: group.category.label().to_string(),
            slug: group.category.as_str().to_string(),
            services: group.services.into_iter().map(ServiceCard::from).collect(),
        })
        .collect();

    render(ServicesTemplate {
        business: state.business_name.clone(),
        filters,
        groups,
    })
}

async fn pricing(state: web::Data<AppState>, query: web::Query<SelectionQuery>) -> HttpResponse {
    let selection = query.selection();
    let needs_area =
        find_service(selection.service).is_some_and(|service| service.price_unit.needs_area());

    let (estimate, notice) = match estimate_for(&selection) {
        Ok(estimate) => (Some(EstimateView::new(&estimate, selection.service)), None),
        Err(PriceError::NotFound) if selection.service.is_empty() => (None, None),
        Err(PriceError::NotFound) => (
            None,
            Some("This service is priced on a custom quote. Contact us for details.".to_string()),
        ),
        Err(PriceError::AreaRequired) => (
            None,
            Some("Enter the area in square feet to see an estimate.".to_string()),
        ),
        Err(err) => (None, Some(err.to_string())),
    };

    render(PricingTemplate {
        business: state.business_name.clone(),
        services: service_groups(selection.service),
        sizes: size_options(selection.size),
        frequencies: frequency_options(selection.frequency),
        staff: staff_options(selection.staff_count),
        area: query.area.trim().to_string(),
        needs_area,
        estimate,
        notice,
        booking_link: booking_link(&selection, needs_area),
        faqs: faqs_for(Some(FaqCategory::Pricing), 3),
    })
}

/// Booking form URL carrying the estimator's selections.
fn booking_link(selection: &PriceSelection<'_>, needs_area: bool) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("service", selection.service)
        .append_pair("size", selection.size)
        .append_pair("frequency", selection.frequency)
        .append_pair("staff", &selection.staff_count.to_string());
    if let Some(area) = selection.area.filter(|_| needs_area) {
        query.append_pair("area", &area.to_string());
    }
    format!("/booking?{}", query.finish())
}

async fn show_booking(
    state: web::Data<AppState>,
    query: web::Query<SelectionQuery>,
) -> HttpResponse {
    let query = query.into_inner();
    let mut draft = BookingDraft::new(today());
    if find_service(query.service.trim()).is_some() {
        draft.service = query.service.trim().to_string();
    }
    if !query.size.trim().is_empty() {
        draft.property_size = query.size.trim().to_string();
    }
    if !query.frequency.trim().is_empty() {
        draft.frequency = query.frequency.trim().to_string();
    }
    if !query.staff.trim().is_empty() {
        draft.staff_count = query.staff.trim().to_string();
    }
    if !query.area.trim().is_empty() {
        draft.area = query.area.trim().to_string();
    }
    if parse_date(&query.date).is_some() {
        draft.date = query.date.trim().to_string();
    }

    booking_page(&state, draft, FieldErrors::default(), None, StatusCode::OK).await
}

async fn submit_booking(
    state: web::Data<AppState>,
    form: web::Form<BookingDraft>,
) -> HttpResponse {
    let draft = form.into_inner();

    let request = match draft.validate(today()) {
        Ok(request) => request,
        Err(errors) => return booking_page(&state, draft, errors, None, StatusCode::OK).await,
    };

    let Some(store) = state.store() else {
        return form_failure(&state, draft, BOOKING_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)
            .await;
    };

    match store.is_slot_taken(&request.date, &request.time).await {
        Ok(false) => {}
        Ok(true) => return slot_taken(&state, draft).await,
        Err(err) => {
            log::error!("Availability check failed: {err}");
            return form_failure(&state, draft, BOOKING_FAILED, StatusCode::INTERNAL_SERVER_ERROR)
                .await;
        }
    }

    let booking_id = match store.create_booking(&request).await {
        Ok(id) => id,
        Err(StoreError::SlotTaken) => return slot_taken(&state, draft).await,
        Err(err) => {
            log::error!("Booking insert failed: {err}");
            return form_failure(&state, draft, BOOKING_FAILED, StatusCode::INTERNAL_SERVER_ERROR)
                .await;
        }
    };

    log::info!(
        "Booking {booking_id} created for {} at {}.",
        request.date,
        request.time
    );

    // Only stored bookings are relayed.
    let relayed = state
        .relay
        .submit(booking_payload(&state.business_name, &request))
        .await;
    log_relay_outcome("booking", relayed);

    let service_name = find_service(&request.service_id)
        .map(|service| service.name.to_string())
        .unwrap_or_else(|| request.service_id.clone());
    let date = parse_date(&request.date)
        .map(|date| date.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| request.date.clone());

    render(BookingSuccessTemplate {
        business: state.business_name.clone(),
        booking_id,
        service_name,
        date,
        time: request.time,
        total: request.estimated_price,
    })
}

/// Re-renders the filled form with a message above it.
async fn form_failure(
    state: &AppState,
    draft: BookingDraft,
    message: &str,
    status: StatusCode,
) -> HttpResponse {
    let message = Some(message.to_string());
    booking_page(state, draft, FieldErrors::default(), message, status).await
}

async fn slot_taken(state: &AppState, draft: BookingDraft) -> HttpResponse {
    let mut errors = FieldErrors::default();
    errors.add("time", SLOT_TAKEN);
    booking_page(state, draft, errors, None, StatusCode::CONFLICT).await
}

fn log_relay_outcome(kind: &str, outcome: Result<(), RelayError>) {
    match outcome {
        Ok(()) => log::info!("Relayed {kind} notification."),
        Err(RelayError::Disabled) => log::debug!("Email relay disabled; {kind} not relayed."),
        Err(err) => log::warn!("Relay of {kind} failed: {err}"),
    }
}

struct Availability {
    times: Vec<OptionView>,
    fully_booked: bool,
    note: Option<String>,
}

/// Slots still open on the draft's date. Without a store or a valid date
/// every daily slot is offered.
async fn availability_for(state: &AppState, draft: &BookingDraft) -> Availability {
    let all = || {
        DAILY_SLOTS
            .iter()
            .map(|time| format_time(*time))
            .collect::<Vec<_>>()
    };

    let (slots, note) = match (state.store(), parse_date(&draft.date)) {
        (Some(store), Some(date)) => {
            match store
                .query_booked_times(&date.format("%Y-%m-%d").to_string())
                .await
            {
                Ok(booked) => (
                    available_from_strings(&booked)
                        .into_iter()
                        .map(format_time)
                        .collect(),
                    None,
                ),
                Err(err) => {
                    log::error!("Could not load booked times: {err}");
                    (
                        all(),
                        Some("Availability could not be checked. We will confirm your time.".to_string()),
                    )
                }
            }
        }
        _ => (all(), None),
    };

    let fully_booked = slots.is_empty();
    let current = draft.time.trim();
    Availability {
        times: slots
            .into_iter()
            .map(|time| OptionView {
                selected: time == current,
                label: time.clone(),
                value: time,
            })
            .collect(),
        fully_booked,
        note: if fully_booked {
            Some("All times are booked on this date. Please choose a different date.".to_string())
        } else {
            note
        },
    }
}

async fn booking_page(
    state: &AppState,
    form: BookingDraft,
    field_errors: FieldErrors,
    form_error: Option<String>,
    status: StatusCode,
) -> HttpResponse {
    let availability = availability_for(state, &form).await;
    let today = today();
    let min_date = today.checked_add_days(Days::new(1)).unwrap_or(today);
    let max_date = today.checked_add_months(Months::new(3)).unwrap_or(today);

    let estimate = form
        .estimate()
        .ok()
        .map(|estimate| EstimateView::new(&estimate, &form.service));

    render_with_status(
        status,
        BookingTemplate {
            business: state.business_name.clone(),
            errors: field_errors.messages(),
            field_errors,
            form_error,
            services: service_groups(&form.service),
            property_types: PROPERTY_TYPES
                .iter()
                .map(|choice| OptionView {
                    value: choice.value.to_string(),
                    label: choice.label.to_string(),
                    selected: choice.value == form.property_type,
                })
                .collect(),
            sizes: size_options(&form.property_size),
            frequencies: frequency_options(&form.frequency),
            staff: staff_options(form.staff()),
            times: availability.times,
            fully_booked: availability.fully_booked,
            availability_note: availability.note,
            needs_area: form.needs_area(),
            estimate,
            booking_enabled: state.store().is_some(),
            min_date: min_date.format("%Y-%m-%d").to_string(),
            max_date: max_date.format("%Y-%m-%d").to_string(),
            faqs: faqs_for(Some(FaqCategory::Booking), 3),
            form,
        },
    )
}

async fn show_contact(state: web::Data<AppState>) -> HttpResponse {
    contact_page(&state, ContactDraft::default(), FieldErrors::default(), None, StatusCode::OK)
}

async fn submit_contact(
    state: web::Data<AppState>,
    form: web::Form<ContactDraft>,
) -> HttpResponse {
    let draft = form.into_inner();
    let message = match draft.validate() {
        Ok(message) => message,
        Err(errors) => return contact_page(&state, draft, errors, None, StatusCode::OK),
    };

    if !state.relay.enabled() {
        log::warn!("Contact message from {} dropped: relay disabled.", message.email);
        return contact_page(
            &state,
            draft,
            FieldErrors::default(),
            Some(CONTACT_UNAVAILABLE),
            StatusCode::SERVICE_UNAVAILABLE,
        );
    }

    let outcome = state
        .relay
        .submit(contact_payload(&state.business_name, &message))
        .await;
    if let Err(err) = outcome {
        log::error!("Contact relay failed: {err}");
        return contact_page(
            &state,
            draft,
            FieldErrors::default(),
            Some(CONTACT_FAILED),
            StatusCode::BAD_GATEWAY,
        );
    }

    log::info!("Contact message relayed for {}.", message.email);
    render(ContactTemplate {
        business: state.business_name.clone(),
        form: ContactDraft::default(),
        field_errors: FieldErrors::default(),
        form_error: None,
        subjects: subject_options(""),
        sent: true,
    })
}

fn subject_options(current: &str) -> Vec<OptionView> {
    CONTACT_SUBJECTS
        .iter()
        .map(|choice| OptionView {
            value: choice.value.to_string(),
            label: choice.label.to_string(),
            selected: choice.value == current,
        })
        .collect()
}

fn contact_page(
    state: &AppState,
    form: ContactDraft,
    field_errors: FieldErrors,
    form_error: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    render_with_status(
        status,
        ContactTemplate {
            business: state.business_name.clone(),
            subjects: subject_options(&form.subject),
            form,
            field_errors,
            form_error: form_error.map(str::to_string),
            sent: false,
        },
    )
}

async fn about(state: web::Data<AppState>) -> HttpResponse {
    render(AboutTemplate {
        business: state.business_name.clone(),
    })
}
