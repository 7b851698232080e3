use actix_web::{http::header, web, HttpResponse, Result};
use askama::Template;
use chrono::DateTime;
use serde::Deserialize;

use crate::{
    availability::parse_date,
    catalog::{find_frequency, find_service, Frequency, SizeTier},
    db::{BookingStore, StoreError},
    models::{BookingRecord, BookingStatus},
    state::AppState,
    templates::render,
};

#[derive(Clone, Debug)]
struct FilterTab {
    value: &'static str,
    label: &'static str,
    count: usize,
    selected: bool,
}

#[derive(Clone, Debug)]
struct ActionView {
    status: &'static str,
    label: &'static str,
}

#[derive(Clone, Debug)]
struct BookingView {
    id: String,
    status: &'static str,
    status_label: &'static str,
    service: String,
    property: String,
    frequency: String,
    date: String,
    time: String,
    staff_count: u32,
    price: String,
    name: String,
    email: String,
    phone: String,
    address: String,
    notes: String,
    has_notes: bool,
    created_at: String,
    closed: bool,
    actions: Vec<ActionView>,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    business: String,
    tabs: Vec<FilterTab>,
    bookings: Vec<BookingView>,
    empty_message: String,
}

#[derive(Deserialize)]
struct BookingFilter {
    status: Option<String>,
}

#[derive(Deserialize)]
struct StatusForm {
    status: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("").route(web::get().to(list_bookings)))
            .service(web::resource("/").route(web::get().to(list_bookings)))
            .service(
                web::resource("/bookings/{id}/status").route(web::post().to(update_status)),
            ),
    );
}

fn store_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().body("Booking storage is not configured.")
}

async fn list_bookings(
    state: web::Data<AppState>,
    query: web::Query<BookingFilter>,
) -> Result<HttpResponse> {
    let Some(store) = state.store() else {
        return Ok(store_unavailable());
    };

    let filter = query
        .status
        .as_deref()
        .filter(|value| !value.trim().is_empty() && value.trim() != "all")
        .map(str::parse::<BookingStatus>)
        .transpose()
        .map_err(actix_web::error::ErrorBadRequest)?;

    let bookings = store
        .list_bookings(filter)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
    let tabs = filter_tabs(store, filter).await?;

    let empty_message = match filter {
        Some(status) => format!("No {} bookings.", status.as_str()),
        None => "No bookings yet.".to_string(),
    };

    Ok(render(AdminTemplate {
        business: state.business_name.clone(),
        tabs,
        bookings: bookings.into_iter().map(to_view).collect(),
        empty_message,
    }))
}

async fn filter_tabs(
    store: &BookingStore,
    filter: Option<BookingStatus>,
) -> Result<Vec<FilterTab>> {
    let counts = store
        .status_counts()
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let mut tabs = vec![FilterTab {
        value: "all",
        label: "All",
        count: counts.iter().map(|(_, count)| count).sum(),
        selected: filter.is_none(),
    }];
    tabs.extend(counts.into_iter().map(|(status, count)| FilterTab {
        value: status.as_str(),
        label: status.label(),
        count,
        selected: filter == Some(status),
    }));
    Ok(tabs)
}

async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<StatusForm>,
) -> HttpResponse {
    let Some(store) = state.store() else {
        return store_unavailable();
    };
    let booking_id = path.into_inner();
    let Ok(next) = form.status.parse::<BookingStatus>() else {
        return HttpResponse::BadRequest().body(format!("Unknown status \"{}\".", form.status));
    };

    match store.update_booking_status(&booking_id, next).await {
        Ok(previous) => {
            log::info!("Booking {booking_id} moved from {previous} to {next}.");
            HttpResponse::SeeOther()
                .append_header((header::LOCATION, "/admin"))
                .finish()
        }
        Err(StoreError::NotFound) => HttpResponse::NotFound().body("Booking not found."),
        Err(err @ (StoreError::InvalidTransition { .. } | StoreError::Conflict)) => {
            log::warn!("Status change for booking {booking_id} refused: {err}");
            HttpResponse::Conflict().body(capitalize(&err.to_string()))
        }
        Err(err) => {
            log::error!("Status change for booking {booking_id} failed: {err}");
            HttpResponse::InternalServerError().body("Could not update the booking.")
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn to_view(record: BookingRecord) -> BookingView {
    let request = record.request;
    let service = find_service(&request.service_id)
        .map(|service| service.name.to_string())
        .unwrap_or(request.service_id);
    let size = request
        .size
        .parse::<SizeTier>()
        .map(|size| size.label().to_string())
        .unwrap_or(request.size);
    let frequency = request
        .frequency
        .parse::<Frequency>()
        .ok()
        .and_then(find_frequency)
        .map(|option| option.label.to_string())
        .unwrap_or(request.frequency);
    let date = parse_date(&request.date)
        .map(|date| date.format("%a, %b %-d, %Y").to_string())
        .unwrap_or(request.date);
    let created_at = DateTime::parse_from_rfc3339(&record.created_at)
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or(record.created_at);
    let notes = request.special_instructions.unwrap_or_default();
    let contact = request.contact;

    BookingView {
        id: record.id,
        status: record.status.as_str(),
        status_label: record.status.label(),
        service,
        property: match request.area {
            Some(area) => format!("{} ({size}, {area} sq ft)", request.property_type),
            None => format!("{} ({size})", request.property_type),
        },
        frequency,
        date,
        time: request.time,
        staff_count: request.staff_count,
        price: request
            .estimated_price
            .map(|price| format!("${price}"))
            .unwrap_or_else(|| "Quote".to_string()),
        name: contact.name,
        email: contact.email,
        phone: contact.phone,
        address: format!("{}, {} {}", contact.address, contact.city, contact.postal_code),
        has_notes: !notes.trim().is_empty(),
        notes,
        created_at,
        closed: record.status.is_terminal(),
        actions: record
            .status
            .allowed_transitions()
            .iter()
            .filter_map(|status| {
                Some(ActionView {
                    status: status.as_str(),
                    label: status.action_label()?,
                })
            })
            .collect(),
    }
}
