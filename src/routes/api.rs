//! JSON endpoints for the availability lookup, the estimator and the catalog.
//!
//! The scope is open to any origin so an external booking widget can read it.

use actix_cors::Cors;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    availability::{available_from_strings, format_time, parse_date},
    catalog::{frequencies, pricing_options, services},
    pricing::{estimate_for, PriceError},
    routes::public::SelectionQuery,
    state::AppState,
};

#[derive(Deserialize)]
struct DateQuery {
    date: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(Cors::permissive())
            .service(web::resource("/blocked-times").route(web::get().to(blocked_times)))
            .service(web::resource("/available-slots").route(web::get().to(available_slots)))
            .service(web::resource("/estimate").route(web::get().to(estimate)))
            .service(web::resource("/services").route(web::get().to(catalog))),
    );
}

/// Validated `YYYY-MM-DD` from the query, or the 400 response to send.
fn requested_date(query: &DateQuery) -> Result<String, HttpResponse> {
    let Some(raw) = query.date.as_deref().filter(|value| !value.trim().is_empty()) else {
        return Err(HttpResponse::BadRequest().json(json!({ "error": "Date is required" })));
    };
    parse_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(json!({ "error": "Date must be formatted as YYYY-MM-DD" }))
        })
}

async fn booked_times(state: &AppState, date: &str) -> Result<Vec<String>, HttpResponse> {
    let Some(store) = state.store() else {
        return Err(HttpResponse::ServiceUnavailable()
            .json(json!({ "error": "Booking storage is not configured" })));
    };
    store.query_booked_times(date).await.map_err(|err| {
        log::error!("Could not load booked times for {date}: {err}");
        HttpResponse::InternalServerError().json(json!({
            "error": "Failed to fetch blocked times",
            "details": err.to_string(),
        }))
    })
}

async fn blocked_times(state: web::Data<AppState>, query: web::Query<DateQuery>) -> HttpResponse {
    let date = match requested_date(&query) {
        Ok(date) => date,
        Err(response) => return response,
    };
    match booked_times(&state, &date).await {
        Ok(times) => HttpResponse::Ok().json(json!({ "blockedTimes": times })),
        Err(response) => response,
    }
}

async fn available_slots(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> HttpResponse {
    let date = match requested_date(&query) {
        Ok(date) => date,
        Err(response) => return response,
    };
    let booked = match booked_times(&state, &date).await {
        Ok(times) => times,
        Err(response) => return response,
    };
    let slots: Vec<String> = available_from_strings(&booked)
        .into_iter()
        .map(format_time)
        .collect();
    HttpResponse::Ok().json(json!({
        "date": date,
        "fullyBooked": slots.is_empty(),
        "slots": slots,
    }))
}

async fn estimate(query: web::Query<SelectionQuery>) -> HttpResponse {
    match estimate_for(&query.selection()) {
        Ok(estimate) => HttpResponse::Ok().json(estimate),
        Err(err @ PriceError::NotFound) => {
            HttpResponse::NotFound().json(json!({ "error": err.to_string() }))
        }
        Err(err) => HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() })),
    }
}

async fn catalog() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "services": services(),
        "pricing": pricing_options(),
        "frequencies": frequencies(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    use super::*;
    use crate::{
        db::tests::{memory_store, request},
        routes::tests::state,
    };

    #[actix_web::test]
    async fn blocked_times_lists_booked_slots() {
        let store = memory_store().await;
        store.create_booking(&request("2026-11-04", "09:00")).await.unwrap();
        store.create_booking(&request("2026-11-04", "13:00")).await.unwrap();
        store.create_booking(&request("2026-11-05", "10:00")).await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(Some(store))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/blocked-times?date=2026-11-04")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let mut times: Vec<&str> = body["blockedTimes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|time| time.as_str().unwrap())
            .collect();
        times.sort();
        assert_eq!(times, ["09:00", "13:00"]);

        let req = test::TestRequest::get()
            .uri("/api/available-slots?date=2026-11-04")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["date"], "2026-11-04");
        assert_eq!(body["slots"].as_array().unwrap().len(), 6);
        assert_eq!(body["slots"][0], "10:00");
        assert_eq!(body["fullyBooked"], false);
    }

    #[actix_web::test]
    async fn blocked_times_requires_a_valid_date() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(Some(memory_store().await))))
                .configure(configure),
        )
        .await;
        for uri in ["/api/blocked-times", "/api/blocked-times?date=04/11/2026"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn blocked_times_without_store_is_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/blocked-times?date=2026-11-04")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn estimate_reports_errors_by_status() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/estimate?service=residential-deep&size=small&frequency=one-time&staff=3")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalPrice"], 572);
        assert_eq!(body["staffCount"], 3);

        let req = test::TestRequest::get()
            .uri("/api/estimate?service=commercial-office&size=small")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let req = test::TestRequest::get()
            .uri("/api/estimate?service=residential-move&size=small")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn catalog_lists_every_service() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/services").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["services"].as_array().unwrap().len(), services().len());
        assert_eq!(body["frequencies"].as_array().unwrap().len(), 4);
    }
}
