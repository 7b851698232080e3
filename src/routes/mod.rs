pub mod admin;
pub mod api;
pub mod public;

use actix_web::{http::StatusCode, web, HttpResponse};
use askama::Template;

use crate::{
    catalog::{category_groups, frequencies, Service, SizeTier, STAFF_CHOICES},
    state::AppState,
    templates::render_with_status,
};

/// One `<option>` of a select.
#[derive(Clone, Debug)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    fn new(value: impl Into<String>, label: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        let selected = value == current;
        Self {
            value,
            label: label.into(),
            selected,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OptionGroup {
    pub label: String,
    pub options: Vec<OptionView>,
}

#[derive(Clone, Debug)]
pub struct FrequencyView {
    pub value: String,
    pub label: String,
    pub discount: u8,
    pub selected: bool,
}

#[derive(Clone, Debug)]
pub struct ServiceCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_label: String,
    pub eco: bool,
    pub popular: bool,
}

impl From<&Service> for ServiceCard {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.to_string(),
            name: service.name.to_string(),
            description: service.description.to_string(),
            category: service.category.label().to_string(),
            price_label: format!("${}{}", service.base_price, service.price_unit.suffix()),
            eco: service.eco,
            popular: service.popular,
        }
    }
}

pub fn service_groups(current: &str) -> Vec<OptionGroup> {
    category_groups()
        .into_iter()
        .map(|group| OptionGroup {
            label: group.category.label().to_string(),
            options: group
                .services
                .into_iter()
                .map(|service| OptionView::new(service.id, service.name, current))
                .collect(),
        })
        .collect()
}

pub fn size_options(current: &str) -> Vec<OptionView> {
    let current = current.parse::<SizeTier>().map(|size| size.as_str()).unwrap_or(current);
    SizeTier::ALL
        .into_iter()
        .map(|size| OptionView::new(size.as_str(), size.label(), current))
        .collect()
}

pub fn frequency_options(current: &str) -> Vec<FrequencyView> {
    frequencies()
        .iter()
        .map(|option| FrequencyView {
            value: option.id.as_str().to_string(),
            label: option.label.to_string(),
            discount: option.discount_percent,
            selected: option.id.as_str() == current,
        })
        .collect()
}

pub fn staff_options(current: u32) -> Vec<OptionView> {
    STAFF_CHOICES
        .iter()
        .map(|(count, label)| OptionView {
            value: count.to_string(),
            label: label.to_string(),
            selected: *count == current,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    business: String,
}

pub async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    render_with_status(
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            business: state.business_name.clone(),
        },
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{test as actix_test, web, App};

    use super::*;
    use crate::{config::RelayConfig, db::BookingStore, relay::RelayClient};

    pub(crate) fn state(store: Option<BookingStore>) -> AppState {
        AppState {
            store,
            relay: RelayClient::new(RelayConfig {
                access_key: String::new(),
                endpoint: "http://127.0.0.1:9/submit".to_string(),
                recipient: None,
            })
            .unwrap(),
            business_name: "Ottawa Pristine Cleaning".to_string(),
        }
    }

    #[actix_web::test]
    async fn unknown_path_renders_not_found() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .default_service(web::to(not_found)),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/nowhere").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn size_options_mark_alias_as_selected() {
        let options = size_options("extra-large");
        assert!(options.iter().any(|option| option.value == "xlarge" && option.selected));
    }

    #[test]
    fn service_groups_cover_every_category() {
        let groups = service_groups("commercial-office");
        assert_eq!(groups.len(), 4);
        let selected: Vec<_> = groups
            .iter()
            .flat_map(|group| group.options.iter())
            .filter(|option| option.selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Office Cleaning");
    }
}
