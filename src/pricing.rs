use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{find_frequency, find_pricing_option, find_service, Frequency, SizeTier};

/// Share of the single-worker price each additional worker adds.
const EXTRA_STAFF_RATE: Decimal = dec!(0.8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("no price is listed for this service and size")]
    NotFound,
    #[error("an area in square feet is required for this service")]
    AreaRequired,
    #[error("at least one staff member is required")]
    InvalidStaffCount,
    #[error("the estimate is out of range")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub base_price: Decimal,
    pub total_price: i64,
    pub discount_percent: u8,
    /// Set only when more than one worker was requested.
    pub staff_count: Option<u32>,
    pub estimated_duration: Option<&'static str>,
}

/// Estimate the price of one visit.
///
/// Per-area rates are multiplied by `area`; fixed rates ignore it. Additional
/// staff add a linear surcharge on the single-worker price, and the frequency
/// discount applies to that surcharged amount. The total is rounded to whole
/// dollars, halves away from zero.
pub fn calculate_price(
    service_id: &str,
    size: SizeTier,
    frequency: Frequency,
    area: Option<Decimal>,
    staff_count: u32,
) -> Result<PriceEstimate, PriceError> {
    let option = find_pricing_option(service_id, size).ok_or(PriceError::NotFound)?;
    let discount_percent = find_frequency(frequency)
        .ok_or(PriceError::NotFound)?
        .discount_percent;
    if staff_count == 0 {
        return Err(PriceError::InvalidStaffCount);
    }

    let mut price = if option.unit.needs_area() {
        let area = area
            .filter(|area| area.is_sign_positive() && !area.is_zero())
            .ok_or(PriceError::AreaRequired)?;
        option.price.checked_mul(area).ok_or(PriceError::OutOfRange)?
    } else {
        option.price
    };

    if staff_count > 1 {
        let surcharge = price
            .checked_mul(EXTRA_STAFF_RATE)
            .and_then(|value| value.checked_mul(Decimal::from(staff_count - 1)))
            .ok_or(PriceError::OutOfRange)?;
        price = price.checked_add(surcharge).ok_or(PriceError::OutOfRange)?;
    }

    if discount_percent > 0 {
        let keep = Decimal::ONE - Decimal::from(discount_percent) / Decimal::ONE_HUNDRED;
        price = price.checked_mul(keep).ok_or(PriceError::OutOfRange)?;
    }

    let total_price = price
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PriceError::OutOfRange)?;

    Ok(PriceEstimate {
        base_price: option.price,
        total_price,
        discount_percent,
        staff_count: (staff_count > 1).then_some(staff_count),
        estimated_duration: option.estimated_duration,
    })
}

/// Raw selections as they arrive from a form or query string.
#[derive(Debug, Clone, Default)]
pub struct PriceSelection<'a> {
    pub service: &'a str,
    pub size: &'a str,
    pub frequency: &'a str,
    pub area: Option<Decimal>,
    pub staff_count: u32,
}

/// Parse raw selections and estimate. Unrecognised ids count as not found.
///
/// The area is only forwarded for services priced by area, so a leftover
/// value from a previous selection never leaks into a fixed-price estimate.
pub fn estimate_for(selection: &PriceSelection<'_>) -> Result<PriceEstimate, PriceError> {
    let service = find_service(selection.service).ok_or(PriceError::NotFound)?;
    let size = selection
        .size
        .parse::<SizeTier>()
        .map_err(|_| PriceError::NotFound)?;
    let frequency = selection
        .frequency
        .parse::<Frequency>()
        .map_err(|_| PriceError::NotFound)?;
    let area = if service.price_unit.needs_area() {
        selection.area
    } else {
        None
    };
    calculate_price(service.id, size, frequency, area, selection.staff_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{pricing_options, services};

    #[test]
    fn every_listed_pair_has_an_estimate() {
        for option in pricing_options() {
            let area = option.unit.needs_area().then_some(dec!(1500));
            let result = calculate_price(option.service_id, option.size, Frequency::OneTime, area, 1);
            assert!(result.is_ok(), "{} / {}", option.service_id, option.size);
        }
    }

    #[test]
    fn unlisted_pairs_are_not_found() {
        for service in services() {
            for size in SizeTier::ALL {
                if find_pricing_option(service.id, size).is_some() {
                    continue;
                }
                let result = calculate_price(service.id, size, Frequency::OneTime, Some(dec!(100)), 1);
                assert_eq!(result, Err(PriceError::NotFound));
            }
        }
        assert_eq!(
            calculate_price("unknown", SizeTier::Small, Frequency::Weekly, None, 1),
            Err(PriceError::NotFound)
        );
    }

    #[test]
    fn fixed_price_one_time() {
        let estimate =
            calculate_price("residential-standard", SizeTier::Medium, Frequency::OneTime, None, 1)
                .unwrap();
        assert_eq!(estimate.base_price, dec!(160));
        assert_eq!(estimate.discount_percent, 0);
        assert_eq!(estimate.total_price, 160);
        assert_eq!(estimate.staff_count, None);
        assert_eq!(estimate.estimated_duration, Some("3-4 hours"));
    }

    #[test]
    fn weekly_discount_applies() {
        let estimate =
            calculate_price("residential-standard", SizeTier::Medium, Frequency::Weekly, None, 1)
                .unwrap();
        assert_eq!(estimate.discount_percent, 15);
        assert_eq!(estimate.total_price, 136);
    }

    #[test]
    fn per_area_rate_scales_with_area() {
        let estimate = calculate_price(
            "commercial-office",
            SizeTier::Small,
            Frequency::OneTime,
            Some(dec!(1000)),
            1,
        )
        .unwrap();
        assert_eq!(estimate.base_price, dec!(0.75));
        assert_eq!(estimate.total_price, 750);
        assert_eq!(estimate.estimated_duration, None);
    }

    #[test]
    fn per_area_without_area_is_rejected() {
        let missing =
            calculate_price("commercial-office", SizeTier::Small, Frequency::OneTime, None, 1);
        assert_eq!(missing, Err(PriceError::AreaRequired));
        let zero = calculate_price(
            "industrial-warehouse",
            SizeTier::Large,
            Frequency::OneTime,
            Some(Decimal::ZERO),
            1,
        );
        assert_eq!(zero, Err(PriceError::AreaRequired));
    }

    #[test]
    fn fixed_price_ignores_area() {
        let estimate = calculate_price(
            "residential-standard",
            SizeTier::Small,
            Frequency::OneTime,
            Some(dec!(5000)),
            1,
        )
        .unwrap();
        assert_eq!(estimate.total_price, 120);
    }

    #[test]
    fn extra_staff_surcharge_is_linear() {
        let estimate =
            calculate_price("residential-deep", SizeTier::Small, Frequency::OneTime, None, 3)
                .unwrap();
        assert_eq!(estimate.base_price, dec!(220));
        assert_eq!(estimate.total_price, 572);
        assert_eq!(estimate.staff_count, Some(3));
    }

    #[test]
    fn discount_applies_after_surcharge() {
        // 160 * 1.8 = 288, then 10% off = 259.2
        let estimate =
            calculate_price("residential-standard", SizeTier::Medium, Frequency::BiWeekly, None, 2)
                .unwrap();
        assert_eq!(estimate.total_price, 259);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 0.70 * 1250 = 875 * 0.95 = 831.25; 0.65 * 1010 = 656.5
        let monthly = calculate_price(
            "commercial-office",
            SizeTier::Medium,
            Frequency::Monthly,
            Some(dec!(1250)),
            1,
        )
        .unwrap();
        assert_eq!(monthly.total_price, 831);
        let half = calculate_price(
            "commercial-office",
            SizeTier::Large,
            Frequency::OneTime,
            Some(dec!(1010)),
            1,
        )
        .unwrap();
        assert_eq!(half.total_price, 657);
    }

    #[test]
    fn zero_staff_is_rejected() {
        let result =
            calculate_price("residential-standard", SizeTier::Small, Frequency::OneTime, None, 0);
        assert_eq!(result, Err(PriceError::InvalidStaffCount));
    }

    #[test]
    fn repeated_calls_agree() {
        let first = calculate_price(
            "industrial-warehouse",
            SizeTier::ExtraLarge,
            Frequency::Weekly,
            Some(dec!(4200)),
            2,
        );
        let second = calculate_price(
            "industrial-warehouse",
            SizeTier::ExtraLarge,
            Frequency::Weekly,
            Some(dec!(4200)),
            2,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn selection_parses_wire_ids() {
        let selection = PriceSelection {
            service: "residential-standard",
            size: "medium",
            frequency: "weekly",
            area: Some(dec!(900)),
            staff_count: 1,
        };
        assert_eq!(estimate_for(&selection).unwrap().total_price, 136);

        let unknown = PriceSelection {
            frequency: "daily",
            ..selection.clone()
        };
        assert_eq!(estimate_for(&unknown), Err(PriceError::NotFound));
    }

    #[test]
    fn selection_without_service_is_not_found() {
        let selection = PriceSelection {
            size: "medium",
            frequency: "one-time",
            staff_count: 1,
            ..Default::default()
        };
        assert_eq!(estimate_for(&selection), Err(PriceError::NotFound));
    }
}
