//! Tests for spot price normalization, pivoting and the price query interface.

mod common;

use elspot_forecast::queries::prices::{parse_renewable_forecasts, parse_spot_prices};
use elspot_forecast::queries::PriceMode;
use elspot_forecast::{
    DateRange, DayFilter, ForecastError, PriceArea, PriceRecord, PriceRequest, PriceTable,
    Provider,
};
use mockito::{Matcher, Server};
use serde_json::json;

use common::{at, sdk_for, spot_body_for_day, spot_record, today, ymd};

const BOTH: [PriceArea; 2] = [PriceArea::Dk1, PriceArea::Dk2];

fn record(date: chrono::NaiveDate, hour: u32, area: PriceArea, kwh: f64) -> PriceRecord {
    let datetime = at(date, hour);
    PriceRecord {
        timestamp: datetime.and_utc().timestamp_millis(),
        datetime,
        date,
        hour,
        price_area: area,
        spot_price: kwh,
    }
}

// ---------------------------------------------------------------------------
// PriceArea
// ---------------------------------------------------------------------------

#[test]
fn price_area_parses_case_insensitively() {
    assert_eq!("dk1".parse::<PriceArea>().unwrap(), PriceArea::Dk1);
    assert_eq!(" SE3 ".parse::<PriceArea>().unwrap(), PriceArea::Se3);
    assert_eq!("System".parse::<PriceArea>().unwrap(), PriceArea::System);
}

#[test]
fn price_area_rejects_unknown_code() {
    let err = "DK9".parse::<PriceArea>().unwrap_err();
    assert!(matches!(err, ForecastError::InvalidArgument(_)));
}

#[test]
fn price_column_names() {
    assert_eq!(PriceArea::Dk1.price_column(), "dk1_spotpricedkk_kwh");
    assert_eq!(PriceArea::Dk2.price_column(), "dk2_spotpricedkk_kwh");
    assert_eq!(PriceArea::Dk1.to_string(), "DK1");
}

// ---------------------------------------------------------------------------
// parse_spot_prices
// ---------------------------------------------------------------------------

#[test]
fn spot_prices_are_converted_to_kwh() {
    let body = json!({"records": [
        spot_record("2024-03-06T13:00:00", "2024-03-06T12:00:00", "DK1", Some(832.5)),
    ]});
    let records = parse_spot_prices(&body, &[PriceArea::Dk1]).unwrap();
    assert_eq!(records.len(), 1);
    assert!((records[0].spot_price * 1000.0 - 832.5).abs() < 1e-9);
    assert_eq!(records[0].hour, 13);
    assert_eq!(records[0].date, today());
    assert_eq!(
        records[0].timestamp,
        at(today(), 12).and_utc().timestamp_millis()
    );
}

#[test]
fn spot_prices_skip_unrequested_areas_and_missing_prices() {
    let body = json!({"records": [
        spot_record("2024-03-06T13:00:00", "2024-03-06T12:00:00", "DK1", Some(100.0)),
        spot_record("2024-03-06T13:00:00", "2024-03-06T12:00:00", "SE3", Some(90.0)),
        spot_record("2024-03-06T14:00:00", "2024-03-06T13:00:00", "DK1", None),
    ]});
    let records = parse_spot_prices(&body, &[PriceArea::Dk1]).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price_area, PriceArea::Dk1);
}

#[test]
fn repeated_local_hour_keeps_distinct_keys() {
    // End of daylight saving time: 02:00 local occurs twice.
    let body = json!({"records": [
        spot_record("2024-10-27T02:00:00", "2024-10-27T00:00:00", "DK1", Some(300.0)),
        spot_record("2024-10-27T02:00:00", "2024-10-27T01:00:00", "DK1", Some(310.0)),
    ]});
    let records = parse_spot_prices(&body, &[PriceArea::Dk1]).unwrap();
    let table = PriceTable::pivot(&[PriceArea::Dk1], records).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn missing_records_array_is_malformed() {
    let err = parse_spot_prices(&json!({"total": 0}), &BOTH).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::MalformedResponse {
            provider: Provider::Prices,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// PriceTable::pivot
// ---------------------------------------------------------------------------

#[test]
fn pivot_gives_one_row_per_hour_and_column_per_area() {
    let day = ymd(2024, 3, 4);
    let records = vec![
        record(day, 1, PriceArea::Dk2, 0.25),
        record(day, 0, PriceArea::Dk1, 0.10),
        record(day, 0, PriceArea::Dk2, 0.20),
        record(day, 1, PriceArea::Dk1, 0.15),
    ];
    let table = PriceTable::pivot(&[PriceArea::Dk2, PriceArea::Dk1], records).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.column_names(),
        vec![
            "timestamp",
            "date",
            "hour",
            "dk1_spotpricedkk_kwh",
            "dk2_spotpricedkk_kwh"
        ]
    );
    assert_eq!(table.rows[0].hour, 0);
    assert_eq!(table.rows[0].price(PriceArea::Dk1), Some(0.10));
    assert_eq!(table.rows[1].price(PriceArea::Dk2), Some(0.25));

    let ts = at(day, 1).and_utc().timestamp_millis();
    assert_eq!(table.at(ts).unwrap().hour, 1);
    assert!(table.at(ts + 1).is_none());
}

#[test]
fn pivot_leaves_missing_area_empty() {
    let day = ymd(2024, 3, 4);
    let table = PriceTable::pivot(&BOTH, vec![record(day, 5, PriceArea::Dk1, 0.3)]).unwrap();
    assert_eq!(table.rows[0].price(PriceArea::Dk2), None);
}

#[test]
fn pivot_rejects_duplicate_key() {
    let day = ymd(2024, 3, 4);
    let records = vec![
        record(day, 0, PriceArea::Dk1, 0.10),
        record(day, 0, PriceArea::Dk1, 0.11),
    ];
    let err = PriceTable::pivot(&BOTH, records).unwrap_err();
    assert!(err.to_string().contains("DK1"));
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

#[test]
fn current_prices_send_filter_sort_and_day_window() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/dataset/Elspotprices")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("start".into(), "2024-03-06T00:00".into()),
            Matcher::UrlEncoded("end".into(), "2024-03-06T23:59".into()),
            Matcher::UrlEncoded("filter".into(), r#"{"PriceArea":["DK1","DK2"]}"#.into()),
            Matcher::UrlEncoded("sort".into(), "HourUTC DESC".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(spot_body_for_day(today()).to_string())
        .create();

    let sdk = sdk_for(&server.url());
    let table = sdk.prices().current(&BOTH).unwrap();

    assert_eq!(table.len(), 24);
    assert_eq!(table.areas, BOTH.to_vec());
    // Ascending by time even though the provider answers newest first.
    assert_eq!(table.rows[0].hour, 0);
    assert_eq!(table.rows[23].hour, 23);
    let noon = &table.rows[12];
    assert!((noon.price(PriceArea::Dk1).unwrap() - 1.2).abs() < 1e-9);
    assert!((noon.price(PriceArea::Dk2).unwrap() - 1.25).abs() < 1e-9);
    mock.assert();
}

#[test]
fn current_prices_drop_other_days() {
    let mut body = spot_body_for_day(today());
    body["records"]
        .as_array_mut()
        .unwrap()
        .push(spot_record("2024-03-05T23:00:00", "2024-03-05T22:00:00", "DK1", Some(1.0)));

    let mut server = Server::new();
    server
        .mock("GET", "/dataset/Elspotprices")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let sdk = sdk_for(&server.url());
    let table = sdk.prices().current(&BOTH).unwrap();
    assert_eq!(table.len(), 24);
    assert!(table.rows.iter().all(|r| r.date == today()));
}

#[test]
fn historical_prices_can_exclude_a_day() {
    let mut body = spot_body_for_day(ymd(2024, 3, 5));
    let today_body = spot_body_for_day(today());
    body["records"]
        .as_array_mut()
        .unwrap()
        .extend(today_body["records"].as_array().unwrap().iter().cloned());

    let mut server = Server::new();
    server
        .mock("GET", "/dataset/Elspotprices")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let sdk = sdk_for(&server.url());
    let range = DateRange::new(ymd(2024, 3, 5), today()).unwrap();

    let all = sdk.prices().historical(&BOTH, range).unwrap();
    assert_eq!(all.len(), 48);

    let request = PriceRequest::historical(&BOTH, range).with_day_filter(DayFilter::ExcludeDay(today()));
    let past = sdk.prices().fetch(&request).unwrap();
    assert_eq!(past.len(), 24);
    assert!(past.rows.iter().all(|r| r.date == ymd(2024, 3, 5)));
}

#[test]
fn request_mode_picks_default_filter() {
    let range = DateRange::new(ymd(2024, 3, 5), today()).unwrap();
    let historical = PriceRequest::historical(&BOTH, range);
    assert_eq!(historical.effective_filter(), DayFilter::All);

    let current = PriceRequest::current(&BOTH, today());
    assert_eq!(current.mode, PriceMode::Current);
    assert_eq!(current.effective_filter(), DayFilter::OnlyDay(today()));

    let overridden = current.with_day_filter(DayFilter::All);
    assert_eq!(overridden.effective_filter(), DayFilter::All);
}

#[test]
fn current_mode_over_wider_range_keeps_first_day() {
    let mut body = spot_body_for_day(ymd(2024, 3, 5));
    let today_body = spot_body_for_day(today());
    body["records"]
        .as_array_mut()
        .unwrap()
        .extend(today_body["records"].as_array().unwrap().iter().cloned());

    let mut server = Server::new();
    server
        .mock("GET", "/dataset/Elspotprices")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let sdk = sdk_for(&server.url());
    let request = PriceRequest {
        mode: PriceMode::Current,
        areas: BOTH.to_vec(),
        range: DateRange::new(ymd(2024, 3, 5), today()).unwrap(),
        day_filter: None,
    };
    let table = sdk.prices().fetch(&request).unwrap();
    assert_eq!(table.len(), 24);
    assert!(table.rows.iter().all(|r| r.date == ymd(2024, 3, 5)));
}

#[test]
fn empty_area_list_is_rejected() {
    let sdk = sdk_for("http://127.0.0.1:9");
    let err = sdk.prices().current(&[]).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidArgument(_)));
}

#[test]
fn price_server_error_names_prices_provider() {
    let mut server = Server::new();
    server
        .mock("GET", "/dataset/Elspotprices")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let sdk = sdk_for(&server.url());
    let err = sdk.prices().current(&BOTH).unwrap_err();
    assert_eq!(err.provider(), Some(Provider::Prices));
}

// ---------------------------------------------------------------------------
// Renewable forecasts
// ---------------------------------------------------------------------------

fn renewable_body() -> serde_json::Value {
    json!({"records": [
        {
            "HourUTC": "2024-03-06T11:00:00",
            "HourDK": "2024-03-06T12:00:00",
            "PriceArea": "DK2",
            "ForecastType": "Solar",
            "ForecastDayAhead": 310.5,
            "ForecastIntraday": null,
            "ForecastCurrent": "298.25"
        },
        {
            "HourUTC": "2024-03-06T10:00:00",
            "HourDK": "2024-03-06T11:00:00",
            "PriceArea": "DK1",
            "ForecastType": "Offshore Wind",
            "ForecastDayAhead": 1200.0,
            "ForecastIntraday": 1180.0,
            "ForecastCurrent": 1175.0
        },
        {
            "HourUTC": "2024-03-06T10:00:00",
            "HourDK": "2024-03-06T11:00:00",
            "PriceArea": "SE4",
            "ForecastType": "Solar",
            "ForecastDayAhead": 50.0,
            "ForecastIntraday": 50.0,
            "ForecastCurrent": 50.0
        }
    ]})
}

#[test]
fn renewable_records_keep_optional_values() {
    let records = parse_renewable_forecasts(&renewable_body(), &BOTH).unwrap();
    assert_eq!(records.len(), 2);
    let solar = &records[0];
    assert_eq!(solar.forecast_type, "Solar");
    assert_eq!(solar.forecast_day_ahead, Some(310.5));
    assert_eq!(solar.forecast_intraday, None);
    assert_eq!(solar.forecast_current, Some(298.25));
}

#[test]
fn renewable_query_filters_areas_and_sorts_by_time() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/dataset/Forecasts_Hour")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "2024-03-06T00:00".into()),
            Matcher::UrlEncoded("end".into(), "2024-03-06T23:59".into()),
        ]))
        .with_status(200)
        .with_body(renewable_body().to_string())
        .create();

    let sdk = sdk_for(&server.url());
    let request = PriceRequest::current(&BOTH, today());
    let records = sdk.prices().renewable_forecast(&request).unwrap();

    let areas: Vec<PriceArea> = records.iter().map(|r| r.price_area).collect();
    assert_eq!(areas, vec![PriceArea::Dk1, PriceArea::Dk2]);
    assert!(records[0].timestamp < records[1].timestamp);
    mock.assert();
}
