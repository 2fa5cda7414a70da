use ustrade_api::types::{Flow, Period, YearMonth};
use ustrade_api::{Query, TradeQuery};
use url::Url;

fn base_url() -> Url {
    Url::parse("https://example.com").unwrap()
}

fn ym(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

#[test]
fn exports_single_month() {
    let query = TradeQuery::exports()
        .with_country("2010")
        .with_commodity("27")
        .with_month(ym("2010-01"));
    let params = query.params();
    assert_eq!(values(&params, "CTY_CODE"), vec!["2010"]);
    assert_eq!(values(&params, "E_COMMODITY"), vec!["27"]);
    assert_eq!(values(&params, "YEAR"), vec!["2010"]);
    assert_eq!(values(&params, "MONTH"), vec!["01"]);
    assert!(values(&params, "time").is_empty());
    assert!(values(&params, "I_COMMODITY").is_empty());
}

#[test]
fn exports_field_list() {
    let params = TradeQuery::exports().params();
    assert_eq!(
        values(&params, "get"),
        vec!["CTY_CODE,CTY_NAME,E_COMMODITY,E_COMMODITY_SDESC,ALL_VAL_MO"]
    );
}

#[test]
fn imports_field_list_has_both_values() {
    let params = TradeQuery::imports().params();
    assert_eq!(
        values(&params, "get"),
        vec!["CTY_CODE,CTY_NAME,I_COMMODITY,I_COMMODITY_SDESC,GEN_VAL_MO,CON_VAL_MO"]
    );
}

#[test]
fn imports_range_uses_time() {
    let url = TradeQuery::imports()
        .with_countries(&["2010".to_string(), "1220".to_string()])
        .with_commodities(&["08".to_string(), "09".to_string()])
        .with_period(Period::parse_range("2013-01", "2014-01").unwrap())
        .add_to_url(&base_url());
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(values(&pairs, "time"), vec!["from 2013-01 to 2014-01"]);
    assert_eq!(values(&pairs, "CTY_CODE").len(), 2);
    assert_eq!(values(&pairs, "I_COMMODITY"), vec!["08", "09"]);
    assert!(values(&pairs, "YEAR").is_empty());
    assert!(values(&pairs, "MONTH").is_empty());
}

#[test]
fn month_is_zero_padded() {
    let params = TradeQuery::new(Flow::Imports)
        .with_month(YearMonth::new(2018, 3).unwrap())
        .params();
    assert_eq!(values(&params, "MONTH"), vec!["03"]);
}

#[test]
fn countries_keep_insertion_order() {
    let params = TradeQuery::exports()
        .with_country("5700")
        .with_country("1220")
        .with_country("2010")
        .params();
    assert_eq!(values(&params, "CTY_CODE"), vec!["5700", "1220", "2010"]);
}
