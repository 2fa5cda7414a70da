mod common;
pub use self::common::{
    Query, PARAM_COUNTRY, PARAM_GET, PARAM_KEY, PARAM_MONTH, PARAM_TIME, PARAM_YEAR,
};

mod trade;
pub use self::trade::TradeQuery;
