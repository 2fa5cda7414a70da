mod flow;
pub use self::flow::Flow;

mod period;
pub use self::period::{Period, PeriodError, YearMonth};

mod table;
pub use self::table::RawTable;
