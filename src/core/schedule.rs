use chrono::{Days, NaiveDate};

use crate::core::calculator::format_date;
use crate::domain::model::{DateFormat, PrintingSchedule};
use crate::utils::error::{LabelError, Result};

const PRINTING_LEAD_DAYS: u64 = 1;
const PACKING_LEAD_DAYS: u64 = 2;
const BAG_MAKING_LEAD_DAYS: u64 = 3;

/// Work backwards from the selected date to the printing, packing and
/// bag-making days. The printing image is filed under the printing date.
pub fn printing_schedule(selected_date: NaiveDate) -> Result<PrintingSchedule> {
    let days_before = |lead: u64| {
        selected_date
            .checked_sub_days(Days::new(lead))
            .ok_or_else(|| LabelError::InvalidInput {
                input: selected_date.to_string(),
                reason: "date is too early to schedule".to_string(),
            })
    };

    let printing_date = days_before(PRINTING_LEAD_DAYS)?;
    Ok(PrintingSchedule {
        selected_date,
        printing_date,
        packing_date: days_before(PACKING_LEAD_DAYS)?,
        bag_making_date: days_before(BAG_MAKING_LEAD_DAYS)?,
        printing_filename: format_date(printing_date, DateFormat::DdMmYy),
    })
}
