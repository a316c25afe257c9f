use chrono::{DateTime, Datelike, Local, Timelike, Utc};

/// Wall-clock hour (0-23) of `ts` in the device's local time zone.
pub fn local_hour(ts: &DateTime<Utc>) -> u32 {
    ts.with_timezone(&Local).hour()
}

/// Local day of week, 0 = Sunday.
pub fn local_weekday(ts: &DateTime<Utc>) -> u32 {
    ts.with_timezone(&Local).weekday().num_days_from_sunday()
}

#[cfg(test)]
pub(crate) fn local_ts(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTime<Utc> {
    use chrono::TimeZone;
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}
