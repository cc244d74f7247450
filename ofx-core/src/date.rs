//! OFX date tokens.
//!
//! The standard layout is `YYYYMMDD[HHMM[SS[.XXX]]][[gmt offset:tz name]]`.
//! Brazilian exports frequently ignore that and write `DD/MM/YYYY`, so the
//! statement currency decides which layout is tried first.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{OfxError, OfxResult};

/// A parsed date token. Only tokens that carry a time of day produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostedAt {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Time of day plus an explicit `[offset:TZ]` suffix.
    Zoned(DateTime<FixedOffset>),
}

impl PostedAt {
    /// Calendar date as written in the document, ignoring any offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            PostedAt::Date(d) => *d,
            PostedAt::DateTime(dt) => dt.date(),
            PostedAt::Zoned(dt) => dt.date_naive(),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            PostedAt::Date(_) => None,
            PostedAt::DateTime(dt) => Some(dt.time()),
            PostedAt::Zoned(dt) => Some(dt.time()),
        }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            PostedAt::Zoned(dt) => Some(*dt.offset()),
            _ => None,
        }
    }
}

fn brazilian_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<d>\d{2})/(?P<m>\d{2})/(?P<y>\d{4})$").expect("static pattern compiles")
    })
}

fn ofx_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})",
            r"(?:(?P<hh>\d{2})(?P<mm>\d{2})(?:(?P<ss>\d{2})(?:\.\d+)?)?)?",
            r"(?:\[(?P<off>[+-]?\d{1,2}(?:\.\d+)?)(?::[^\]]*)?\])?$",
        ))
        .expect("static pattern compiles")
    })
}

fn is_brazilian(currency: &str) -> bool {
    currency.eq_ignore_ascii_case("BRL")
}

/// Parse a date token, picking the layout from the statement currency.
pub fn parse_date(raw: &str, currency: &str) -> OfxResult<PostedAt> {
    let token = raw.trim();
    let invalid = || OfxError::InvalidDate(raw.to_string());

    if is_brazilian(currency) {
        if let Some(caps) = brazilian_re().captures(token) {
            let date = ymd(&caps["y"], &caps["m"], &caps["d"]).ok_or_else(invalid)?;
            return Ok(PostedAt::Date(date));
        }
    }

    let caps = ofx_re().captures(token).ok_or_else(invalid)?;
    let date = ymd(&caps["y"], &caps["m"], &caps["d"]).ok_or_else(invalid)?;

    let (Some(hh), Some(mm)) = (caps.name("hh"), caps.name("mm")) else {
        return Ok(PostedAt::Date(date));
    };
    let ss = caps.name("ss").map_or("0", |m| m.as_str());
    let time = NaiveTime::from_hms_opt(
        hh.as_str().parse().map_err(|_| invalid())?,
        mm.as_str().parse().map_err(|_| invalid())?,
        ss.parse().map_err(|_| invalid())?,
    )
    .ok_or_else(invalid)?;
    let naive = date.and_time(time);

    match caps.name("off") {
        None => Ok(PostedAt::DateTime(naive)),
        Some(off) => {
            let offset = parse_offset(off.as_str()).ok_or_else(invalid)?;
            let zoned = offset.from_local_datetime(&naive).single().ok_or_else(invalid)?;
            Ok(PostedAt::Zoned(zoned))
        }
    }
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// `-3`, `+5`, `5.5` hours east of UTC.
fn parse_offset(hours: &str) -> Option<FixedOffset> {
    let hours = Decimal::from_str(hours.trim_start_matches('+')).ok()?;
    let seconds = (hours * Decimal::from(3600)).round().to_i32()?;
    FixedOffset::east_opt(seconds)
}
