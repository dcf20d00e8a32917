//! The fixed candidate routes from SeaTac to the Hood Canal Bridge.

use chrono::{Duration, NaiveDate};

use crate::domain::{DomainError, DriveLeg, FerryLeg, FerryTiming, Route, schedule};

const EDMONDS_SAILINGS: [&str; 5] = ["15:10", "15:40", "16:10", "16:40", "17:10"];
const BAINBRIDGE_SAILINGS: [&str; 5] = ["15:25", "15:55", "16:25", "16:55", "17:25"];

fn mins(m: i64) -> Duration {
    Duration::minutes(m)
}

/// Build the three candidate routes with sailings on `anchor`.
///
/// Order: Edmonds → Kingston, Seattle → Bainbridge, Tacoma Narrows.
///
/// # Errors
///
/// Only fails if a built-in schedule entry or leg parameter is invalid.
pub fn build_candidate_routes(anchor: NaiveDate) -> Result<Vec<Route>, DomainError> {
    let edmonds = Route::new(
        "Edmonds → Kingston",
        vec![
            DriveLeg::new("SeaTac to Edmonds terminal", mins(47), "afternoon congestion")?.into(),
            FerryLeg::new(
                "Edmonds–Kingston ferry",
                "WSF Edmonds–Kingston",
                schedule(anchor, &EDMONDS_SAILINGS)?,
                FerryTiming::new(mins(32), mins(20)).with_buffer(mins(7)),
            )?
            .into(),
            DriveLeg::new("Kingston to Hood Canal Bridge", mins(36), "SR-104 flow")?.into(),
        ],
    )?;

    let bainbridge = Route::new(
        "Seattle → Bainbridge",
        vec![
            DriveLeg::new("SeaTac to Seattle ferry terminal", mins(30), "I-5 express lanes")?
                .into(),
            FerryLeg::new(
                "Seattle–Bainbridge ferry",
                "WSF Seattle–Bainbridge",
                schedule(anchor, &BAINBRIDGE_SAILINGS)?,
                FerryTiming::new(mins(35), mins(30)).with_buffer(mins(10)),
            )?
            .into(),
            DriveLeg::new("Bainbridge to Hood Canal Bridge", mins(48), "SR-305 and SR-3")?.into(),
        ],
    )?;

    let narrows = Route::new(
        "Tacoma Narrows",
        vec![
            DriveLeg::new("SeaTac to Tacoma Narrows", mins(42), "I-5 south")?.into(),
            DriveLeg::new("Tacoma Narrows to Hood Canal Bridge", mins(65), "WA-16 + WA-3")?
                .into(),
        ],
    )?;

    Ok(vec![edmonds, bainbridge, narrows])
}
