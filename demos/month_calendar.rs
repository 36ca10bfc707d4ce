use chrono::{Datelike, Utc};
use lunar_almanac::{Activity, Almanac, DateRange, MeanElements};

fn main() -> lunar_almanac::Result<()> {
    let today = Utc::now().date_naive();
    let mut args = std::env::args().skip(1);
    let year = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(today.year());
    let month = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(today.month());

    let mut almanac = Almanac::new(MeanElements);
    let days = almanac.days(&DateRange::month(year, month)?, &Utc)?;

    print!("{:<10} {:>5}  {:<2} {:<12}", "date", "time", "", "sign");
    for activity in Activity::ALL {
        print!(" {:>16}", activity.name());
    }
    println!();

    for day in &days {
        for row in day.rows() {
            let entry = row.entry;
            let time = entry
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default();
            let phase = entry.phase.map(|p| p.symbol().to_string()).unwrap_or_default();
            print!(
                "{:<10} {:>5}  {:<2} {} {:<10}",
                entry.date,
                time,
                phase,
                entry.sign.symbol(),
                entry.sign.name()
            );
            for (_, status) in row.scores.iter() {
                print!(" {:>16}", status.to_string());
            }
            println!();
        }
    }

    println!(
        "{} days, {} ephemeris queries",
        days.len(),
        almanac.cache().misses()
    );
    Ok(())
}
