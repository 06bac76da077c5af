//! Loading the fleet file

use std::path::Path;

use eyre::{Result, WrapErr};
use flight_seats_core::LoadData;

/// Read flights, passengers, bookings and waitlist entries from a TOML file
pub fn load(path: &Path) -> Result<LoadData> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read fleet file {}", path.display()))?;
    let data = parse(&contents).wrap_err_with(|| format!("invalid fleet file {}", path.display()))?;
    tracing::info!(
        flights = data.flights.len(),
        passengers = data.passengers.len(),
        bookings = data.bookings.len(),
        waitlisted = data.waitlist.len(),
        "fleet loaded"
    );
    Ok(data)
}

fn parse(contents: &str) -> Result<LoadData> {
    Ok(toml::from_str(contents)?)
}
