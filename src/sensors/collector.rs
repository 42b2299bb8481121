// Sequential collection pipeline: validate, discover sensors, fetch
// per-day history, flatten into measurement records

use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use log::info;

use super::{MeasurementRecord, Sensor, SensorDirectory, SensorHistory};
use crate::aqi::aqi_from_pm;
use crate::errors::CanaryError;
use crate::geo::{self, days_array};
use crate::session::SessionState;

const SECONDS_PER_DAY: i64 = 86_400;

/// Runs the full collection flow for the session: one directory query over
/// the bounding box, then one history request per sensor per calendar day,
/// strictly in sequence. Records come back sensor-major, then day-major,
/// then in intra-day server order.
///
/// Any request failure aborts the whole run and discards everything fetched
/// so far; there are no retries and no partial results.
pub async fn collect_air_quality<D, H>(
    directory: &D,
    history: &H,
    session: &SessionState,
) -> Result<Vec<MeasurementRecord>, CanaryError>
where
    D: SensorDirectory,
    H: SensorHistory,
{
    // preconditions; nothing is fetched when any of these fail
    if !session.location_selected() {
        return Err(CanaryError::MissingLocation);
    }
    if session.start_date.is_empty() {
        return Err(CanaryError::MissingStartDate);
    }
    if session.end_date.is_empty() {
        return Err(CanaryError::MissingEndDate);
    }
    if session.averaging_minutes == 0 {
        return Err(CanaryError::MissingAveragingInterval);
    }
    let Some(bounds) = session.bounding_box else {
        return Err(CanaryError::MissingLocation);
    };
    let days = days_array(&session.start_date, &session.end_date)?;

    info!("fetching sensor directory for {}", session.city);
    let rows = directory.sensors_in(&bounds).await?;

    let mut sensors = Vec::new();
    for (sensor_index, name, latitude, longitude) in rows {
        sensors.push(Sensor {
            sensor_index,
            name,
            latitude,
            longitude,
            location: session.city.clone(),
        });
        // stop once the configured cap is reached; 0 means unlimited
        if session.sensor_limit > 0 && sensors.len() >= session.sensor_limit {
            break;
        }
    }
    info!("found {} sensor(s)", sensors.len());

    let mut records = Vec::new();
    for (position, sensor) in sensors.iter().enumerate() {
        info!("sensor {}/{} - {}", position + 1, sensors.len(), sensor.name);
        for day in &days {
            info!("fetching {day}");
            let (start_timestamp, end_timestamp) = utc_day_window(day)?;
            let rows = history
                .history(
                    sensor.sensor_index,
                    start_timestamp,
                    end_timestamp,
                    session.averaging_minutes,
                )
                .await?;

            for (epoch, humidity, temperature_f, pm2_5, pm10_0) in rows {
                records.push(MeasurementRecord {
                    created_at: iso_timestamp(epoch)?,
                    humidity,
                    temperature: format!("{temperature_f} °F"),
                    pm2_5,
                    pm10_0,
                    aqi: aqi_from_pm(pm10_0),
                    sensor: sensor.clone(),
                });
            }
        }
    }
    Ok(records)
}

/// Unix-second window covering one UTC calendar day, 00:00:00 to 24:00:00.
fn utc_day_window(day: &str) -> Result<(i64, i64), CanaryError> {
    let start = geo::parse_date(day)?
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp();
    Ok((start, start + SECONDS_PER_DAY))
}

fn iso_timestamp(epoch: i64) -> Result<String, CanaryError> {
    let timestamp =
        DateTime::<Utc>::from_timestamp(epoch, 0).ok_or(CanaryError::MalformedResponse {
            description: format!("timestamp {epoch} out of range"),
        })?;
    Ok(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
