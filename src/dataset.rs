// Dataset hand-off: the declared record schema and the consumers that
// receive the flattened measurement records

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_jsonlines::JsonLinesWriter;

use crate::errors::CanaryError;
use crate::sensors::MeasurementRecord;

pub const DATASET_NAME: &str = "air quality";

/// Receives the flattened record set produced by the collection pipeline.
/// The host's only contract is "submit records matching the declared
/// attribute names".
pub trait DatasetConsumer {
    fn submit(&mut self, records: &[MeasurementRecord]) -> Result<(), CanaryError>;
}

/// Writes records as JSON lines, one record per line.
pub struct JsonLinesConsumer<W: Write> {
    writer: JsonLinesWriter<W>,
}

impl JsonLinesConsumer<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, CanaryError> {
        let file = File::create(path).map_err(|e| CanaryError::DatasetWriterError { source: e })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesConsumer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: JsonLinesWriter::new(writer),
        }
    }
}

impl<W: Write> DatasetConsumer for JsonLinesConsumer<W> {
    fn submit(&mut self, records: &[MeasurementRecord]) -> Result<(), CanaryError> {
        for record in records {
            self.writer
                .write(record)
                .map_err(|e| CanaryError::DatasetWriterError { source: e })?;
        }
        self.writer
            .flush()
            .map_err(|e| CanaryError::DatasetWriterError { source: e })
    }
}

/// Three-level hierarchical schema the host renders as a map and case
/// table: location, the sensors found there, and their measurements.
#[derive(Clone, Debug, Serialize)]
pub struct DataSetDescription {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub collections: Vec<CollectionDescription>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CollectionDescription {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    pub parent: Option<&'static str>,
    pub labels: CollectionLabels,
    pub attrs: Vec<AttributeDescription>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionLabels {
    pub single_case: &'static str,
    pub plural_case: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_of_cases_with_article: Option<&'static str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AttributeDescription {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    pub description: &'static str,
}

pub fn dataset_description() -> DataSetDescription {
    DataSetDescription {
        name: DATASET_NAME,
        title: "Air Quality Table",
        description: "A set of values including humidity, temperature, pm2.5 & pm10.0, AQI",
        collections: vec![
            CollectionDescription {
                name: "Search",
                title: None,
                parent: None,
                labels: CollectionLabels {
                    single_case: "location",
                    plural_case: "locations",
                    set_of_cases_with_article: Some("Set of locations"),
                },
                attrs: vec![AttributeDescription {
                    name: "Location",
                    kind: "Categorical",
                    precision: None,
                    description: "user's searched location / current location",
                }],
            },
            CollectionDescription {
                name: "Sensors",
                title: None,
                parent: Some("Search"),
                labels: CollectionLabels {
                    single_case: "sensor",
                    plural_case: "sensors",
                    set_of_cases_with_article: Some("Set of Values"),
                },
                attrs: vec![
                    AttributeDescription {
                        name: "sensor_index",
                        kind: "numeric",
                        precision: None,
                        description: "Sensors id",
                    },
                    AttributeDescription {
                        name: "name",
                        kind: "categorical",
                        precision: None,
                        description: "Sensors Name",
                    },
                    AttributeDescription {
                        name: "latitude",
                        kind: "numeric",
                        precision: None,
                        description: "sensor's latitude",
                    },
                    AttributeDescription {
                        name: "longitude",
                        kind: "numeric",
                        precision: None,
                        description: "sensor's longitude",
                    },
                ],
            },
            CollectionDescription {
                name: "Sensor Data",
                title: Some("List of Measures"),
                parent: Some("Sensors"),
                labels: CollectionLabels {
                    single_case: "measure",
                    plural_case: "measures",
                    set_of_cases_with_article: None,
                },
                attrs: vec![
                    AttributeDescription {
                        name: "created_at",
                        kind: "date",
                        precision: None,
                        description: "date created data",
                    },
                    AttributeDescription {
                        name: "Humidity",
                        kind: "numeric",
                        precision: Some(3),
                        description: "estimated value",
                    },
                    AttributeDescription {
                        name: "Temperature",
                        kind: "text",
                        precision: None,
                        description: "estimated value",
                    },
                    AttributeDescription {
                        name: "PM 10.0",
                        kind: "numeric",
                        precision: Some(3),
                        description: "estimated value of Particulate Matter 10.0",
                    },
                    AttributeDescription {
                        name: "PM 2.5",
                        kind: "numeric",
                        precision: Some(3),
                        description: "estimated value of Particulate Matter 2.5",
                    },
                    AttributeDescription {
                        name: "AQI",
                        kind: "numeric",
                        precision: Some(3),
                        description: "Air Quality Index",
                    },
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::aqi_from_pm;
    use crate::sensors::Sensor;

    fn sample_record(hour: u8) -> MeasurementRecord {
        MeasurementRecord {
            created_at: format!("2022-03-21T{hour:02}:00:00.000Z"),
            humidity: 31.0,
            temperature: "68 °F".to_string(),
            pm2_5: 4.2,
            pm10_0: 6.1,
            aqi: aqi_from_pm(6.1),
            sensor: Sensor {
                sensor_index: 11235,
                name: "Downtown".to_string(),
                latitude: 35.19,
                longitude: -111.65,
                location: "Flagstaff".to_string(),
            },
        }
    }

    #[test]
    fn test_json_lines_consumer_writes_one_line_per_record() {
        let records = vec![sample_record(7), sample_record(8), sample_record(9)];
        let mut buffer = Vec::new();
        let mut consumer = JsonLinesConsumer::new(&mut buffer);
        consumer.submit(&records).unwrap();
        drop(consumer);

        let written = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: MeasurementRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, records[0]);
    }

    #[test]
    fn test_schema_declares_three_level_hierarchy() {
        let description = dataset_description();
        assert_eq!(description.collections.len(), 3);
        assert_eq!(description.collections[0].parent, None);
        assert_eq!(description.collections[1].parent, Some("Search"));
        assert_eq!(description.collections[2].parent, Some("Sensors"));
    }

    #[test]
    fn test_schema_attribute_names_match_record_fields() {
        let description = dataset_description();
        let record = serde_json::to_value(sample_record(7)).unwrap();
        let record_fields = record.as_object().unwrap();

        for collection in &description.collections {
            for attr in &collection.attrs {
                assert!(
                    record_fields.contains_key(attr.name),
                    "schema attribute {} missing from records",
                    attr.name
                );
            }
        }
    }
}
