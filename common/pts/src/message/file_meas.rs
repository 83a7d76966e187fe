// Licensed under the Apache-2.0 license

#[derive(Debug, Clone, PartialEq)]
pub struct FileMeasurement {
    pub filename: String,
    pub measurement: Vec<u8>,
}

/// Decoded File Measurement attribute.
///
/// A `request_id` of zero marks measurements the peer sent without a
/// matching request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileMeasurements {
    pub request_id: u16,
    pub entries: Vec<FileMeasurement>,
}

impl FileMeasurements {
    pub fn new(request_id: u16) -> Self {
        Self {
            request_id,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, filename: &str, measurement: &[u8]) {
        self.entries.push(FileMeasurement {
            filename: filename.to_string(),
            measurement: measurement.to_vec(),
        });
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }
}
