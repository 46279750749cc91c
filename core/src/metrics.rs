//! Plaintext metrics document renderer.
//!
//! One line per metric, tagged with the device identity so a poller can
//! tell which physical node produced it:
//!
//! ```text
//! eco2{id="Sensor1",mac="01:23:45:67:89:AB"}570
//! ```
//!
//! A metric whose sensor failed in the current pass renders the literal
//! `FAILED` marker instead of a number.

use core::fmt::Write as _;

use heapless::String;

use crate::readings::{SamplePassStatus, SensorReadings};

/// Capacity of a rendered metrics document. Five lines of metric name,
/// identity tag and value fit with plenty of headroom.
pub const DOC_CAPACITY: usize = 512;

/// Rendered metrics document.
pub type MetricsDoc = String<DOC_CAPACITY>;

/// Marker substituted for the value of a metric whose sensor read failed
/// in the current pass.
pub const FAILED_MARKER: &str = "FAILED";

/// Identity tag carried on every metric line.
///
/// Constant for the process lifetime: the id is the configured device
/// hostname (possibly empty when none is set) and the mac is the station
/// MAC address formatted `01:23:45:67:89:AB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub id: String<32>,
    pub mac: String<17>,
}

impl DeviceIdentity {
    pub fn new(id: &str, mac: &str) -> Self {
        Self {
            id: String::try_from(id).unwrap_or_default(),
            mac: String::try_from(mac).unwrap_or_default(),
        }
    }
}

/// Renders the five metric lines in fixed order: light, eco2, tvoc,
/// temp, humid.
///
/// eco2/tvoc carry the failure marker when the pass's air flag is down,
/// temp/humid when the climate flag is down; light always renders its
/// numeric value. Floats are printed with two decimal places so the same
/// store and status always produce a byte-identical document.
pub fn render(
    readings: &SensorReadings,
    status: SamplePassStatus,
    identity: &DeviceIdentity,
) -> MetricsDoc {
    let mut tag: String<72> = String::new();
    let _ = write!(tag, "{{id=\"{}\",mac=\"{}\"}}", identity.id, identity.mac);

    // The buffer is sized for the worst case; a full buffer would truncate
    // the document, never panic, so the write results are ignored.
    let mut doc = MetricsDoc::new();
    let _ = writeln!(doc, "light{}{}", tag, readings.light_level);
    if status.air_ok {
        let _ = writeln!(doc, "eco2{}{}", tag, readings.eco2);
        let _ = writeln!(doc, "tvoc{}{}", tag, readings.tvoc);
    } else {
        let _ = writeln!(doc, "eco2{}{}", tag, FAILED_MARKER);
        let _ = writeln!(doc, "tvoc{}{}", tag, FAILED_MARKER);
    }
    if status.climate_ok {
        let _ = writeln!(doc, "temp{}{:.2}", tag, readings.temperature);
        let _ = writeln!(doc, "humid{}{:.2}", tag, readings.humidity);
    } else {
        let _ = writeln!(doc, "temp{}{}", tag, FAILED_MARKER);
        let _ = writeln!(doc, "humid{}{}", tag, FAILED_MARKER);
    }
    doc
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::readings::SamplePassStatus;

    fn identity() -> DeviceIdentity {
        DeviceIdentity::new("Sensor1", "01:23:45:67:89:AB")
    }

    fn readings() -> SensorReadings {
        SensorReadings {
            light_level: 500,
            eco2: 570,
            tvoc: 12,
            temperature: 72.5,
            humidity: 40.25,
        }
    }

    #[test]
    fn all_sensors_ok() {
        let doc = render(&readings(), SamplePassStatus::all_ok(), &identity());
        assert_eq!(
            doc.as_str(),
            "light{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}500\n\
             eco2{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}570\n\
             tvoc{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}12\n\
             temp{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}72.50\n\
             humid{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}40.25\n"
        );
    }

    #[test]
    fn air_failure_marks_only_air_metrics() {
        let doc = render(&readings(), SamplePassStatus::new(false, true), &identity());
        assert!(doc.contains("eco2{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}FAILED\n"));
        assert!(doc.contains("tvoc{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}FAILED\n"));
        assert!(doc.contains("light{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}500\n"));
        assert!(doc.contains("temp{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}72.50\n"));
        assert!(doc.contains("humid{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}40.25\n"));
    }

    #[test]
    fn climate_failure_marks_only_climate_metrics() {
        // Independent of the air outcome: check both combinations.
        for air_ok in [true, false] {
            let doc = render(&readings(), SamplePassStatus::new(air_ok, false), &identity());
            assert!(doc.contains("temp{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}FAILED\n"));
            assert!(doc.contains("humid{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}FAILED\n"));
            assert!(doc.contains("light{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}500\n"));
        }
    }

    #[test]
    fn air_fail_climate_ok_scenario() {
        let status = SamplePassStatus::new(false, true);
        assert_eq!(status.bits(), 0b10);
        let doc = render(&readings(), status, &identity());
        assert!(doc.contains("eco2{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}FAILED\n"));
        assert!(doc.contains("tvoc{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}FAILED\n"));
        assert!(doc.contains("temp{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}72.50\n"));
        assert!(doc.contains("humid{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}40.25\n"));
    }

    #[test]
    fn light_never_renders_failed() {
        for (air_ok, climate_ok) in [(false, false), (false, true), (true, false), (true, true)] {
            let doc = render(
                &readings(),
                SamplePassStatus::new(air_ok, climate_ok),
                &identity(),
            );
            let light_line = doc.lines().next().unwrap();
            assert_eq!(
                light_line,
                "light{id=\"Sensor1\",mac=\"01:23:45:67:89:AB\"}500"
            );
            assert!(!light_line.contains(FAILED_MARKER));
        }
    }

    #[test]
    fn always_five_newline_terminated_lines() {
        for (air_ok, climate_ok) in [(false, false), (false, true), (true, false), (true, true)] {
            let doc = render(
                &readings(),
                SamplePassStatus::new(air_ok, climate_ok),
                &identity(),
            );
            assert_eq!(doc.chars().filter(|&c| c == '\n').count(), 5);
            assert!(doc.ends_with('\n'));
            assert_eq!(doc.lines().count(), 5);
        }
    }

    #[test]
    fn rendering_is_idempotent() {
        let status = SamplePassStatus::new(true, false);
        let first = render(&readings(), status, &identity());
        let second = render(&readings(), status, &identity());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn empty_id_renders_like_the_default_hostname_case() {
        let identity = DeviceIdentity::new("", "01:23:45:67:89:AB");
        let doc = render(&readings(), SamplePassStatus::all_ok(), &identity);
        assert!(doc.starts_with("light{id=\"\",mac=\"01:23:45:67:89:AB\"}500\n"));
    }
}
