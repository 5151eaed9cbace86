//! Boot self-test mission.
//!
//! Runs one hardware check per worker cycle and records pass/fail per
//! check. Scheduled as a Critical task at boot, duration-bounded so the
//! device settles back to idle even if nobody reads the results.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{error, info};

use strix_core::Hal;

use crate::mission::Mission;
use crate::spectrum::{BAND1_MIN_MHZ, BAND2_MIN_MHZ, BAND3_MIN_MHZ, frequency_range_allowed};

const CHECKS: &[&str] = &["radio-presence", "band-1-plan", "band-2-plan", "band-3-plan"];

/// Steps through a fixed list of radio checks.
pub struct RadioTestMission {
    hal: Arc<dyn Hal>,
    next_check: usize,
    results: Vec<(&'static str, bool)>,
}

impl RadioTestMission {
    pub fn new(hal: Arc<dyn Hal>) -> Self {
        Self {
            hal,
            next_check: 0,
            results: Vec::new(),
        }
    }

    pub fn finished(&self) -> bool {
        self.next_check >= CHECKS.len()
    }

    pub fn passed(&self) -> bool {
        self.finished() && self.results.iter().all(|(_, ok)| *ok)
    }

    fn run_check(&self, name: &str) -> bool {
        match name {
            "radio-presence" => self.hal.radio_available(),
            // Band plan sanity: each band must accept a window inside it.
            "band-1-plan" => frequency_range_allowed(BAND1_MIN_MHZ, BAND1_MIN_MHZ + 1.0),
            "band-2-plan" => frequency_range_allowed(BAND2_MIN_MHZ, BAND2_MIN_MHZ + 1.0),
            "band-3-plan" => frequency_range_allowed(BAND3_MIN_MHZ, BAND3_MIN_MHZ + 1.0),
            _ => false,
        }
    }
}

impl Mission for RadioTestMission {
    fn setup(&mut self) {
        info!("radio self-test starting");
        self.hal.set_led(128, 100, 0);
        self.next_check = 0;
        self.results.clear();
    }

    fn advance(&mut self) {
        if self.finished() {
            return;
        }

        let name = CHECKS[self.next_check];
        let ok = self.run_check(name);
        if !ok {
            error!(check = name, "self-test check failed");
        }
        self.results.push((name, ok));
        self.next_check += 1;

        if self.finished() {
            if self.passed() {
                info!("radio self-test passed");
                self.hal.set_led(0, 128, 0);
            } else {
                self.hal.set_led(255, 0, 0);
            }
        }
    }

    fn teardown(&mut self) {
        info!(passed = self.passed(), "radio self-test stopped");
    }

    fn name(&self) -> &'static str {
        "radio-test"
    }

    fn task_label(&self) -> String {
        "Radio Self-Test".to_string()
    }

    fn description(&self) -> &'static str {
        "Startup hardware check across the supported bands."
    }

    fn report_status(&self, out: &mut Map<String, Value>) -> bool {
        let checks: Map<String, Value> = self
            .results
            .iter()
            .map(|(name, ok)| (name.to_string(), Value::from(*ok)))
            .collect();
        out.insert("checks".to_string(), Value::Object(checks));
        out.insert("finished".to_string(), Value::from(self.finished()));
        out.insert("passed".to_string(), Value::from(self.passed()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strix_core::NullHal;

    #[test]
    fn all_checks_pass_with_radio() {
        let mut test = RadioTestMission::new(Arc::new(NullHal::new()));
        test.setup();
        while !test.finished() {
            test.advance();
        }
        assert!(test.passed());
    }

    #[test]
    fn fails_without_radio() {
        let mut test = RadioTestMission::new(Arc::new(NullHal::without_radio()));
        test.setup();
        while !test.finished() {
            test.advance();
        }
        assert!(!test.passed());

        let mut out = Map::new();
        test.report_status(&mut out);
        let checks = out.get("checks").unwrap().as_object().unwrap();
        assert_eq!(checks.get("radio-presence"), Some(&Value::from(false)));
        assert_eq!(checks.get("band-1-plan"), Some(&Value::from(true)));
    }

    #[test]
    fn advance_past_completion_is_harmless() {
        let mut test = RadioTestMission::new(Arc::new(NullHal::new()));
        test.setup();
        for _ in 0..20 {
            test.advance();
        }
        assert!(test.finished());
        assert_eq!(CHECKS.len(), 4);
    }

    #[test]
    fn setup_resets_results() {
        let mut test = RadioTestMission::new(Arc::new(NullHal::new()));
        test.setup();
        test.advance();
        test.setup();
        assert!(!test.finished());
        let mut out = Map::new();
        test.report_status(&mut out);
        assert_eq!(out.get("finished"), Some(&Value::from(false)));
    }
}
