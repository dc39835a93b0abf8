use super::*;
use crate::config::VALUE_LABELS;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Value(usize),
    Message(String, String),
    Backlight(bool),
}

#[derive(Default)]
struct RecordingDisplay {
    calls: Vec<Call>,
}

impl DisplaySink for RecordingDisplay {
    fn show_value(&mut self, index: usize) {
        self.calls.push(Call::Value(index));
    }

    fn show_message(&mut self, top: &str, bottom: &str) {
        self.calls.push(Call::Message(top.into(), bottom.into()));
    }

    fn set_backlight(&mut self, on: bool) {
        self.calls.push(Call::Backlight(on));
    }
}

#[derive(Default)]
struct RecordingStore {
    saved: Vec<StoredConfig>,
}

impl ConfigStore for RecordingStore {
    fn persist(&mut self, config: &StoredConfig) {
        self.saved.push(*config);
    }
}

const TICK: u64 = 10;
const RELEASED: [bool; 2] = [false, false];
const B1: [bool; 2] = [true, false];
const B2: [bool; 2] = [false, true];

struct Rig {
    controls: Controls,
    state: DisplayState,
    display: RecordingDisplay,
    store: RecordingStore,
    now: u64,
}

impl Rig {
    fn new(reading: u16, dimming: DimmingMode) -> Self {
        let controls = Controls::with_defaults(reading, 0);
        let state = DisplayState::restore(
            StoredConfig {
                selected_index: 0,
                dimming,
            },
            controls.light().is_room_dark(),
        );
        Self {
            controls,
            state,
            display: RecordingDisplay::default(),
            store: RecordingStore::default(),
            now: 0,
        }
    }

    /// Hold the inputs for `duration_ms`, ticking every 10 ms. Returns the
    /// reports that were not quiet, with their timestamps.
    fn run(&mut self, buttons: [bool; 2], light: u16, duration_ms: u64) -> Vec<(u64, TickReport)> {
        let end = self.now + duration_ms;
        let mut out = Vec::new();
        while self.now < end {
            let report = self.controls.tick(
                RawInputs { buttons, light },
                self.now,
                &mut self.state,
                &mut self.display,
                &mut self.store,
            );
            if !report.is_quiet() {
                out.push((self.now, report));
            }
            self.now += TICK;
        }
        out
    }

    fn status(&self) -> TickStatus {
        if PendingSlot::ALL
            .iter()
            .any(|s| self.controls.pending().slot(*s).is_fired())
        {
            TickStatus::Settling
        } else {
            TickStatus::Idle
        }
    }
}

fn button_actions(reports: &[(u64, TickReport)], id: ButtonId) -> Vec<(u64, ButtonAction)> {
    reports
        .iter()
        .map(|(t, r)| (*t, r.buttons[id.index()]))
        .filter(|(_, a)| *a != ButtonAction::None)
        .collect()
}

fn light_events(reports: &[(u64, TickReport)]) -> Vec<(u64, LightEvent)> {
    reports
        .iter()
        .filter(|(_, r)| r.light != LightEvent::None)
        .map(|(t, r)| (*t, r.light))
        .collect()
}

fn finalizations(reports: &[(u64, TickReport)]) -> Vec<(u64, PendingSlot)> {
    reports
        .iter()
        .flat_map(|(t, r)| r.finalized.iter().map(move |s| (*t, *s)))
        .collect()
}

fn message(top: &str, bottom: &str) -> Call {
    Call::Message(top.into(), bottom.into())
}

#[test]
fn quick_press_cycles_mode_then_finalizes_once() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    let mut reports = rig.run(B1, 1000, 100);
    reports.extend(rig.run(RELEASED, 1000, 3000));

    assert_eq!(
        button_actions(&reports, ButtonId::One),
        vec![(50, ButtonAction::Push), (150, ButtonAction::QuickPress)]
    );
    assert_eq!(
        finalizations(&reports),
        vec![(2650, PendingSlot::Quick(ButtonId::One))]
    );
    assert_eq!(rig.state.dimming, DimmingMode::On);
    assert_eq!(
        rig.store.saved,
        vec![StoredConfig {
            selected_index: 0,
            dimming: DimmingMode::On,
        }]
    );
    assert_eq!(
        rig.display.calls,
        vec![
            Call::Backlight(true),
            message("LCD backlight", "always on"),
            Call::Backlight(true),
            Call::Value(0),
        ]
    );
}

#[test]
fn settling_is_reported_until_finalized() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    let mut reports = rig.run(B1, 1000, 100);
    reports.extend(rig.run(RELEASED, 1000, 60));
    let (_, pressed) = reports.last().unwrap();
    assert_eq!(pressed.status, TickStatus::Settling);

    rig.run(RELEASED, 1000, 2480);
    assert_eq!(rig.status(), TickStatus::Settling);
    let reports = rig.run(RELEASED, 1000, 20);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].1.status, TickStatus::Idle);
    assert_eq!(rig.status(), TickStatus::Idle);
}

#[test]
fn hold_press_steps_value_backwards() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    let mut reports = rig.run(B2, 1000, 1000);
    reports.extend(rig.run(RELEASED, 1000, 3000));

    assert_eq!(
        button_actions(&reports, ButtonId::Two),
        vec![(50, ButtonAction::Push), (1050, ButtonAction::HoldPress)]
    );
    assert_eq!(rig.state.selected_index, 2);
    assert_eq!(
        finalizations(&reports),
        vec![(3550, PendingSlot::Hold(ButtonId::Two))]
    );
    let (top, bottom) = VALUE_LABELS[2];
    assert_eq!(rig.display.calls, vec![message(top, bottom), Call::Value(2)]);
    assert_eq!(rig.store.saved.len(), 1);
    assert_eq!(rig.store.saved[0].selected_index, 2);
}

#[test]
fn mode_button_hold_recalibrates_without_persisting() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    rig.run(RELEASED, 1000, 500);
    let mut reports = rig.run(B1, 1600, 1000);
    reports.extend(rig.run(RELEASED, 1600, 3000));

    assert_eq!(rig.controls.light().thresholds().baseline, 1600);
    assert_eq!(
        finalizations(&reports),
        vec![(4050, PendingSlot::Hold(ButtonId::One))]
    );
    assert!(rig.store.saved.is_empty());
    assert_eq!(
        rig.display.calls,
        vec![message("LDR calibrated", "Baseline 1600"), Call::Value(0)]
    );
}

#[test]
fn second_press_restarts_settle_window() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    let mut reports = rig.run(B2, 1000, 100);
    reports.extend(rig.run(RELEASED, 1000, 900));
    reports.extend(rig.run(B2, 1000, 100));
    reports.extend(rig.run(RELEASED, 1000, 4000));

    assert_eq!(
        finalizations(&reports),
        vec![(3650, PendingSlot::Quick(ButtonId::Two))]
    );
    assert_eq!(
        rig.store.saved,
        vec![StoredConfig {
            selected_index: 2,
            dimming: DimmingMode::Auto,
        }]
    );
}

#[test]
fn swipe_advances_selection() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    assert_eq!(rig.controls.light().thresholds().dark, 750);
    assert_eq!(rig.controls.light().thresholds().light, 1250);

    let mut reports = rig.run(RELEASED, 1000, 1000);
    reports.extend(rig.run(RELEASED, 700, 400));
    reports.extend(rig.run(RELEASED, 1300, 3000));

    assert_eq!(
        light_events(&reports),
        vec![(1450, LightEvent::Swipe { dwell_ms: 400 })]
    );
    assert_eq!(rig.state.selected_index, 1);
    assert_eq!(finalizations(&reports), vec![(3950, PendingSlot::Swipe)]);
    let (top, bottom) = VALUE_LABELS[1];
    assert_eq!(rig.display.calls, vec![message(top, bottom), Call::Value(1)]);
    assert_eq!(rig.store.saved.len(), 1);
}

#[test]
fn darkened_room_turns_auto_backlight_off_once() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    assert!(rig.state.backlight_on);

    let mut reports = rig.run(RELEASED, 1000, 1000);
    reports.extend(rig.run(RELEASED, 700, 4000));

    let events = light_events(&reports);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], (3550, LightEvent::RoomDarkened { thresholds }) if thresholds.baseline == 700));
    assert_eq!(rig.display.calls, vec![Call::Backlight(false)]);
    assert!(!rig.state.backlight_on);
    assert!(rig.controls.light().is_room_dark());
    assert_eq!(rig.controls.light().thresholds().baseline, 700);
    assert!(rig.store.saved.is_empty());
}

#[test]
fn lights_coming_back_turn_auto_backlight_on() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    rig.run(RELEASED, 700, 3000);
    let reports = rig.run(RELEASED, 1300, 500);

    assert!(matches!(
        light_events(&reports).as_slice(),
        [(_, LightEvent::RoomLightened { .. })]
    ));
    assert_eq!(
        rig.display.calls,
        vec![Call::Backlight(false), Call::Backlight(true)]
    );
    assert!(rig.state.backlight_on);
}

#[test]
fn manual_modes_ignore_room_changes() {
    for mode in [DimmingMode::On, DimmingMode::Off] {
        let mut rig = Rig::new(1000, mode);
        rig.run(RELEASED, 700, 3000);
        rig.run(RELEASED, 1300, 500);
        assert!(rig.display.calls.is_empty());
        assert_eq!(rig.state.backlight_on, mode == DimmingMode::On);
    }
}

#[test]
fn mode_finalizer_respects_dark_room() {
    // Powered up in the dark, cycling from Off lands on Auto.
    let mut rig = Rig::new(100, DimmingMode::Off);
    assert!(rig.controls.light().is_room_dark());
    assert!(!rig.state.backlight_on);

    rig.run(B1, 100, 100);
    rig.run(RELEASED, 100, 3000);

    assert_eq!(rig.state.dimming, DimmingMode::Auto);
    assert_eq!(
        rig.display.calls,
        vec![
            Call::Backlight(true),
            message("LCD backlight", "Auto (light dep)"),
            Call::Backlight(false),
            Call::Value(0),
        ]
    );
    assert!(!rig.state.backlight_on);
}

#[test]
fn inputs_stay_live_while_settling() {
    let mut rig = Rig::new(1000, DimmingMode::Auto);
    let mut reports = rig.run(B2, 1000, 100);
    reports.extend(rig.run(RELEASED, 700, 400));
    reports.extend(rig.run(RELEASED, 1300, 3000));

    assert_eq!(
        button_actions(&reports, ButtonId::Two),
        vec![(50, ButtonAction::Push), (150, ButtonAction::QuickPress)]
    );
    assert_eq!(
        light_events(&reports),
        vec![(550, LightEvent::Swipe { dwell_ms: 400 })]
    );
    assert_eq!(rig.state.selected_index, 2);
    assert_eq!(
        finalizations(&reports),
        vec![
            (2650, PendingSlot::Quick(ButtonId::Two)),
            (3050, PendingSlot::Swipe),
        ]
    );
    assert_eq!(rig.store.saved.len(), 2);
}

#[test]
fn restore_resets_out_of_range_index_and_derives_backlight() {
    let state = DisplayState::restore(
        StoredConfig {
            selected_index: 9,
            dimming: DimmingMode::Auto,
        },
        true,
    );
    assert_eq!(state.selected_index, 0);
    assert!(!state.backlight_on);

    // Same fallback as a corrupt flash record.
    let decoded = StoredConfig::deserialize(&[9, 0]);
    assert_eq!(decoded.selected_index, state.selected_index);
}
