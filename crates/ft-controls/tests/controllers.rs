//! Integration test: both control laws behind the `Controller` capability.
//!
//! Covers:
//! - A hand-written YAML fuzzy system with mixed membership shapes
//! - Sharing one fuzzy system across threads
//! - PID and fuzzy controllers driven through `dyn Controller`

use std::sync::Arc;
use std::thread;

use ft_controls::{
    ControlAction, ControlError, ControlInput, Controller, ControllerKind, Defuzzification,
    FuzzyController, FuzzySystem, PidConfig, PidController,
};

const HEATER_YAML: &str = r#"
temperature:
  name: temperature
  min: 0.0
  max: 40.0
  sets:
    - name: cold
      membership: { shape: trapezoidal, a: 0.0, b: 0.0, c: 10.0, d: 20.0 }
    - name: hot
      membership: { shape: trapezoidal, a: 20.0, b: 30.0, c: 40.0, d: 40.0 }
error:
  name: error
  min: -5.0
  max: 5.0
  sets:
    - name: below
      membership: { shape: gaussian, mean: 5.0, sigma: 2.0 }
    - name: above
      membership: { shape: gaussian, mean: -5.0, sigma: 2.0 }
power:
  name: power
  min: 0.0
  max: 100.0
  sets:
    - name: off
      membership: { shape: triangular, a: 0.0, b: 0.0, c: 40.0 }
    - name: full
      membership: { shape: triangular, a: 60.0, b: 100.0, c: 100.0 }
rules:
  - { temperature: cold, error: below, power: full }
  - { temperature: cold, error: above, power: off }
  - { temperature: hot, error: below, power: full, weight: 0.5 }
  - { temperature: hot, error: above, power: off }
"#;

#[test]
fn yaml_system_with_mixed_shapes() {
    let system = FuzzySystem::from_yaml_str(HEATER_YAML).unwrap();
    assert_eq!(system.rule_base().len(), 4);
    assert_eq!(system.universe().len(), 1001);

    let heater = FuzzyController::new(Arc::new(system), Defuzzification::Centroid);
    let cold_room = heater.compute(5.0, 4.0);
    let warm_room = heater.compute(35.0, -4.0);
    assert!(cold_room > 70.0, "cold room: {cold_room}");
    assert!(warm_room < 30.0, "warm room: {warm_room}");
}

#[test]
fn yaml_unknown_set_is_rejected() {
    let broken = HEATER_YAML.replace("power: full, weight", "power: blazing, weight");
    let err = FuzzySystem::from_yaml_str(&broken).unwrap_err();
    assert!(matches!(err, ControlError::UnknownSet { .. }));

    let garbage = FuzzySystem::from_yaml_str("temperature: [1, 2").unwrap_err();
    assert!(matches!(garbage, ControlError::Parse(_)));
}

#[test]
fn shared_system_across_threads() {
    let controller = FuzzyController::hvac(Defuzzification::Centroid).unwrap();
    let expected = controller.compute(26.0, -4.0);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = controller.clone();
            thread::spawn(move || c.compute(26.0, -4.0))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn controllers_behind_trait_objects() {
    let pid = PidController::new(
        PidConfig::with_power_limits(8.0, 0.3, 2.0)
            .unwrap()
            .with_action(ControlAction::Reverse),
    );
    let fuzzy = FuzzyController::hvac(Defuzzification::Bisector).unwrap();
    let mut controllers: Vec<Box<dyn Controller>> = vec![Box::new(pid), Box::new(fuzzy)];

    // Room 3 degrees above setpoint: a cooling controller must act
    let input = ControlInput {
        time: 0.0,
        setpoint: 22.0,
        measurement: 25.0,
        dt: 0.5,
    };
    for controller in controllers.iter_mut() {
        let power = controller.control_signal(&input).unwrap();
        assert!(power > 0.0 && power <= 100.0, "{:?}: {power}", controller.kind());
        controller.reset();
    }

    assert_eq!(controllers[0].kind(), ControllerKind::Pid);
    assert_eq!(
        controllers[1].kind(),
        ControllerKind::Fuzzy(Defuzzification::Bisector)
    );
}
