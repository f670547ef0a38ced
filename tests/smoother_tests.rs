// Host-side tests for temporal smoothing and transition tiers.

use kinesis_core::smoother::{iterations_to_converge, AttackDecay, Ema, TransitionTier};

#[test]
fn ema_approaches_constant_input_without_overshoot() {
    let target = 200.0;
    let mut ema = Ema::new(0.8);
    let bound = iterations_to_converge(0.8, 0.01);
    let mut previous = 0.0;
    for _ in 0..bound {
        let value = ema.update(&[target])[0];
        assert!(value > previous, "{value} did not rise above {previous}");
        assert!(value <= target, "{value} overshot {target}");
        previous = value;
    }
    assert!(target - previous <= target * 0.01 + 1e-3);
}

#[test]
fn convergence_bound_is_tight() {
    // 0.8^21 is the first power under 1%
    assert_eq!(iterations_to_converge(0.8, 0.01), 21);
    assert_eq!(iterations_to_converge(0.0, 0.01), 1);

    let mut ema = Ema::new(0.8);
    for _ in 0..19 {
        ema.update(&[100.0]);
    }
    assert!(100.0 - ema.get(0) > 1.0);
}

#[test]
fn factor_is_clamped_into_unit_interval() {
    assert_eq!(Ema::new(-0.5).factor(), 0.0);
    assert!(Ema::new(1.5).factor() < 1.0);
    assert_eq!(Ema::new(f32::NAN).factor(), 0.8);
    assert_eq!(Ema::default().factor(), 0.8);
}

#[test]
fn zero_factor_passes_input_through() {
    let mut ema = Ema::new(0.0);
    assert_eq!(ema.update(&[3.0, 9.0]), &[3.0, 9.0]);
}

#[test]
fn clear_zeroes_history_and_keeps_bins() {
    let mut ema = Ema::new(0.5);
    ema.update(&[10.0, 20.0, 30.0]);
    ema.clear();
    assert_eq!(ema.values(), &[0.0, 0.0, 0.0]);
    assert_eq!(ema.get(7), 0.0);
}

#[test]
fn rising_values_attack_and_falling_values_decay() {
    let mut timing = AttackDecay::default();
    assert_eq!(timing.observe(0.5), TransitionTier::Attack);
    assert_eq!(timing.observe(0.5), TransitionTier::Decay);
    assert_eq!(timing.observe(0.2), TransitionTier::Decay);
    assert_eq!(timing.observe(0.9), TransitionTier::Attack);
    assert_eq!(timing.reset(), TransitionTier::Reset);
    assert_eq!(timing.previous(), 0.0);
}

#[test]
fn tiers_print_as_css_seconds() {
    assert_eq!(TransitionTier::Attack.css(), "0.05s");
    assert_eq!(TransitionTier::Decay.css(), "0.3s");
    assert_eq!(TransitionTier::Reset.css(), "0.5s");
}
