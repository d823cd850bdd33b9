//! Serialization of balls inside other structures.

use astro_ball::Ball;
use astro_ball::Consts;
use astro_ball::Float;
use astro_ball::Mag;

#[test]
fn json_roundtrip() {
    let mut cc = Consts::new();
    let values = vec![
        cc.pi(100),
        Ball::zero(),
        Ball::indeterminate(),
        Ball::zero_pm_inf(),
        Ball::from_f64(-2.75),
        Ball::from_ratio(1, 3, 64).add_error(&Mag::from_2exp(-40)),
    ];

    let s = serde_json::to_string(&values).unwrap();
    let back: Vec<Ball> = serde_json::from_str(&s).unwrap();
    assert_eq!(back.len(), values.len());
    for (a, b) in values.iter().zip(back.iter()) {
        assert!(a.is_indeterminate() && b.is_indeterminate() || a == b, "{} {}", a, b);
    }

    let nums: Vec<Float> = serde_json::from_str("[1, -2, 0.5, \"0x7p-2\", \"-inf\"]").unwrap();
    assert_eq!(nums[0], Float::from_i64(1));
    assert_eq!(nums[1], Float::from_i64(-2));
    assert_eq!(nums[2], Float::from_f64(0.5));
    assert_eq!(nums[3], Float::from_f64(1.75));
    assert!(nums[4].is_inf_neg());

    assert!(serde_json::from_str::<Ball>("\"[1 +/- 1]\"").is_err());
    assert!(serde_json::from_str::<Mag>("-1.5").is_err());
}
